//! Sources the dispatcher reads plugin options from.

use std::path::PathBuf;
use std::sync::RwLock;

use async_trait::async_trait;
use config::{Config, Environment, File};
use thiserror::Error;

use super::PluginOptions;

#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("Failed to read options: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Options unavailable: {0}")]
    Unavailable(String),
}

/// Supplies the current plugin options.
///
/// Called once per dispatch; implementations must not cache on behalf of the
/// caller.
#[async_trait]
pub trait OptionsSource: Send + Sync {
    async fn load(&self) -> Result<PluginOptions, OptionsError>;
}

/// Options file managed by the host's settings screen, overlaid with
/// `PLUGIN_*` environment variables.
///
/// The file is re-read on every [`load`](OptionsSource::load), so edits made
/// by the host take effect on the next comment without a restart.
pub struct FileOptionsSource {
    path: PathBuf,
}

impl FileOptionsSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(path: PathBuf) -> Result<PluginOptions, OptionsError> {
        let options = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("PLUGIN"))
            .build()?
            .try_deserialize()?;
        Ok(options)
    }
}

#[async_trait]
impl OptionsSource for FileOptionsSource {
    async fn load(&self) -> Result<PluginOptions, OptionsError> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || Self::read(path))
            .await
            .map_err(|e| OptionsError::Unavailable(e.to_string()))?
    }
}

/// In-memory options, for embedding the hooks as a library and for tests.
#[derive(Default)]
pub struct StaticOptionsSource {
    options: RwLock<PluginOptions>,
}

impl StaticOptionsSource {
    pub fn new(options: PluginOptions) -> Self {
        Self {
            options: RwLock::new(options),
        }
    }

    /// Swap in new options; later loads see them.
    pub fn replace(&self, options: PluginOptions) {
        match self.options.write() {
            Ok(mut guard) => *guard = options,
            Err(poisoned) => *poisoned.into_inner() = options,
        }
    }
}

#[async_trait]
impl OptionsSource for StaticOptionsSource {
    async fn load(&self) -> Result<PluginOptions, OptionsError> {
        self.options
            .read()
            .map(|guard| guard.clone())
            .map_err(|e| OptionsError::Unavailable(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::ModerationMode;

    #[tokio::test]
    async fn test_static_source_replace() {
        let source = StaticOptionsSource::default();
        assert_eq!(source.load().await.unwrap(), PluginOptions::default());

        source.replace(PluginOptions {
            moderation_mode: ModerationMode::All,
            ..Default::default()
        });
        assert_eq!(source.load().await.unwrap().moderation_mode, ModerationMode::All);
    }

    #[tokio::test]
    async fn test_missing_file_yields_defaults() {
        let source = FileOptionsSource::new("/nonexistent/comment-notify/plugin.toml");
        let options = source.load().await.unwrap();
        assert_eq!(options.api_url, super::super::DEFAULT_GATEWAY_URL);
    }

    #[tokio::test]
    async fn test_file_reread_on_each_load() {
        let path = std::env::temp_dir().join(format!("comment-notify-{}.toml", std::process::id()));
        std::fs::write(&path, "moderation_mode = \"all\"\nnotify_urls = \"\"\"\njson://a\n\njson://b\n\"\"\"\n").unwrap();

        let source = FileOptionsSource::new(&path);
        let first = source.load().await.unwrap();
        assert_eq!(first.moderation_mode, ModerationMode::All);
        assert_eq!(first.destination_urls(), vec!["json://a", "json://b"]);

        std::fs::write(&path, "moderation_mode = \"approved_only\"\ndebug_mode = \"1\"\n").unwrap();
        let second = source.load().await.unwrap();
        assert_eq!(second.moderation_mode, ModerationMode::ApprovedOnly);
        assert!(second.debug_mode);

        let _ = std::fs::remove_file(&path);
    }
}
