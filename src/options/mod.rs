//! Per-dispatch plugin options.
//!
//! Options are read through an [`OptionsSource`] at the start of every
//! dispatch; nothing is cached between calls.

mod source;

pub use source::{FileOptionsSource, OptionsError, OptionsSource, StaticOptionsSource};

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::policy::{ModerationMode, TemplateSet};
use crate::template::SiteInfo;

pub const DEFAULT_GATEWAY_URL: &str = "http://localhost:8000/notify";
pub const DEFAULT_PENDING_TITLE: &str = "{blogTitle} 有新评论待审核";
pub const DEFAULT_PENDING_BODY: &str = "《{title}》\n称呼：{author}\n内容：{content}";
pub const DEFAULT_APPROVED_TITLE: &str = "{blogTitle} 收到了新评论";
pub const DEFAULT_APPROVED_BODY: &str =
    "《{title}》\n称呼：{author}\n内容：{content}\n链接：{permalink}";

/// Apprise notification type tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyType {
    #[default]
    Info,
    Success,
    Warning,
    Failure,
}

impl NotifyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotifyType::Info => "info",
            NotifyType::Success => "success",
            NotifyType::Warning => "warning",
            NotifyType::Failure => "failure",
        }
    }
}

impl fmt::Display for NotifyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options managed by the host's settings screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginOptions {
    /// Gateway notify endpoint
    pub api_url: String,

    /// Destination URLs, one per line
    pub notify_urls: String,

    pub notify_type: NotifyType,

    pub moderation_mode: ModerationMode,

    pub pending_title_template: String,
    pub pending_body_template: String,
    pub approved_title_template: String,
    pub approved_body_template: String,

    /// Accepts `"0"`/`"1"` as the host stores it, or a boolean
    #[serde(deserialize_with = "deserialize_flag")]
    pub debug_mode: bool,

    /// Blog title for `{blogTitle}`
    pub site_title: String,

    /// Blog base URL for `{permalink}`
    pub site_url: String,
}

impl Default for PluginOptions {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_GATEWAY_URL.to_string(),
            notify_urls: String::new(),
            notify_type: NotifyType::default(),
            moderation_mode: ModerationMode::default(),
            pending_title_template: DEFAULT_PENDING_TITLE.to_string(),
            pending_body_template: DEFAULT_PENDING_BODY.to_string(),
            approved_title_template: DEFAULT_APPROVED_TITLE.to_string(),
            approved_body_template: DEFAULT_APPROVED_BODY.to_string(),
            debug_mode: false,
            site_title: String::new(),
            site_url: String::new(),
        }
    }
}

impl PluginOptions {
    /// Destination URLs split on newlines, trimmed, blanks dropped.
    pub fn destination_urls(&self) -> Vec<&str> {
        self.notify_urls
            .split('\n')
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .collect()
    }

    /// (title, body) templates for a template set.
    pub fn templates(&self, set: TemplateSet) -> (&str, &str) {
        match set {
            TemplateSet::Pending => (&self.pending_title_template, &self.pending_body_template),
            TemplateSet::Approved => (&self.approved_title_template, &self.approved_body_template),
        }
    }

    pub fn site(&self) -> SiteInfo {
        SiteInfo {
            title: self.site_title.clone(),
            url: self.site_url.clone(),
        }
    }
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Int(n) => n == 1,
        Flag::Text(s) => matches!(s.trim(), "1" | "true" | "on"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_values() {
        let options = PluginOptions::default();
        assert_eq!(options.api_url, "http://localhost:8000/notify");
        assert_eq!(options.notify_type, NotifyType::Info);
        assert_eq!(options.moderation_mode, ModerationMode::PendingOnly);
        assert!(!options.debug_mode);
        assert!(options.pending_body_template.ends_with("{content}"));
    }

    #[test]
    fn test_destination_urls_filtering() {
        let options = PluginOptions {
            notify_urls: "  tgram://bot/chat \n\n\t\nmailto://u:p@gmail.com\r\n   ".to_string(),
            ..Default::default()
        };
        assert_eq!(
            options.destination_urls(),
            vec!["tgram://bot/chat", "mailto://u:p@gmail.com"]
        );

        let blank = PluginOptions {
            notify_urls: " \n \n".to_string(),
            ..Default::default()
        };
        assert!(blank.destination_urls().is_empty());
    }

    #[test]
    fn test_debug_flag_forms() {
        let from_text: PluginOptions = serde_json::from_value(json!({ "debug_mode": "1" })).unwrap();
        let from_zero: PluginOptions = serde_json::from_value(json!({ "debug_mode": "0" })).unwrap();
        let from_bool: PluginOptions = serde_json::from_value(json!({ "debug_mode": true })).unwrap();
        assert!(from_text.debug_mode);
        assert!(!from_zero.debug_mode);
        assert!(from_bool.debug_mode);
    }

    #[test]
    fn test_partial_options_keep_defaults() {
        let options: PluginOptions = serde_json::from_value(json!({
            "moderation_mode": "approved_only",
            "notify_type": "warning"
        }))
        .unwrap();
        assert_eq!(options.moderation_mode, ModerationMode::ApprovedOnly);
        assert_eq!(options.notify_type, NotifyType::Warning);
        assert_eq!(options.approved_title_template, DEFAULT_APPROVED_TITLE);
    }

    #[test]
    fn test_templates_by_set() {
        let options = PluginOptions::default();
        assert_eq!(
            options.templates(TemplateSet::Pending),
            (DEFAULT_PENDING_TITLE, DEFAULT_PENDING_BODY)
        );
        assert_eq!(
            options.templates(TemplateSet::Approved),
            (DEFAULT_APPROVED_TITLE, DEFAULT_APPROVED_BODY)
        );
    }
}
