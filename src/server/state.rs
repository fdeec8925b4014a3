use std::sync::Arc;
use std::time::Instant;

use crate::attempt_log::AttemptLog;
use crate::config::Settings;
use crate::gateway::{AppriseClient, NotifyGateway};
use crate::hooks::CommentHooks;
use crate::notification::NotificationDispatcher;
use crate::options::{FileOptionsSource, OptionsSource};
use crate::postgres::PostgresPool;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub hooks: CommentHooks,
    pub attempt_log: Arc<dyn AttemptLog>,
    pub postgres_pool: Option<Arc<PostgresPool>>,
    pub start_time: Instant,
}

impl AppState {
    /// State wired to the options file named in `settings` and the real
    /// gateway client.
    pub fn new(
        settings: Settings,
        attempt_log: Arc<dyn AttemptLog>,
        postgres_pool: Option<Arc<PostgresPool>>,
    ) -> Self {
        let options: Arc<dyn OptionsSource> =
            Arc::new(FileOptionsSource::new(&settings.plugin.options_path));
        let gateway: Arc<dyn NotifyGateway> = Arc::new(AppriseClient::new());

        Self::with_components(settings, options, gateway, attempt_log, postgres_pool)
    }

    /// State from explicit components (embedding, tests).
    pub fn with_components(
        settings: Settings,
        options: Arc<dyn OptionsSource>,
        gateway: Arc<dyn NotifyGateway>,
        attempt_log: Arc<dyn AttemptLog>,
        postgres_pool: Option<Arc<PostgresPool>>,
    ) -> Self {
        let dispatcher = NotificationDispatcher::new(gateway, attempt_log.clone());

        Self {
            settings: Arc::new(settings),
            hooks: CommentHooks::new(options, dispatcher),
            attempt_log,
            postgres_pool,
            start_time: Instant::now(),
        }
    }
}
