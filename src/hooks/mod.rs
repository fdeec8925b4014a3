//! Entry points for the host's comment hooks.
//!
//! Both hooks hand the comment back untouched whatever happens inside: a
//! notification problem must never reach the host's comment write path.
//!
//! # Example
//!
//! ```ignore
//! let hooks = CommentHooks::new(options_source, dispatcher);
//! let comment = hooks.on_comment_created(comment, Some("Post title")).await;
//! ```

use std::sync::Arc;

use crate::comment::{Comment, CommentStatus};
use crate::metrics::DispatchMetrics;
use crate::notification::{DispatchReport, NotificationDispatcher, TestNotificationResult};
use crate::options::{OptionsSource, PluginOptions};
use crate::policy::{decide_on_create, decide_on_edit, Decision};

#[derive(Clone)]
pub struct CommentHooks {
    options: Arc<dyn OptionsSource>,
    dispatcher: NotificationDispatcher,
}

impl CommentHooks {
    pub fn new(options: Arc<dyn OptionsSource>, dispatcher: NotificationDispatcher) -> Self {
        Self {
            options,
            dispatcher,
        }
    }

    pub fn dispatcher(&self) -> &NotificationDispatcher {
        &self.dispatcher
    }

    /// Comment-created hook. Returns `comment` unchanged.
    pub async fn on_comment_created(&self, comment: Comment, post_title: Option<&str>) -> Comment {
        let options = self.load_options().await;
        let report = self.handle_created(&options, &comment, post_title).await;
        log_report("created", &comment, &options, &report);
        comment
    }

    /// Comment-edited hook. Returns `comment` unchanged.
    pub async fn on_comment_edited(
        &self,
        comment: Comment,
        previous_status: Option<CommentStatus>,
        post_title: Option<&str>,
    ) -> Comment {
        let options = self.load_options().await;
        let report = self
            .handle_edited(&options, &comment, previous_status, post_title)
            .await;
        log_report("edited", &comment, &options, &report);
        comment
    }

    /// Creation-time policy plus pipeline.
    pub async fn handle_created(
        &self,
        options: &PluginOptions,
        comment: &Comment,
        post_title: Option<&str>,
    ) -> DispatchReport {
        let status = comment.effective_status();

        match decide_on_create(status, options.moderation_mode) {
            Decision::Skip(reason) => DispatchReport::Skipped { reason },
            Decision::Send(set) => {
                self.dispatcher
                    .dispatch(options, comment, post_title, set)
                    .await
            }
        }
    }

    /// Edit-time transition policy plus pipeline.
    pub async fn handle_edited(
        &self,
        options: &PluginOptions,
        comment: &Comment,
        previous_status: Option<CommentStatus>,
        post_title: Option<&str>,
    ) -> DispatchReport {
        match decide_on_edit(previous_status, comment.status, options.moderation_mode) {
            Decision::Skip(reason) => DispatchReport::Skipped { reason },
            Decision::Send(set) => {
                if options.debug_mode {
                    tracing::info!(
                        coid = comment.coid,
                        previous = ?previous_status,
                        "Comment approved, notifying"
                    );
                }
                self.dispatcher
                    .dispatch(options, comment, post_title, set)
                    .await
            }
        }
    }

    /// Manual test action from the admin screen.
    pub async fn send_test_notification(&self) -> TestNotificationResult {
        let options = self.load_options().await;
        self.dispatcher.send_test(&options).await
    }

    /// Current options, or defaults when they cannot be read.
    async fn load_options(&self) -> PluginOptions {
        match self.options.load().await {
            Ok(options) => options,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load plugin options, using defaults");
                PluginOptions::default()
            }
        }
    }
}

fn log_report(event: &str, comment: &Comment, options: &PluginOptions, report: &DispatchReport) {
    DispatchMetrics::record(event, report.label());

    match report {
        DispatchReport::Delivered { attempt_id, .. } => {
            tracing::info!(event, coid = comment.coid, attempt_id = ?attempt_id, "Comment notification sent");
        }
        DispatchReport::Failed { message, .. } if options.debug_mode => {
            tracing::warn!(event, coid = comment.coid, error = %message, "Comment notification failed");
        }
        _ if options.debug_mode => {
            tracing::info!(event, coid = comment.coid, report = %report, "Comment hook finished");
        }
        _ => {
            tracing::debug!(event, coid = comment.coid, report = %report, "Comment hook finished");
        }
    }
}
