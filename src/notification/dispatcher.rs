use std::fmt;
use std::sync::Arc;

use chrono::Local;
use serde::Serialize;

use crate::attempt_log::AttemptLog;
use crate::comment::Comment;
use crate::gateway::{NotifyGateway, SendOutcome};
use crate::options::PluginOptions;
use crate::policy::{SkipReason, TemplateSet};
use crate::template::{NotificationFields, DEFAULT_BLOG_TITLE};

/// What happened to one comment event.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchReport {
    /// Policy decided not to notify
    Skipped { reason: SkipReason },

    /// Gateway accepted the notification
    Delivered { attempt_id: Option<i64>, title: String },

    /// Pipeline stopped early or the gateway call failed
    Failed {
        attempt_id: Option<i64>,
        message: String,
    },
}

impl DispatchReport {
    pub fn is_success(&self) -> bool {
        matches!(self, DispatchReport::Delivered { .. })
    }

    /// Short label for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            DispatchReport::Skipped { .. } => "skipped",
            DispatchReport::Delivered { .. } => "sent",
            DispatchReport::Failed { .. } => "failed",
        }
    }
}

impl fmt::Display for DispatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchReport::Skipped { reason } => write!(f, "skipped: {reason}"),
            DispatchReport::Delivered { title, .. } => write!(f, "delivered \"{title}\""),
            DispatchReport::Failed { message, .. } => write!(f, "failed: {message}"),
        }
    }
}

/// Result of the manual test action, shown to the admin.
#[derive(Debug, Clone, Serialize)]
pub struct TestNotificationResult {
    pub success: bool,
    pub message: String,
}

/// Runs the render → log → send → log pipeline for one comment.
#[derive(Clone)]
pub struct NotificationDispatcher {
    gateway: Arc<dyn NotifyGateway>,
    attempt_log: Arc<dyn AttemptLog>,
}

impl NotificationDispatcher {
    pub fn new(gateway: Arc<dyn NotifyGateway>, attempt_log: Arc<dyn AttemptLog>) -> Self {
        Self {
            gateway,
            attempt_log,
        }
    }

    pub fn attempt_log(&self) -> &Arc<dyn AttemptLog> {
        &self.attempt_log
    }

    /// Render the `set` templates for `comment` and send them.
    ///
    /// The attempt row is written before the gateway call and updated once
    /// it resolves. Attempt-log failures never stop the send.
    #[tracing::instrument(
        name = "notification.dispatch",
        skip_all,
        fields(coid = comment.coid, cid = comment.cid, template_set = ?set)
    )]
    pub async fn dispatch(
        &self,
        options: &PluginOptions,
        comment: &Comment,
        post_title: Option<&str>,
        set: TemplateSet,
    ) -> DispatchReport {
        if comment.cid <= 0 {
            return DispatchReport::Failed {
                attempt_id: None,
                message: format!("invalid content id {}", comment.cid),
            };
        }

        let fields = NotificationFields::from_comment(comment, post_title, &options.site());
        let (title_template, body_template) = options.templates(set);
        let rendered = fields.render(title_template, body_template);

        if options.debug_mode {
            tracing::info!(
                title = %rendered.title,
                body_len = rendered.body.len(),
                "Rendered notification"
            );
        }

        let attempt_id = self
            .attempt_log
            .record_start(comment.coid, &rendered.title, &rendered.body)
            .await;

        let outcome = self
            .gateway
            .send(options, &rendered.title, &rendered.body)
            .await;

        self.attempt_log
            .record_outcome(comment.coid, outcome.is_success())
            .await;

        if outcome.is_success() {
            DispatchReport::Delivered {
                attempt_id,
                title: rendered.title,
            }
        } else {
            DispatchReport::Failed {
                attempt_id,
                message: outcome.to_string(),
            }
        }
    }

    /// Send a fixed test message with the current options. Not logged to the
    /// attempt log.
    pub async fn send_test(&self, options: &PluginOptions) -> TestNotificationResult {
        let blog_title = if options.site_title.is_empty() {
            DEFAULT_BLOG_TITLE
        } else {
            options.site_title.as_str()
        };
        let title = format!("测试通知 - {blog_title}");
        let body = format!(
            "这是一条测试消息，发送时间: {}",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        );

        tracing::info!(api_url = %options.api_url, "Sending test notification");
        let outcome = self.gateway.send(options, &title, &body).await;

        match outcome {
            SendOutcome::Delivered { .. } => TestNotificationResult {
                success: true,
                message: "测试通知发送成功！".to_string(),
            },
            failed => {
                tracing::warn!(outcome = %failed, "Test notification failed");
                TestNotificationResult {
                    success: false,
                    message: format!("测试通知发送失败，请检查配置和日志 ({failed})"),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::attempt_log::{AttemptLogError, MemoryAttemptLog, NotificationAttempt};
    use crate::comment::CommentStatus;

    /// Gateway double that records calls and answers with a fixed outcome.
    struct RecordingGateway {
        outcome: SendOutcome,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl RecordingGateway {
        fn answering(outcome: SendOutcome) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl NotifyGateway for RecordingGateway {
        async fn send(&self, _options: &PluginOptions, title: &str, body: &str) -> SendOutcome {
            self.calls
                .lock()
                .unwrap()
                .push((title.to_string(), body.to_string()));
            self.outcome.clone()
        }
    }

    /// Attempt log whose writes are all lost, as with an unreachable database.
    #[derive(Default)]
    struct UnwritableLog {
        outcomes: Mutex<Vec<(i64, bool)>>,
    }

    #[async_trait]
    impl AttemptLog for UnwritableLog {
        fn backend_type(&self) -> &'static str {
            "unwritable"
        }

        async fn record_start(&self, _comment_id: i64, _title: &str, _body: &str) -> Option<i64> {
            None
        }

        async fn record_outcome(&self, comment_id: i64, success: bool) {
            self.outcomes.lock().unwrap().push((comment_id, success));
        }

        async fn recent(
            &self,
            _comment_id: Option<i64>,
            _limit: usize,
        ) -> Result<Vec<NotificationAttempt>, AttemptLogError> {
            Err(AttemptLogError::Unavailable("connection refused".into()))
        }
    }

    fn delivered() -> SendOutcome {
        SendOutcome::Delivered {
            status: 200,
            response: String::new(),
        }
    }

    fn options() -> PluginOptions {
        PluginOptions {
            site_title: "My Blog".to_string(),
            site_url: "https://x.io/blog".to_string(),
            notify_urls: "json://hook".to_string(),
            approved_title_template: "{blogTitle}: {title}".to_string(),
            approved_body_template: "{author} said {content} at {permalink}".to_string(),
            ..Default::default()
        }
    }

    fn comment() -> Comment {
        Comment {
            coid: 7,
            cid: 42,
            author: Some("alice".to_string()),
            text: Some("hi".to_string()),
            status: Some(CommentStatus::Approved),
        }
    }

    #[tokio::test]
    async fn test_dispatch_renders_and_logs_success() {
        let gateway = RecordingGateway::answering(delivered());
        let log = Arc::new(MemoryAttemptLog::new());
        let dispatcher = NotificationDispatcher::new(gateway.clone(), log.clone());

        let report = dispatcher
            .dispatch(&options(), &comment(), Some("Hello"), TemplateSet::Approved)
            .await;

        assert!(report.is_success());
        let calls = gateway.calls.lock().unwrap().clone();
        assert_eq!(
            calls,
            vec![(
                "My Blog: Hello".to_string(),
                "alice said hi at https://x.io/blog?cid=42#comment-7".to_string()
            )]
        );

        let rows = log.snapshot();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].comment_id, Some(7));
        assert_eq!(rows[0].title, "My Blog: Hello");
        assert_eq!(rows[0].status, "success");
    }

    #[tokio::test]
    async fn test_dispatch_gateway_failure_marks_row() {
        let gateway = RecordingGateway::answering(SendOutcome::Rejected {
            status: 500,
            response: "boom".to_string(),
        });
        let log = Arc::new(MemoryAttemptLog::new());
        let dispatcher = NotificationDispatcher::new(gateway, log.clone());

        let report = dispatcher
            .dispatch(&options(), &comment(), None, TemplateSet::Pending)
            .await;

        assert_eq!(report.label(), "failed");
        assert_eq!(log.snapshot()[0].status, "failure");
    }

    #[tokio::test]
    async fn test_dispatch_continues_when_log_writes_fail() {
        let gateway = RecordingGateway::answering(delivered());
        let log = Arc::new(UnwritableLog::default());
        let dispatcher = NotificationDispatcher::new(gateway.clone(), log.clone());

        let report = dispatcher
            .dispatch(&options(), &comment(), Some("Hello"), TemplateSet::Approved)
            .await;

        assert_eq!(
            report,
            DispatchReport::Delivered {
                attempt_id: None,
                title: "My Blog: Hello".to_string()
            }
        );
        assert_eq!(gateway.calls.lock().unwrap().len(), 1);
        assert_eq!(*log.outcomes.lock().unwrap(), vec![(7, true)]);
    }

    #[tokio::test]
    async fn test_dispatch_failure_reported_when_log_writes_fail() {
        let gateway = RecordingGateway::answering(SendOutcome::TransportError(
            "connection refused".to_string(),
        ));
        let log = Arc::new(UnwritableLog::default());
        let dispatcher = NotificationDispatcher::new(gateway.clone(), log.clone());

        let report = dispatcher
            .dispatch(&options(), &comment(), None, TemplateSet::Pending)
            .await;

        match report {
            DispatchReport::Failed {
                attempt_id,
                message,
            } => {
                assert_eq!(attempt_id, None);
                assert!(message.contains("connection refused"));
            }
            other => panic!("unexpected report: {other:?}"),
        }
        assert_eq!(gateway.calls.lock().unwrap().len(), 1);
        assert_eq!(*log.outcomes.lock().unwrap(), vec![(7, false)]);
    }

    #[tokio::test]
    async fn test_dispatch_rejects_missing_content_id() {
        let gateway = RecordingGateway::answering(delivered());
        let log = Arc::new(MemoryAttemptLog::new());
        let dispatcher = NotificationDispatcher::new(gateway.clone(), log.clone());

        let orphan = Comment {
            cid: 0,
            ..comment()
        };
        let report = dispatcher
            .dispatch(&options(), &orphan, None, TemplateSet::Approved)
            .await;

        assert!(matches!(report, DispatchReport::Failed { attempt_id: None, .. }));
        assert!(gateway.calls.lock().unwrap().is_empty());
        assert!(log.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_send_test_reports_result() {
        let ok = NotificationDispatcher::new(
            RecordingGateway::answering(delivered()),
            Arc::new(MemoryAttemptLog::new()),
        );
        let result = ok.send_test(&options()).await;
        assert!(result.success);

        let gateway = RecordingGateway::answering(SendOutcome::NotConfigured("destination URLs"));
        let log = Arc::new(MemoryAttemptLog::new());
        let failing = NotificationDispatcher::new(gateway.clone(), log.clone());
        let result = failing.send_test(&options()).await;
        assert!(!result.success);
        assert!(result.message.contains("destination URLs"));

        let calls = gateway.calls.lock().unwrap().clone();
        assert_eq!(calls[0].0, "测试通知 - My Blog");
        assert!(log.snapshot().is_empty());
    }
}
