//! Notification dispatch pipeline.
//!
//! `NotificationDispatcher` renders the selected template set, records the
//! attempt, calls the gateway and records the outcome. It reports back with a
//! [`DispatchReport`] instead of failing, so callers decide how loudly to log.

mod dispatcher;

pub use dispatcher::{DispatchReport, NotificationDispatcher, TestNotificationResult};
