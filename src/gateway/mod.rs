//! Push-notification gateway client.
//!
//! The gateway is an Apprise API endpoint: one POST fans out to every
//! destination URL listed in the payload.

mod client;

pub use client::{AppriseClient, GATEWAY_TIMEOUT};

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;

use crate::options::{NotifyType, PluginOptions};

/// JSON body posted to the gateway.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GatewayPayload {
    /// Comma-joined destination URLs
    pub urls: String,
    pub title: String,
    pub body: String,
    #[serde(rename = "type")]
    pub notify_type: NotifyType,
}

/// Result of a single send attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// Gateway answered with a status below 400
    Delivered { status: u16, response: String },

    /// Gateway URL or destination list missing; no request was made
    NotConfigured(&'static str),

    /// Gateway answered with status >= 400
    Rejected { status: u16, response: String },

    /// Connection, timeout or other transport error
    TransportError(String),
}

impl SendOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SendOutcome::Delivered { .. })
    }

    /// Short label for metrics and logs.
    pub fn label(&self) -> &'static str {
        match self {
            SendOutcome::Delivered { .. } => "delivered",
            SendOutcome::NotConfigured(_) => "not_configured",
            SendOutcome::Rejected { .. } => "rejected",
            SendOutcome::TransportError(_) => "transport_error",
        }
    }
}

impl fmt::Display for SendOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendOutcome::Delivered { status, .. } => write!(f, "delivered (HTTP {status})"),
            SendOutcome::NotConfigured(what) => write!(f, "{what} not configured"),
            SendOutcome::Rejected { status, .. } => write!(f, "gateway rejected (HTTP {status})"),
            SendOutcome::TransportError(e) => write!(f, "transport error: {e}"),
        }
    }
}

/// Sends a rendered notification through the gateway described by `options`.
#[async_trait]
pub trait NotifyGateway: Send + Sync {
    async fn send(&self, options: &PluginOptions, title: &str, body: &str) -> SendOutcome;
}

/// Build the gateway payload, or report which setting is missing.
pub fn build_payload(
    options: &PluginOptions,
    title: &str,
    body: &str,
) -> Result<GatewayPayload, &'static str> {
    if options.api_url.trim().is_empty() {
        return Err("gateway URL");
    }

    let destinations = options.destination_urls();
    if destinations.is_empty() {
        return Err("destination URLs");
    }

    Ok(GatewayPayload {
        urls: destinations.join(","),
        title: title.to_string(),
        body: body.to_string(),
        notify_type: options.notify_type,
    })
}
