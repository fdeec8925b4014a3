//! reqwest-backed Apprise API client

use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::metrics::GatewayMetrics;
use crate::options::PluginOptions;

use super::{build_payload, NotifyGateway, SendOutcome};

/// Upper bound on one gateway call.
pub const GATEWAY_TIMEOUT: Duration = Duration::from_secs(10);

/// Posts notifications to an Apprise API `/notify` endpoint.
///
/// One request per call: no retry, no backoff. Anything that goes wrong is
/// folded into the returned [`SendOutcome`].
#[derive(Clone, Default)]
pub struct AppriseClient {
    client: reqwest::Client,
}

impl AppriseClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured client (proxy, TLS roots, ...).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NotifyGateway for AppriseClient {
    #[tracing::instrument(name = "gateway.send", skip_all, fields(api_url = %options.api_url))]
    async fn send(&self, options: &PluginOptions, title: &str, body: &str) -> SendOutcome {
        let payload = match build_payload(options, title, body) {
            Ok(payload) => payload,
            Err(missing) => {
                tracing::warn!(missing = missing, "Gateway not configured, skipping send");
                let outcome = SendOutcome::NotConfigured(missing);
                GatewayMetrics::record_outcome(&outcome);
                return outcome;
            }
        };

        if options.debug_mode {
            tracing::info!(
                urls = %payload.urls,
                notify_type = %payload.notify_type,
                "Sending notification to gateway"
            );
        }

        let started = Instant::now();
        let result = self
            .client
            .post(&options.api_url)
            .timeout(GATEWAY_TIMEOUT)
            .json(&payload)
            .send()
            .await;

        let outcome = match result {
            Ok(response) => {
                let status = response.status().as_u16();
                let text = match response.text().await {
                    Ok(text) => text,
                    Err(e) => format!("[failed to read response body: {e}]"),
                };

                if status >= 400 {
                    SendOutcome::Rejected {
                        status,
                        response: text,
                    }
                } else {
                    SendOutcome::Delivered {
                        status,
                        response: text,
                    }
                }
            }
            Err(e) => SendOutcome::TransportError(e.to_string()),
        };

        GatewayMetrics::record_latency(started.elapsed());
        GatewayMetrics::record_outcome(&outcome);

        match &outcome {
            SendOutcome::Delivered { status, response } => {
                if options.debug_mode {
                    tracing::info!(status = status, response = %response, "Notification delivered");
                } else {
                    tracing::debug!(status = status, "Notification delivered");
                }
            }
            SendOutcome::Rejected { status, response } => {
                tracing::warn!(status = status, response = %response, "Gateway rejected notification");
            }
            SendOutcome::TransportError(error) => {
                tracing::warn!(error = %error, "Gateway request failed");
            }
            SendOutcome::NotConfigured(_) => {}
        }

        outcome
    }
}
