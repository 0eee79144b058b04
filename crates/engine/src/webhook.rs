//! Webhook notifier (spec.md §6 "Webhook outbound"): `POST <url>` with
//! `{ event, timestamp, data }`, retried up to 3 times with exponential
//! backoff on network errors.

use serde::Serialize;
use std::time::Duration;
use tracing::warn;

const MAX_ATTEMPTS: u32 = 3;
const BASE_BACKOFF: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookEvent {
    JobSuccess,
    JobFailed,
}

#[derive(Serialize)]
struct WebhookPayload<'a, T: Serialize> {
    event: WebhookEvent,
    timestamp: chrono::DateTime<chrono::Utc>,
    data: &'a T,
}

#[derive(Clone)]
pub struct WebhookNotifier {
    url: String,
    client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_default(),
        }
    }

    /// Fire-and-forget from the worker's point of view: failures are
    /// logged, never propagated (a webhook outage must not fail a job).
    pub async fn notify<T: Serialize>(&self, event: WebhookEvent, data: &T, now: chrono::DateTime<chrono::Utc>) {
        let payload = WebhookPayload { event, timestamp: now, data };

        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.client.post(&self.url).json(&payload).send().await {
                Ok(response) if response.status().is_success() => return,
                Ok(response) => {
                    warn!(url = %self.url, status = %response.status(), attempt, "webhook rejected");
                }
                Err(err) => {
                    warn!(url = %self.url, error = %err, attempt, "webhook request failed");
                }
            }
            if attempt >= MAX_ATTEMPTS {
                warn!(url = %self.url, "webhook exhausted retries, giving up");
                return;
            }
            tokio::time::sleep(BASE_BACKOFF * 2u32.pow(attempt - 1)).await;
        }
    }
}

#[cfg(test)]
#[path = "webhook_tests.rs"]
mod tests;
