use std::time::Duration;

use serde::Serialize;

/// Body accepted by Discord-compatible webhooks.
#[derive(Debug, Serialize)]
struct WebhookMessage<'a> {
    content: &'a str,
}

/// Best-effort outbound webhook delivery. Sends happen on a spawned task so the
/// caller never waits on, or observes the failure of, the remote endpoint.
#[derive(Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
}

impl Default for WebhookNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl WebhookNotifier {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|err| {
                tracing::warn!(error = %err, "falling back to default webhook client");
                reqwest::Client::new()
            });
        Self { client }
    }

    /// Fires a webhook without waiting for it. Empty or missing URLs are a silent no-op.
    pub fn dispatch(&self, url: Option<String>, content: String) -> Option<tokio::task::JoinHandle<()>> {
        let url = url.filter(|u| !u.trim().is_empty())?;
        let notifier = self.clone();
        Some(tokio::spawn(async move {
            if let Err(err) = notifier.send(&url, &content).await {
                tracing::warn!(error = %err, "webhook notification failed");
            }
        }))
    }

    pub async fn send(&self, url: &str, content: &str) -> Result<(), reqwest::Error> {
        self.client
            .post(url)
            .json(&WebhookMessage { content })
            .send()
            .await?
            .error_for_status()?;
        tracing::debug!("webhook delivered");
        Ok(())
    }
}
