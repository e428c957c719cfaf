//! Mail Dispatchers
//!
//! Template rendering and SMTP delivery belong to the mail relay; this
//! crate only hands over the template id, recipient, locale and variables.

use std::time::Duration;

use crate::domain::entity::notification::Notification;
use crate::domain::repository::NotificationDispatcher;
use crate::error::DispatchError;

/// Writes every notification to the log instead of sending it.
///
/// Development only: the log line contains the one-time code.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDispatcher;

impl NotificationDispatcher for TracingDispatcher {
    async fn send(&self, notification: &Notification) -> Result<(), DispatchError> {
        tracing::info!(
            template = %notification.template,
            recipient = %notification.recipient,
            locale = %notification.locale_id,
            variables = ?notification.variables,
            "Mail (not sent)"
        );
        Ok(())
    }
}

/// Posts notifications as JSON to an HTTP mail relay
#[derive(Debug, Clone)]
pub struct RelayDispatcher {
    client: reqwest::Client,
    url: String,
}

impl RelayDispatcher {
    pub fn new(url: impl Into<String>) -> Result<Self, DispatchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl NotificationDispatcher for RelayDispatcher {
    async fn send(&self, notification: &Notification) -> Result<(), DispatchError> {
        let response = self
            .client
            .post(&self.url)
            .json(notification)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DispatchError::Transport(format!(
                "relay responded with {}",
                status
            )));
        }

        tracing::debug!(template = %notification.template, "Mail handed to relay");
        Ok(())
    }
}
