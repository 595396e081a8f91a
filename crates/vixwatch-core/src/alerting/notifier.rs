//! Email delivery for alerts

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::EmailConfig;
use crate::error::{Error, Result};
use crate::models::{AlertDecision, AlertKind, Thresholds};

/// An email ready to hand to a provider
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailMessage {
    /// Sender address
    pub from: String,
    /// Recipients
    pub to: Vec<String>,
    /// Subject line
    pub subject: String,
    /// HTML body
    pub html: String,
}

impl EmailMessage {
    /// Build the alert email for a triggered decision
    pub fn for_alert(
        from: &str,
        to: &str,
        decision: &AlertDecision,
        value: f64,
        thresholds: Thresholds,
        detected_at: &str,
    ) -> Self {
        let (color, threshold_label) = match decision.kind {
            AlertKind::High => ("#dc3545", format!("{}+", thresholds.upper)),
            _ => ("#28a745", format!("{}-", thresholds.lower)),
        };
        let kind = decision.kind;

        let html = format!(
            r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2 style="color: {color};">VIX {kind} Alert</h2>
  <div style="background: #f8f9fa; padding: 20px; border-radius: 8px; margin: 20px 0;">
    <p><strong>Current VIX Value:</strong> {value:.2}</p>
    <p><strong>Threshold:</strong> {threshold_label}</p>
    <p><strong>Detection Time:</strong> {detected_at}</p>
  </div>
  <p>{message}</p>
  <hr>
  <p style="font-size: 12px; color: #666;">This alert was automatically sent by VIX Alert System.</p>
</div>"#,
            message = decision.message,
        );

        Self {
            from: from.to_string(),
            to: vec![to.to_string()],
            subject: format!("VIX {kind} Alert - {value:.2}"),
            html,
        }
    }
}

/// Provider acknowledgement of an accepted email
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendReceipt {
    /// Provider-assigned message id
    pub id: Option<String>,
}

/// Sends alert emails
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Send one message; failures are `Error::EmailSendFailure`
    async fn send(&self, message: &EmailMessage) -> Result<SendReceipt>;
}

/// Sends email through the Resend HTTP API
pub struct ResendNotifier {
    client: Client,
    api_url: String,
    api_key: Option<String>,
}

impl ResendNotifier {
    /// Create a new notifier
    pub fn new(config: &EmailConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to create email HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl EmailSender for ResendNotifier {
    async fn send(&self, message: &EmailMessage) -> Result<SendReceipt> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| Error::email("Resend API key is not configured"))?;

        let response = self
            .client
            .post(format!("{}/emails", self.api_url))
            .bearer_auth(api_key)
            .json(message)
            .send()
            .await
            .map_err(|e| Error::email(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::email(format!("Resend returned {}: {}", status, body)));
        }

        let id = match response.json::<ResendResponse>().await {
            Ok(body) => body.id,
            Err(e) => {
                warn!(error = %e, "Resend accepted the email but the response had no id");
                None
            }
        };

        info!(email_id = ?id, recipients = ?message.to, "Email notification sent");
        Ok(SendReceipt { id })
    }
}

#[derive(Debug, Deserialize)]
struct ResendResponse {
    id: Option<String>,
}
