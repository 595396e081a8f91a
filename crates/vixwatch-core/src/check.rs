//! One monitoring cycle
//!
//! [`AlertCheck`] resolves the email settings, fetches the quote, evaluates the
//! thresholds, sends at most one email and assembles the response. Quote
//! failures end the cycle; email failures are folded into the response.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::alerting::{AlertEvaluator, EmailMessage, EmailSender, ResendNotifier};
use crate::clock::{localized, Clock, SystemClock};
use crate::config::{Config, MissingEmailPolicy};
use crate::error::{Error, Result};
use crate::models::{
    AlertDecision, EmailOutcome, FailurePayload, MissingConfigDetails, QuoteSnapshot,
    ResponsePayload, SuccessPayload, Thresholds, VixSummary,
};
use crate::provider::{QuoteProvider, YahooQuoteProvider};

/// Typed outcome of a successful cycle
#[derive(Debug, Clone)]
pub struct CheckReport {
    /// Quote the decision was made on
    pub quote: QuoteSnapshot,
    /// Bounds in effect
    pub thresholds: Thresholds,
    /// Threshold decision
    pub decision: AlertDecision,
    /// `None` when the decision was not triggered
    pub email: Option<EmailOutcome>,
    /// When the quote was evaluated
    pub checked_at: DateTime<Utc>,
}

/// The monitoring handler
pub struct AlertCheck {
    config: Config,
    evaluator: AlertEvaluator,
    provider: Arc<dyn QuoteProvider>,
    sender: Arc<dyn EmailSender>,
    clock: Arc<dyn Clock>,
}

impl AlertCheck {
    /// Create a check with explicit collaborators
    pub fn new(
        config: Config,
        provider: Arc<dyn QuoteProvider>,
        sender: Arc<dyn EmailSender>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let evaluator = AlertEvaluator::new(Thresholds::new(
            config.alert.upper_threshold,
            config.alert.lower_threshold,
        ));

        Self {
            config,
            evaluator,
            provider,
            sender,
            clock,
        }
    }

    /// Create a check backed by Yahoo Finance, Resend and the wall clock
    pub fn from_config(config: Config) -> Result<Self> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let provider = YahooQuoteProvider::new(&config.quote, clock.clone())?;
        let sender = ResendNotifier::new(&config.email)?;

        Ok(Self::new(config, Arc::new(provider), Arc::new(sender), clock))
    }

    /// Configuration this check runs with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run one cycle and return its typed outcome
    #[tracing::instrument(name = "vix_check", skip(self), fields(check_id = %Uuid::new_v4()))]
    pub async fn run(&self) -> Result<CheckReport> {
        let thresholds = self.evaluator.thresholds();
        let recipient = self.config.alert.alert_email.as_deref();
        let has_key = self.config.email.api_key.is_some();

        info!(
            upper = thresholds.upper,
            lower = thresholds.lower,
            alert_email = if recipient.is_some() { "set" } else { "missing" },
            resend_key = if has_key { "set" } else { "missing" },
            policy = ?self.config.alert.missing_email_policy,
            "Environment check"
        );

        if (recipient.is_none() || !has_key)
            && self.config.alert.missing_email_policy == MissingEmailPolicy::Strict
        {
            error!("Missing required environment variables");
            return Err(Error::ConfigurationMissing {
                alert_email: recipient.is_some(),
                email_api_key: has_key,
            });
        }

        info!("Starting VIX data fetch");
        let quote = self.provider.latest_quote().await.map_err(|e| {
            error!(stage = "quote", kind = ?e.kind(), error = %e, "Quote retrieval failed");
            e
        })?;
        let checked_at = self.clock.now();

        info!(
            value = quote.value,
            lower = thresholds.lower,
            upper = thresholds.upper,
            "Current VIX"
        );

        let decision = self.evaluator.evaluate(quote.value);
        info!(triggered = decision.triggered, kind = %decision.kind, "Alert needed");

        let email = if decision.triggered {
            Some(self.notify(&decision, &quote, checked_at).await)
        } else {
            None
        };

        info!("Check completed");
        Ok(CheckReport {
            quote,
            thresholds,
            decision,
            email,
            checked_at,
        })
    }

    /// Run one cycle and render it as a response payload
    pub async fn handle(&self) -> ResponsePayload {
        match self.run().await {
            Ok(report) => ResponsePayload::Success(self.success_payload(report)),
            Err(err) => {
                error!(kind = ?err.kind(), error = %err, "Fatal error in VIX check");
                ResponsePayload::Failure(self.failure_payload(&err))
            }
        }
    }

    async fn notify(
        &self,
        decision: &AlertDecision,
        quote: &QuoteSnapshot,
        checked_at: DateTime<Utc>,
    ) -> EmailOutcome {
        let recipient = self.config.alert.alert_email.as_deref();
        let has_key = self.config.email.api_key.is_some();

        let Some(to) = recipient.filter(|_| has_key) else {
            let mut missing = Vec::new();
            if recipient.is_none() {
                missing.push("ALERT_EMAIL");
            }
            if !has_key {
                missing.push("RESEND_API_KEY");
            }
            warn!(missing = ?missing, "Alert triggered but email settings are absent");
            return EmailOutcome::skipped(&missing);
        };

        let message = EmailMessage::for_alert(
            &self.config.email.from,
            to,
            decision,
            quote.value,
            self.evaluator.thresholds(),
            &self.timestamp(checked_at),
        );

        match self.sender.send(&message).await {
            Ok(receipt) => {
                info!(email_id = ?receipt.id, "Email sent successfully");
                EmailOutcome::delivered(receipt.id)
            }
            Err(e) => {
                error!(
                    stage = "email",
                    value = quote.value,
                    kind = %decision.kind,
                    error = %e,
                    "Email sending failed"
                );
                EmailOutcome::failed(e.to_string())
            }
        }
    }

    fn success_payload(&self, report: CheckReport) -> SuccessPayload {
        SuccessPayload {
            success: true,
            timestamp: self.timestamp(report.checked_at),
            vix: VixSummary {
                value: report.quote.value,
                thresholds: report.thresholds,
            },
            alert: report.decision,
            email: report.email,
        }
    }

    fn failure_payload(&self, err: &Error) -> FailurePayload {
        let details = match err {
            Error::ConfigurationMissing {
                alert_email,
                email_api_key,
            } => Some(MissingConfigDetails {
                alert_email: *alert_email,
                resend_key: *email_api_key,
            }),
            _ => None,
        };

        FailurePayload {
            success: false,
            error: err.to_string(),
            timestamp: self.timestamp(self.clock.now()),
            details,
            stack: self.config.runtime.is_development().then(|| err.chain()),
        }
    }

    fn timestamp(&self, ts: DateTime<Utc>) -> String {
        localized(ts, self.config.runtime.utc_offset_hours)
    }
}
