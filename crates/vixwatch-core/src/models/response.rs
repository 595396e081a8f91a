//! Response payloads returned by a check

use serde::Serialize;

use super::alert::{AlertDecision, EmailOutcome, Thresholds};

/// Quote value and the bounds it was compared against
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VixSummary {
    /// Latest VIX value
    pub value: f64,
    /// Bounds in effect for this check
    pub thresholds: Thresholds,
}

/// Body of a successful check
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuccessPayload {
    /// Always `true`
    pub success: bool,
    /// Localized completion time
    pub timestamp: String,
    /// Quote value and thresholds
    pub vix: VixSummary,
    /// Threshold decision
    pub alert: AlertDecision,
    /// `None` when no alert was triggered
    pub email: Option<EmailOutcome>,
}

/// Which email settings were present, reported on a configuration failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingConfigDetails {
    /// Recipient address is set
    pub alert_email: bool,
    /// Resend API key is set
    pub resend_key: bool,
}

/// Body of a failed check
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailurePayload {
    /// Always `false`
    pub success: bool,
    /// Failure message
    pub error: String,
    /// Localized failure time
    pub timestamp: String,
    /// Present for missing email settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<MissingConfigDetails>,
    /// Error chain, only in development mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

/// Serialized result of one check
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponsePayload {
    /// The cycle completed
    Success(SuccessPayload),
    /// The cycle aborted
    Failure(FailurePayload),
}

impl ResponsePayload {
    /// HTTP status that accompanies this payload
    pub fn status_code(&self) -> u16 {
        match self {
            ResponsePayload::Success(_) => 200,
            ResponsePayload::Failure(_) => 500,
        }
    }

    /// Whether the cycle completed
    pub fn is_success(&self) -> bool {
        matches!(self, ResponsePayload::Success(_))
    }
}
