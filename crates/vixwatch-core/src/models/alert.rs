//! Alert data models

use serde::{Deserialize, Serialize};

/// Which bound, if any, the quote breached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertKind {
    /// Within range
    #[default]
    None,
    /// At or above the upper threshold
    High,
    /// At or below the lower threshold
    Low,
}

impl AlertKind {
    /// Uppercase label used in subjects and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::None => "NONE",
            AlertKind::High => "HIGH",
            AlertKind::Low => "LOW",
        }
    }
}

impl std::fmt::Display for AlertKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configured alert bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Upper bound (inclusive)
    pub upper: f64,
    /// Lower bound (inclusive)
    pub lower: f64,
}

impl Thresholds {
    /// Create a threshold pair
    pub fn new(upper: f64, lower: f64) -> Self {
        Self { upper, lower }
    }

    /// Classify a value; the upper bound wins when the two overlap
    pub fn classify(&self, value: f64) -> AlertKind {
        if value >= self.upper {
            AlertKind::High
        } else if value <= self.lower {
            AlertKind::Low
        } else {
            AlertKind::None
        }
    }

    /// The bound that `kind` refers to
    pub fn bound_for(&self, kind: AlertKind) -> Option<f64> {
        match kind {
            AlertKind::High => Some(self.upper),
            AlertKind::Low => Some(self.lower),
            AlertKind::None => None,
        }
    }
}

/// Outcome of comparing a quote against the thresholds
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertDecision {
    /// Whether a bound was breached
    pub triggered: bool,

    /// Breached bound
    #[serde(rename = "type")]
    pub kind: AlertKind,

    /// Human-readable message
    pub message: String,

    /// Value of the breached bound
    #[serde(skip)]
    pub threshold: Option<f64>,
}

/// Result of the email step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailOutcome {
    /// Whether the provider accepted the message
    pub sent: bool,

    /// Provider-assigned message id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Failure or skip reason
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EmailOutcome {
    /// The provider accepted the message
    pub fn delivered(id: Option<String>) -> Self {
        Self {
            sent: true,
            id,
            error: None,
        }
    }

    /// The send was attempted and failed
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            sent: false,
            id: None,
            error: Some(error.into()),
        }
    }

    /// No send was attempted because email settings are absent
    pub fn skipped(missing: &[&str]) -> Self {
        Self::failed(format!("Email not sent: missing {}", missing.join(", ")))
    }
}
