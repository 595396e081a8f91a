//! Threshold evaluation

use tracing::debug;

use crate::models::{AlertDecision, AlertKind, Thresholds};

/// Compares quote values against a fixed pair of thresholds
#[derive(Debug, Clone, Copy)]
pub struct AlertEvaluator {
    thresholds: Thresholds,
}

impl AlertEvaluator {
    /// Create a new evaluator
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    /// The thresholds this evaluator applies
    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    /// Evaluate a value
    pub fn evaluate(&self, value: f64) -> AlertDecision {
        let kind = self.thresholds.classify(value);
        let threshold = self.thresholds.bound_for(kind);

        debug!(
            value,
            upper = self.thresholds.upper,
            lower = self.thresholds.lower,
            kind = %kind,
            "Evaluated thresholds"
        );

        AlertDecision {
            triggered: kind != AlertKind::None,
            kind,
            message: self.format_alert_message(kind, value),
            threshold,
        }
    }

    fn format_alert_message(&self, kind: AlertKind, value: f64) -> String {
        let Thresholds { upper, lower } = self.thresholds;
        match kind {
            AlertKind::High => format!(
                "VIX HIGH Alert: {value:.2} (Threshold: {upper}+) - Market fear index at high level."
            ),
            AlertKind::Low => format!(
                "VIX LOW Alert: {value:.2} (Threshold: {lower}-) - Market fear index at low level."
            ),
            AlertKind::None => {
                format!("VIX within normal range: {value:.2} (Thresholds: {lower} - {upper})")
            }
        }
    }
}
