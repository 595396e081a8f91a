//! Alerting for vixwatch
//!
//! Threshold evaluation and email delivery.

mod evaluator;
mod notifier;

pub use evaluator::AlertEvaluator;
pub use notifier::{EmailMessage, EmailSender, ResendNotifier, SendReceipt};
