//! # vixwatch
//!
//! Scheduled VIX threshold monitor.
//!
//! Each trigger runs one check: fetch the current VIX quote, compare it with
//! the configured upper and lower thresholds, email an alert when either bound
//! is breached, and return a JSON summary.
//!
//! ## Architecture
//!
//! - **Provider**: quote retrieval (Yahoo Finance chart API)
//! - **Alerting**: threshold evaluation and email delivery (Resend)
//! - **Check**: the handler tying one cycle together
//! - **API**: HTTP endpoint for URL-based schedulers
//!
//! ## Quick Start
//!
//! ```bash
//! # Run one check and print the result
//! vixwatch check
//!
//! # Serve the check at /api/check-vix
//! vixwatch serve
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod alerting;
pub mod api;
pub mod check;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod provider;

#[cfg(test)]
pub(crate) mod testing;

pub use check::{AlertCheck, CheckReport};
pub use config::Config;
pub use error::{Error, ErrorKind, Result};

/// Re-exports for convenience
pub mod prelude {
    pub use crate::alerting::{AlertEvaluator, EmailSender};
    pub use crate::check::{AlertCheck, CheckReport};
    pub use crate::clock::Clock;
    pub use crate::config::Config;
    pub use crate::error::{Error, ErrorKind, Result};
    pub use crate::models::*;
    pub use crate::provider::QuoteProvider;
}
