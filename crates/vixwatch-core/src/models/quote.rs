//! Quote data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single price observation for the monitored instrument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSnapshot {
    /// Instrument symbol as reported by the provider
    pub symbol: String,

    /// Current market price
    pub value: f64,

    /// Quote currency, when reported
    pub currency: Option<String>,

    /// Exchange timestamp of the price, when reported
    pub market_time: Option<DateTime<Utc>>,

    /// When the quote was fetched
    pub fetched_at: DateTime<Utc>,
}
