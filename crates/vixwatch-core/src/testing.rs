//! Test doubles for the quote and email seams

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use crate::alerting::{EmailMessage, EmailSender, SendReceipt};
use crate::error::{Error, Result};
use crate::models::QuoteSnapshot;
use crate::provider::QuoteProvider;

/// 2024-08-05 00:03:07 UTC, 9:03:07 in Tokyo
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 8, 5, 0, 3, 7).unwrap()
}

pub enum QuoteBehavior {
    Value(f64),
    Unavailable,
    Malformed,
}

pub struct StubProvider {
    behavior: QuoteBehavior,
    calls: AtomicUsize,
}

impl StubProvider {
    pub fn new(behavior: QuoteBehavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuoteProvider for StubProvider {
    async fn latest_quote(&self) -> Result<QuoteSnapshot> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            QuoteBehavior::Value(value) => Ok(QuoteSnapshot {
                symbol: "^VIX".to_string(),
                value,
                currency: Some("USD".to_string()),
                market_time: None,
                fetched_at: now(),
            }),
            QuoteBehavior::Unavailable => Err(Error::provider_unavailable(
                "Yahoo Finance API error: 503 Service Unavailable",
            )),
            QuoteBehavior::Malformed => Err(Error::malformed(
                "Invalid data structure from Yahoo Finance API",
            )),
        }
    }
}

#[derive(Default)]
pub struct RecordingSender {
    fail_with: Option<String>,
    sent: Mutex<Vec<EmailMessage>>,
}

impl RecordingSender {
    pub fn failing(reason: &str) -> Arc<Self> {
        Arc::new(Self {
            fail_with: Some(reason.to_string()),
            ..Self::default()
        })
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailSender for RecordingSender {
    async fn send(&self, message: &EmailMessage) -> Result<SendReceipt> {
        self.sent.lock().unwrap().push(message.clone());
        match &self.fail_with {
            Some(reason) => Err(Error::email(reason.clone())),
            None => Ok(SendReceipt {
                id: Some("em_123".to_string()),
            }),
        }
    }
}
