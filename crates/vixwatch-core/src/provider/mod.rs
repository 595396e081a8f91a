//! Quote providers
//!
//! A provider turns one outbound request into a [`QuoteSnapshot`] or one of
//! the two quote failure kinds: `ProviderUnavailable` for transport and status
//! errors, `MalformedProviderResponse` when the payload has no usable price.

mod yahoo;

pub use yahoo::YahooQuoteProvider;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::QuoteSnapshot;

/// Source of the current index value
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Fetch the most recent daily price
    async fn latest_quote(&self) -> Result<QuoteSnapshot>;
}
