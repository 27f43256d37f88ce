//! Provider abstraction for fetching dashboard market data
//!
//! The orchestration layer talks to this trait, never to a concrete HTTP
//! client, so tests can script responses and alternative upstreams can be
//! dropped in.

use crate::error::ApiError;
use crate::types::{ChartPoint, CoinDetail, CoinSummary, SearchHit, TrendingCoin};
use async_trait::async_trait;

/// Trait for market data providers
///
/// Every operation issues at most one upstream request and fails with
/// [`ApiError`] only — no transport error type crosses this boundary.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetches the `limit` highest-market-cap coins
    async fn list_top_coins(&self, limit: u32) -> Result<Vec<CoinSummary>, ApiError>;

    /// Searches coins by free text
    ///
    /// Minimum-query-length gating is the caller's responsibility; this
    /// layer sends whatever it is given.
    async fn search_coins(&self, query: &str) -> Result<Vec<SearchHit>, ApiError>;

    /// Batched summary lookup for a fixed set of identifiers
    ///
    /// Resolves to an empty list without a network call when `ids` is
    /// empty.
    async fn coins_by_ids(&self, ids: &[String]) -> Result<Vec<CoinSummary>, ApiError>;

    /// Fetches and normalizes one coin's full record
    async fn coin_detail(&self, id: &str) -> Result<CoinDetail, ApiError>;

    /// Fetches a price history series, hourly for a single day, daily
    /// otherwise
    async fn coin_chart(&self, id: &str, days: u32) -> Result<Vec<ChartPoint>, ApiError>;

    /// Fetches the coins currently trending in search
    async fn trending(&self) -> Result<Vec<TrendingCoin>, ApiError>;

    /// Returns the name of this provider
    fn provider_name(&self) -> &'static str;
}
