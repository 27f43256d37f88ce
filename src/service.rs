//! Market data orchestration service
//!
//! Wraps a [`MarketDataProvider`] with per-operation caches, in-flight
//! deduplication, and the retry policy, and exposes the compound flows
//! the dashboard needs. Cache keys are derived from the operation name
//! and its parameters, so concurrent fetches for different parameters
//! never interfere and identical fetches collapse into one request.

use crate::{
    cache::ResponseCache,
    client::CoinGeckoClient,
    constants::{
        CHART_STALE_SECS, COIN_DETAIL_STALE_SECS, MIN_SEARCH_QUERY_LEN, SEARCH_STALE_SECS,
        TOP_COINS_STALE_SECS, TRENDING_STALE_SECS,
    },
    error::ApiError,
    provider::MarketDataProvider,
    query::QueryHandle,
    retry::RetryPolicy,
    types::{ChartPoint, CoinDetail, CoinSummary, SearchHit, TrendingCoin},
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Orchestrates dashboard market data fetching
///
/// # Example
/// ```no_run
/// use coin_dashboard_sdk::MarketDataService;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let service = MarketDataService::new()?;
/// let coins = service.top_coins(20).await?;
/// for coin in coins {
///     println!("{}: {}", coin.name, coin.current_price);
/// }
/// # Ok(())
/// # }
/// ```
pub struct MarketDataService {
    provider: Arc<dyn MarketDataProvider>,
    retry: RetryPolicy,
    top_coins: ResponseCache<Vec<CoinSummary>>,
    search: ResponseCache<Vec<SearchHit>>,
    details: ResponseCache<CoinDetail>,
    charts: ResponseCache<Vec<ChartPoint>>,
    trending: ResponseCache<Vec<TrendingCoin>>,
}

impl MarketDataService {
    /// Creates a service backed by the public CoinGecko API
    pub fn new() -> Result<Self, ApiError> {
        Ok(Self::with_provider(Arc::new(CoinGeckoClient::new()?)))
    }

    /// Creates a service with a custom provider
    ///
    /// This is primarily for testing with mock providers.
    pub fn with_provider(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self {
            provider,
            retry: RetryPolicy::default(),
            top_coins: ResponseCache::new(Duration::from_secs(TOP_COINS_STALE_SECS)),
            search: ResponseCache::new(Duration::from_secs(SEARCH_STALE_SECS)),
            details: ResponseCache::new(Duration::from_secs(COIN_DETAIL_STALE_SECS)),
            charts: ResponseCache::new(Duration::from_secs(CHART_STALE_SECS)),
            trending: ResponseCache::new(Duration::from_secs(TRENDING_STALE_SECS)),
        }
    }

    /// The `limit` highest-market-cap coins
    pub async fn top_coins(&self, limit: u32) -> Result<Vec<CoinSummary>, ApiError> {
        let key = format!("top_coins:{}", limit);
        self.top_coins
            .get_or_fetch(&key, || {
                self.retry
                    .run("top_coins", || self.provider.list_top_coins(limit))
            })
            .await
    }

    /// Text search for coins
    ///
    /// Queries shorter than the minimum length resolve to an empty hit
    /// list without touching the network, mirroring a disabled query.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchHit>, ApiError> {
        if query.chars().count() < MIN_SEARCH_QUERY_LEN {
            return Ok(Vec::new());
        }

        let key = format!("search:{}", query);
        self.search
            .get_or_fetch(&key, || {
                self.retry.run("search", || self.provider.search_coins(query))
            })
            .await
    }

    /// Batched summary lookup for a fixed set of identifiers
    pub async fn coins_by_ids(&self, ids: &[String]) -> Result<Vec<CoinSummary>, ApiError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let key = format!("coins:{}", ids.join(","));
        self.top_coins
            .get_or_fetch(&key, || {
                self.retry.run("coins_by_ids", || self.provider.coins_by_ids(ids))
            })
            .await
    }

    /// One coin's full, normalized record
    pub async fn coin_detail(&self, id: &str) -> Result<CoinDetail, ApiError> {
        let key = format!("detail:{}", id);
        self.details
            .get_or_fetch(&key, || {
                self.retry.run("coin_detail", || self.provider.coin_detail(id))
            })
            .await
    }

    /// One coin's price history
    pub async fn coin_chart(&self, id: &str, days: u32) -> Result<Vec<ChartPoint>, ApiError> {
        let key = format!("chart:{}:{}", id, days);
        self.charts
            .get_or_fetch(&key, || {
                self.retry
                    .run("coin_chart", || self.provider.coin_chart(id, days))
            })
            .await
    }

    /// Coins currently trending in search
    pub async fn trending(&self) -> Result<Vec<TrendingCoin>, ApiError> {
        self.trending
            .get_or_fetch("trending", || {
                self.retry.run("trending", || self.provider.trending())
            })
            .await
    }

    /// Search, then attach full market data to every hit
    ///
    /// Hits resolve first; their identifiers are then batch-fetched in one
    /// request. The merge preserves the original search order, and a hit
    /// the enrichment batch missed keeps its basic fields with market
    /// fields at their zero values rather than being dropped.
    pub async fn search_with_market_data(
        &self,
        query: &str,
    ) -> Result<Vec<CoinSummary>, ApiError> {
        let hits = self.search(query).await?;
        if hits.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = hits.iter().map(|hit| hit.id.clone()).collect();
        let enriched = self.coins_by_ids(&ids).await?;
        let by_id: HashMap<&str, &CoinSummary> =
            enriched.iter().map(|coin| (coin.id.as_str(), coin)).collect();

        tracing::debug!(
            hits = hits.len(),
            enriched = enriched.len(),
            query,
            "Merged search results with market data"
        );

        Ok(hits
            .iter()
            .map(|hit| match by_id.get(hit.id.as_str()) {
                Some(coin) => (*coin).clone(),
                None => CoinSummary::from_search_hit(hit),
            })
            .collect())
    }

    /// Detail record and price history for one coin, fetched concurrently
    ///
    /// The two requests are independent; neither waits for the other.
    pub async fn coin_overview(
        &self,
        id: &str,
        days: u32,
    ) -> Result<(CoinDetail, Vec<ChartPoint>), ApiError> {
        let (detail, chart) = tokio::join!(self.coin_detail(id), self.coin_chart(id, days));
        Ok((detail?, chart?))
    }

    /// Returns the name of the underlying provider
    pub fn provider_name(&self) -> &'static str {
        self.provider.provider_name()
    }

    /// Runs [`top_coins`](Self::top_coins) as a background query
    pub fn watch_top_coins(self: Arc<Self>, limit: u32) -> QueryHandle<Vec<CoinSummary>> {
        QueryHandle::spawn(async move { self.top_coins(limit).await })
    }

    /// Runs [`coin_detail`](Self::coin_detail) as a background query
    pub fn watch_coin_detail(self: Arc<Self>, id: &str) -> QueryHandle<CoinDetail> {
        let id = id.to_string();
        QueryHandle::spawn(async move { self.coin_detail(&id).await })
    }

    /// Runs [`coin_chart`](Self::coin_chart) as a background query
    pub fn watch_coin_chart(self: Arc<Self>, id: &str, days: u32) -> QueryHandle<Vec<ChartPoint>> {
        let id = id.to_string();
        QueryHandle::spawn(async move { self.coin_chart(&id, days).await })
    }

    /// Runs [`search_with_market_data`](Self::search_with_market_data) as a
    /// background query
    pub fn watch_search_with_market_data(
        self: Arc<Self>,
        query: &str,
    ) -> QueryHandle<Vec<CoinSummary>> {
        let query = query.to_string();
        QueryHandle::spawn(async move { self.search_with_market_data(&query).await })
    }
}
