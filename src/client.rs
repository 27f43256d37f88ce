//! CoinGecko API client
//!
//! One concrete [`MarketDataProvider`] over the public CoinGecko v3 REST
//! API. All failure classification happens here: rate limits (HTTP 429
//! with an advisory `retry-after`), other HTTP statuses, timeouts,
//! network faults, and undecodable bodies each map to one [`ApiError`]
//! variant before anything reaches the orchestration layer.

use crate::{
    constants::{
        BATCH_LOOKUP_PAGE_SIZE, COINGECKO_API_URL, COINGECKO_MARKETS_ENDPOINT,
        COINGECKO_SEARCH_ENDPOINT, COINGECKO_TRENDING_ENDPOINT, REFERENCE_CURRENCY,
        REQUEST_TIMEOUT_SECS, USER_AGENT,
    },
    error::ApiError,
    normalize::normalize_coin_detail,
    provider::MarketDataProvider,
    types::{
        ChartPoint, CoinDetail, CoinSummary, PriceHistory, SearchHit, SearchResponse,
        TrendingCoin, TrendingResponse,
    },
};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, RETRY_AFTER};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// CoinGecko market data client
pub struct CoinGeckoClient {
    client: Client,
    base_url: String,
}

impl CoinGeckoClient {
    /// Creates a client against the public CoinGecko API
    pub fn new() -> Result<Self, ApiError> {
        Self::with_base_url(COINGECKO_API_URL)
    }

    /// Creates a client against a custom base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(ApiError::from)?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Issues one GET and decodes the JSON body
    ///
    /// A 429 is classified before any other status check; its
    /// `retry-after` header is parsed as integer seconds when present.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "Fetching from CoinGecko");

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(ApiError::from)?;

        let status = response.status();
        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<u64>().ok());
            tracing::warn!(?retry_after, %url, "Rate limited by CoinGecko");
            return Err(ApiError::rate_limited(retry_after));
        }

        if !status.is_success() {
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let body = response.text().await.map_err(ApiError::from)?;
        serde_json::from_str(&body).map_err(|e| {
            ApiError::invalid_response(format!("Failed to parse CoinGecko response: {}", e))
        })
    }
}

#[async_trait]
impl MarketDataProvider for CoinGeckoClient {
    async fn list_top_coins(&self, limit: u32) -> Result<Vec<CoinSummary>, ApiError> {
        let params = [
            ("vs_currency", REFERENCE_CURRENCY.to_string()),
            ("order", "market_cap_desc".to_string()),
            ("per_page", limit.to_string()),
            ("page", "1".to_string()),
            ("sparkline", "false".to_string()),
            ("price_change_percentage", "24h".to_string()),
        ];

        let coins: Vec<CoinSummary> = self.get_json(COINGECKO_MARKETS_ENDPOINT, &params).await?;
        tracing::debug!(count = coins.len(), "Fetched top coins");
        Ok(coins)
    }

    async fn search_coins(&self, query: &str) -> Result<Vec<SearchHit>, ApiError> {
        let params = [("query", query.to_string())];
        let response: SearchResponse = self.get_json(COINGECKO_SEARCH_ENDPOINT, &params).await?;
        tracing::debug!(count = response.coins.len(), query, "Search completed");
        Ok(response.coins)
    }

    async fn coins_by_ids(&self, ids: &[String]) -> Result<Vec<CoinSummary>, ApiError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let params = [
            ("vs_currency", REFERENCE_CURRENCY.to_string()),
            ("ids", ids.join(",")),
            ("order", "market_cap_desc".to_string()),
            ("per_page", BATCH_LOOKUP_PAGE_SIZE.to_string()),
            ("page", "1".to_string()),
            ("sparkline", "false".to_string()),
            ("price_change_percentage", "24h".to_string()),
        ];

        self.get_json(COINGECKO_MARKETS_ENDPOINT, &params).await
    }

    async fn coin_detail(&self, id: &str) -> Result<CoinDetail, ApiError> {
        let params = [
            ("localization", "false".to_string()),
            ("tickers", "false".to_string()),
            ("market_data", "true".to_string()),
            ("community_data", "false".to_string()),
            ("developer_data", "false".to_string()),
            ("sparkline", "false".to_string()),
        ];

        let raw = self
            .get_json::<crate::types::RawCoinDetail>(&format!("/coins/{}", id), &params)
            .await?;

        // The HTTP call can succeed while the payload is unusable; a record
        // without its identifier must not reach consumers.
        if raw.id.is_empty() {
            return Err(ApiError::missing_data(format!(
                "coin detail for '{}' is missing its identifier",
                id
            )));
        }

        Ok(normalize_coin_detail(&raw, REFERENCE_CURRENCY))
    }

    async fn coin_chart(&self, id: &str, days: u32) -> Result<Vec<ChartPoint>, ApiError> {
        let interval = if days <= 1 { "hourly" } else { "daily" };
        let params = [
            ("vs_currency", REFERENCE_CURRENCY.to_string()),
            ("days", days.to_string()),
            ("interval", interval.to_string()),
        ];

        let history: PriceHistory = self
            .get_json(&format!("/coins/{}/market_chart", id), &params)
            .await?;

        // Upstream order is the contract; rows map through untouched.
        Ok(history
            .prices
            .into_iter()
            .map(|row| ChartPoint {
                timestamp: row.0,
                price: row.1,
            })
            .collect())
    }

    async fn trending(&self) -> Result<Vec<TrendingCoin>, ApiError> {
        let response: TrendingResponse = self.get_json(COINGECKO_TRENDING_ENDPOINT, &[]).await?;
        Ok(response.coins.into_iter().map(|entry| entry.item).collect())
    }

    fn provider_name(&self) -> &'static str {
        "coingecko"
    }
}
