//! Types for the coin dashboard SDK
//!
//! Domain records are flat, immutable value types in the reference
//! currency. Raw payload types mirror the wire shape of the CoinGecko
//! endpoints, including the currency-keyed metric maps of the detail
//! endpoint, and exist only to be deserialized and normalized.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Deserializes a JSON number that may be absent or `null` as zero
fn nullable_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

/// Deserializes a JSON string that may be absent or `null` as empty
fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Return-on-investment summary attached to some market rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roi {
    /// Multiplier over the initial offering price
    pub times: f64,
    /// Currency the multiplier is measured against
    pub currency: String,
    /// Return as a percentage
    pub percentage: f64,
}

/// One row of market data for a single asset
///
/// All monetary fields are denominated in the reference currency. Numeric
/// fields are finite; fields the upstream may legitimately omit (unbounded
/// supply, unranked assets) stay `None` rather than collapsing to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinSummary {
    pub id: String,
    pub symbol: String,
    pub name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub image: String,
    #[serde(default, deserialize_with = "nullable_f64")]
    pub current_price: f64,
    #[serde(default, deserialize_with = "nullable_f64")]
    pub market_cap: f64,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub fully_diluted_valuation: Option<f64>,
    #[serde(default, deserialize_with = "nullable_f64")]
    pub total_volume: f64,
    #[serde(default, deserialize_with = "nullable_f64")]
    pub high_24h: f64,
    #[serde(default, deserialize_with = "nullable_f64")]
    pub low_24h: f64,
    #[serde(default, deserialize_with = "nullable_f64")]
    pub price_change_24h: f64,
    #[serde(default, deserialize_with = "nullable_f64")]
    pub price_change_percentage_24h: f64,
    #[serde(default, deserialize_with = "nullable_f64")]
    pub market_cap_change_24h: f64,
    #[serde(default, deserialize_with = "nullable_f64")]
    pub market_cap_change_percentage_24h: f64,
    #[serde(default, deserialize_with = "nullable_f64")]
    pub circulating_supply: f64,
    #[serde(default)]
    pub total_supply: Option<f64>,
    #[serde(default)]
    pub max_supply: Option<f64>,
    #[serde(default, deserialize_with = "nullable_f64")]
    pub ath: f64,
    #[serde(default, deserialize_with = "nullable_f64")]
    pub ath_change_percentage: f64,
    #[serde(default, deserialize_with = "nullable_string")]
    pub ath_date: String,
    #[serde(default, deserialize_with = "nullable_f64")]
    pub atl: f64,
    #[serde(default, deserialize_with = "nullable_f64")]
    pub atl_change_percentage: f64,
    #[serde(default, deserialize_with = "nullable_string")]
    pub atl_date: String,
    #[serde(default)]
    pub roi: Option<Roi>,
    #[serde(default, deserialize_with = "nullable_string")]
    pub last_updated: String,
}

impl CoinSummary {
    /// Builds a summary from a search hit with every market field at its
    /// zero value
    ///
    /// Search hits carry only display fields. When enrichment misses a hit
    /// the hit is kept rather than dropped, with numeric fields defaulted
    /// to `0`/`None`. An unranked hit gets rank 0 here, matching the
    /// upstream convention (no legitimate rank is zero).
    pub fn from_search_hit(hit: &SearchHit) -> Self {
        Self {
            id: hit.id.clone(),
            symbol: hit.symbol.clone(),
            name: hit.name.clone(),
            image: hit.large.clone(),
            current_price: 0.0,
            market_cap: 0.0,
            market_cap_rank: Some(hit.market_cap_rank.unwrap_or(0)),
            fully_diluted_valuation: None,
            total_volume: 0.0,
            high_24h: 0.0,
            low_24h: 0.0,
            price_change_24h: 0.0,
            price_change_percentage_24h: 0.0,
            market_cap_change_24h: 0.0,
            market_cap_change_percentage_24h: 0.0,
            circulating_supply: 0.0,
            total_supply: None,
            max_supply: None,
            ath: 0.0,
            ath_change_percentage: 0.0,
            ath_date: String::new(),
            atl: 0.0,
            atl_change_percentage: 0.0,
            atl_date: String::new(),
            roi: None,
            last_updated: String::new(),
        }
    }
}

/// External reference links for a coin
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoinLinks {
    #[serde(default)]
    pub homepage: Vec<String>,
    #[serde(default)]
    pub blockchain_site: Vec<String>,
    #[serde(default)]
    pub official_forum_url: Vec<String>,
    #[serde(default)]
    pub chat_url: Vec<String>,
    #[serde(default)]
    pub announcement_url: Vec<String>,
    #[serde(default, deserialize_with = "nullable_string")]
    pub twitter_screen_name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub facebook_username: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub subreddit_url: String,
    #[serde(default)]
    pub repos_url: RepoLinks,
}

/// Source-repository links grouped by host
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepoLinks {
    #[serde(default)]
    pub github: Vec<String>,
    #[serde(default)]
    pub bitbucket: Vec<String>,
}

/// A coin summary plus the long-form fields of the detail endpoint
///
/// Produced only by normalizing the raw currency-keyed detail payload,
/// never deserialized directly from the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinDetail {
    #[serde(flatten)]
    pub market: CoinSummary,
    /// Long-form English description, when the payload carries one
    pub description: Option<String>,
    /// External reference links, when the payload carries them
    pub links: Option<CoinLinks>,
}

/// A single (timestamp, price) pair of a price history
///
/// Timestamps are Unix milliseconds. A series arrives ordered by ascending
/// timestamp and is passed through in that order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub timestamp: i64,
    pub price: f64,
}

/// A lightweight coin reference returned by text search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default, deserialize_with = "nullable_string")]
    pub thumb: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub large: String,
}

/// Response shape of the search endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub coins: Vec<SearchHit>,
}

/// A coin currently trending on the upstream search endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingCoin {
    pub id: String,
    #[serde(default)]
    pub coin_id: Option<i64>,
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default, deserialize_with = "nullable_string")]
    pub thumb: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub small: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub large: String,
}

/// Response shape of the trending endpoint (items are wrapped one level)
#[derive(Debug, Clone, Deserialize)]
pub struct TrendingResponse {
    #[serde(default)]
    pub coins: Vec<TrendingEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrendingEntry {
    pub item: TrendingCoin,
}

/// One (timestamp, value) row of the market-chart endpoint
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SeriesRow(pub i64, pub f64);

/// Response shape of the market-chart endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct PriceHistory {
    #[serde(default)]
    pub prices: Vec<SeriesRow>,
    #[serde(default)]
    pub market_caps: Vec<SeriesRow>,
    #[serde(default)]
    pub total_volumes: Vec<SeriesRow>,
}

/// Image URLs of the detail endpoint, by resolution
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawImageSet {
    #[serde(default, deserialize_with = "nullable_string")]
    pub thumb: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub small: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub large: String,
}

/// Market data of the detail endpoint
///
/// Most metrics arrive as mappings from currency code to value;
/// normalization selects the reference currency's entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMarketData {
    #[serde(default)]
    pub current_price: HashMap<String, f64>,
    #[serde(default)]
    pub market_cap: HashMap<String, f64>,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub total_volume: HashMap<String, f64>,
    #[serde(default)]
    pub high_24h: HashMap<String, f64>,
    #[serde(default)]
    pub low_24h: HashMap<String, f64>,
    #[serde(default)]
    pub price_change_24h: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
    #[serde(default)]
    pub market_cap_change_24h: Option<f64>,
    #[serde(default)]
    pub market_cap_change_percentage_24h: Option<f64>,
    #[serde(default)]
    pub circulating_supply: Option<f64>,
    #[serde(default)]
    pub total_supply: Option<f64>,
    #[serde(default)]
    pub max_supply: Option<f64>,
    #[serde(default)]
    pub ath: HashMap<String, f64>,
    #[serde(default)]
    pub ath_change_percentage: HashMap<String, f64>,
    #[serde(default)]
    pub ath_date: HashMap<String, String>,
    #[serde(default)]
    pub atl: HashMap<String, f64>,
    #[serde(default)]
    pub atl_change_percentage: HashMap<String, f64>,
    #[serde(default)]
    pub atl_date: HashMap<String, String>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

/// Raw payload of the detail endpoint, before normalization
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCoinDetail {
    #[serde(default, deserialize_with = "nullable_string")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub symbol: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub name: String,
    #[serde(default)]
    pub image: Option<RawImageSet>,
    #[serde(default)]
    pub description: Option<HashMap<String, String>>,
    #[serde(default)]
    pub links: Option<CoinLinks>,
    #[serde(default)]
    pub market_data: Option<RawMarketData>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_deserializes_nulls_to_zero_values() {
        let row = serde_json::json!({
            "id": "bitcoin",
            "symbol": "btc",
            "name": "Bitcoin",
            "image": "https://example.com/btc.png",
            "current_price": 43000.5,
            "market_cap": 840_000_000_000.0_f64,
            "market_cap_rank": null,
            "fully_diluted_valuation": null,
            "total_volume": null,
            "high_24h": 44000.0,
            "low_24h": null,
            "price_change_24h": -120.5,
            "price_change_percentage_24h": -0.28,
            "total_supply": null,
            "max_supply": 21_000_000.0_f64,
            "roi": null,
            "last_updated": null
        });

        let coin: CoinSummary = serde_json::from_value(row).unwrap();
        assert_eq!(coin.current_price, 43000.5);
        assert_eq!(coin.total_volume, 0.0);
        assert_eq!(coin.low_24h, 0.0);
        assert_eq!(coin.market_cap_rank, None);
        assert_eq!(coin.total_supply, None);
        assert_eq!(coin.max_supply, Some(21_000_000.0));
        assert!(coin.roi.is_none());
        assert_eq!(coin.last_updated, "");
    }

    #[test]
    fn search_hit_becomes_zero_valued_summary() {
        let hit = SearchHit {
            id: "dogwifhat".to_string(),
            name: "dogwifhat".to_string(),
            symbol: "WIF".to_string(),
            market_cap_rank: None,
            thumb: "https://example.com/thumb.png".to_string(),
            large: "https://example.com/large.png".to_string(),
        };

        let coin = CoinSummary::from_search_hit(&hit);
        assert_eq!(coin.id, "dogwifhat");
        assert_eq!(coin.image, "https://example.com/large.png");
        assert_eq!(coin.current_price, 0.0);
        assert_eq!(coin.market_cap_rank, Some(0));
        assert_eq!(coin.total_supply, None);
        assert!(coin.roi.is_none());
    }

    #[test]
    fn chart_rows_deserialize_as_pairs() {
        let body = r#"{"prices": [[1700000000000, 42000.1], [1700003600000, 42100.9]]}"#;
        let history: PriceHistory = serde_json::from_str(body).unwrap();
        assert_eq!(history.prices.len(), 2);
        assert_eq!(history.prices[0].0, 1700000000000);
        assert_eq!(history.prices[1].1, 42100.9);
        assert!(history.market_caps.is_empty());
    }
}
