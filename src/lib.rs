//! # Coin Dashboard SDK
//!
//! Market data layer for a browser-style cryptocurrency dashboard: fetches
//! listings, search results, coin details and price histories from the
//! CoinGecko REST API, normalizes them into flat display records in a
//! single reference currency, and wraps every operation with caching,
//! in-flight deduplication, bounded retry and rate-limit handling.
//!
//! The presentation layer stays out of scope: consumers receive immutable
//! value records, `{data, is_loading, error}` query snapshots, and display
//! strings from the formatting helpers.
//!
//! ## Usage
//!
//! ```no_run
//! use coin_dashboard_sdk::{format_currency, MarketDataService};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = MarketDataService::new()?;
//!
//! // Top of the market, cached for five minutes
//! for coin in service.top_coins(20).await? {
//!     println!("{}: {}", coin.name, format_currency(coin.current_price));
//! }
//!
//! // Search, enriched with full market data
//! let results = service.search_with_market_data("bitcoin").await?;
//! println!("{} results", results.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! MarketDataService (cache + dedup + retry)
//!     ↓
//! MarketDataProvider (CoinGeckoClient)
//!     ↓
//! normalize / types (flat records, reference currency)
//!     ↓
//! Your code (records, query snapshots, format helpers)
//! ```
//!
//! ## Error handling
//!
//! Every failure crossing the client boundary is an [`ApiError`]. Rate
//! limits carry their advisory wait and feed the countdown gate:
//!
//! ```no_run
//! use coin_dashboard_sdk::{ApiError, MarketDataService, RateLimitGate};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = MarketDataService::new()?;
//! let mut gate = RateLimitGate::new();
//!
//! match service.top_coins(20).await {
//!     Ok(coins) => println!("{} coins", coins.len()),
//!     Err(err) if err.is_rate_limit() => {
//!         gate.observe(&err);
//!         println!("rate limited, retry in {}", gate.time_remaining_display());
//!     }
//!     Err(err) => eprintln!("failed: {}", err),
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod client;
pub mod constants;
pub mod debounce;
pub mod error;
pub mod format;
pub mod normalize;
pub mod provider;
pub mod query;
pub mod retry;
pub mod service;
pub mod types;

// Re-export commonly used types
pub use cache::ResponseCache;
pub use client::CoinGeckoClient;
pub use debounce::Debouncer;
pub use error::ApiError;
pub use format::{
    format_chart_date, format_currency, format_currency_safe, format_date, format_number,
    format_percentage, format_percentage_safe, format_time_remaining, truncate_text,
    ChangeDirection,
};
pub use normalize::normalize_coin_detail;
pub use provider::MarketDataProvider;
pub use query::{QueryHandle, QueryState, RateLimitGate};
pub use retry::RetryPolicy;
pub use service::MarketDataService;
pub use types::{
    ChartPoint, CoinDetail, CoinLinks, CoinSummary, Roi, SearchHit, TrendingCoin,
};
