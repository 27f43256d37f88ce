//! Constants for the coin dashboard SDK
//!
//! All configuration for the SDK is centralized here. No runtime
//! configuration (config.yml) is used - the system operates transparently
//! with these compile-time constants.

/// CoinGecko API base URL
pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

/// CoinGecko endpoint for market listings and batched summary lookups
pub const COINGECKO_MARKETS_ENDPOINT: &str = "/coins/markets";

/// CoinGecko endpoint for text search
pub const COINGECKO_SEARCH_ENDPOINT: &str = "/search";

/// CoinGecko endpoint for trending coins
pub const COINGECKO_TRENDING_ENDPOINT: &str = "/search/trending";

/// The single fixed currency all monetary fields are denominated in
pub const REFERENCE_CURRENCY: &str = "usd";

/// HTTP request timeout when fetching market data (in seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Retry-after to assume when a 429 carries no usable header (in seconds)
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Maximum number of retry attempts when a request fails transiently
pub const MAX_RETRY_ATTEMPTS: u32 = 3;

/// Initial backoff delay for retries (in milliseconds)
pub const INITIAL_BACKOFF_MS: u64 = 1000;

/// Maximum backoff delay for retries (in milliseconds)
pub const MAX_BACKOFF_MS: u64 = 30000;

/// How long a cached top-coins page stays fresh (in seconds)
pub const TOP_COINS_STALE_SECS: u64 = 300;

/// How long a cached search result stays fresh (in seconds)
pub const SEARCH_STALE_SECS: u64 = 600;

/// How long a cached coin detail record stays fresh (in seconds)
pub const COIN_DETAIL_STALE_SECS: u64 = 120;

/// How long a cached price history stays fresh (in seconds)
pub const CHART_STALE_SECS: u64 = 300;

/// How long a cached trending list stays fresh (in seconds)
pub const TRENDING_STALE_SECS: u64 = 600;

/// Default number of coins for a top-coins page
pub const DEFAULT_TOP_COINS_LIMIT: u32 = 20;

/// Page size used when batch-fetching summaries by id
pub const BATCH_LOOKUP_PAGE_SIZE: u32 = 100;

/// Queries shorter than this are not sent to the search endpoint
pub const MIN_SEARCH_QUERY_LEN: usize = 3;

/// User agent for HTTP requests
pub const USER_AGENT: &str = "coin-dashboard-sdk/0.1.0";
