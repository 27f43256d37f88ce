//! Normalization of the currency-keyed detail payload
//!
//! The detail endpoint stores most metrics as mappings from currency code
//! to value. Normalization is a one-way transform from that raw shape into
//! a flat [`CoinDetail`] in the reference currency, with explicit fallback
//! values for anything missing or invalid.

use crate::types::{CoinDetail, CoinSummary, RawCoinDetail, RawImageSet, RawMarketData};
use std::collections::HashMap;

/// Selects the reference currency's entry, zero when absent
fn currency_value(map: &HashMap<String, f64>, currency: &str) -> f64 {
    map.get(currency).copied().unwrap_or(0.0)
}

/// Selects the reference currency's date entry, empty when absent
fn currency_date(map: &HashMap<String, String>, currency: &str) -> String {
    map.get(currency).cloned().unwrap_or_default()
}

/// Zero unless the value is present and finite
fn safe_number(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// `None` unless the value is present and finite
///
/// Unknown supply is not zero supply; absence stays observable.
fn preserved_null(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Prefers the largest available image resolution
fn select_image(image: Option<&RawImageSet>) -> String {
    let Some(image) = image else {
        return String::new();
    };
    for candidate in [&image.large, &image.small, &image.thumb] {
        if !candidate.is_empty() {
            return candidate.clone();
        }
    }
    String::new()
}

/// Flattens a raw detail payload into a [`CoinDetail`] in `currency`
pub fn normalize_coin_detail(raw: &RawCoinDetail, currency: &str) -> CoinDetail {
    let default_market = RawMarketData::default();
    let market = raw.market_data.as_ref().unwrap_or(&default_market);

    let last_updated = market
        .last_updated
        .as_deref()
        .filter(|s| !s.is_empty())
        .or(raw.last_updated.as_deref().filter(|s| !s.is_empty()))
        .unwrap_or_default()
        .to_string();

    let summary = CoinSummary {
        id: raw.id.clone(),
        symbol: raw.symbol.clone(),
        name: raw.name.clone(),
        image: select_image(raw.image.as_ref()),
        current_price: currency_value(&market.current_price, currency),
        market_cap: currency_value(&market.market_cap, currency),
        market_cap_rank: Some(market.market_cap_rank.unwrap_or(0)),
        // not present in the detail payload
        fully_diluted_valuation: None,
        total_volume: currency_value(&market.total_volume, currency),
        high_24h: currency_value(&market.high_24h, currency),
        low_24h: currency_value(&market.low_24h, currency),
        price_change_24h: safe_number(market.price_change_24h),
        price_change_percentage_24h: safe_number(market.price_change_percentage_24h),
        market_cap_change_24h: safe_number(market.market_cap_change_24h),
        market_cap_change_percentage_24h: safe_number(market.market_cap_change_percentage_24h),
        circulating_supply: safe_number(market.circulating_supply),
        total_supply: preserved_null(market.total_supply),
        max_supply: preserved_null(market.max_supply),
        ath: currency_value(&market.ath, currency),
        ath_change_percentage: currency_value(&market.ath_change_percentage, currency),
        ath_date: currency_date(&market.ath_date, currency),
        atl: currency_value(&market.atl, currency),
        atl_change_percentage: currency_value(&market.atl_change_percentage, currency),
        atl_date: currency_date(&market.atl_date, currency),
        // not present in the detail payload
        roi: None,
        last_updated,
    };

    let description = raw
        .description
        .as_ref()
        .and_then(|d| d.get("en"))
        .filter(|s| !s.is_empty())
        .cloned();

    CoinDetail {
        market: summary,
        description,
        links: raw.links.clone(),
    }
}
