//! Display formatting helpers
//!
//! Pure, total functions turning numeric market values into the strings
//! the presentation layer renders. Magnitude tiers are evaluated on the
//! absolute value; the sign always comes first (`-$1.00K`).

/// Formats a value as currency in the reference currency
///
/// Zero renders as `$0.00`. Values at or above a thousand are abbreviated
/// with `K`/`M`/`B`; values below one get six decimal places so sub-cent
/// prices stay visible.
pub fn format_currency(value: f64) -> String {
    if value == 0.0 {
        return "$0.00".to_string();
    }

    let abs = value.abs();
    let result = if abs >= 1e9 {
        format!("${:.2}B", abs / 1e9)
    } else if abs >= 1e6 {
        format!("${:.2}M", abs / 1e6)
    } else if abs >= 1e3 {
        format!("${:.2}K", abs / 1e3)
    } else if abs >= 1.0 {
        format!("${:.2}", abs)
    } else {
        format!("${:.6}", abs)
    };

    if value < 0.0 {
        format!("-{}", result)
    } else {
        result
    }
}

/// Null-safe currency formatter used by detail views
///
/// Adds a `T` tier for trillion-scale values and maps absent or
/// non-finite input to `$0.00`.
pub fn format_currency_safe(value: Option<f64>) -> String {
    let value = match value {
        Some(v) if v.is_finite() => v,
        _ => return "$0.00".to_string(),
    };

    let abs = value.abs();
    let result = if abs >= 1e12 {
        format!("${:.2}T", abs / 1e12)
    } else if abs >= 1e9 {
        format!("${:.2}B", abs / 1e9)
    } else if abs >= 1e6 {
        format!("${:.2}M", abs / 1e6)
    } else if abs >= 1e3 {
        format!("${:.2}K", abs / 1e3)
    } else if abs >= 1.0 {
        format!("${:.2}", abs)
    } else if abs > 0.0 {
        format!("${:.6}", abs)
    } else {
        return "$0.00".to_string();
    };

    if value < 0.0 {
        format!("-{}", result)
    } else {
        result
    }
}

/// Formats a signed delta as a percentage
///
/// Zero renders as `0.00%`; non-negative values carry an explicit `+`.
pub fn format_percentage(value: f64) -> String {
    if value == 0.0 {
        return "0.00%".to_string();
    }

    let sign = if value >= 0.0 { "+" } else { "" };
    format!("{}{:.2}%", sign, value)
}

/// Null-safe percentage formatter
pub fn format_percentage_safe(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format_percentage(v),
        _ => "0.00%".to_string(),
    }
}

/// Formats a large number with magnitude abbreviations, no currency symbol
///
/// Zero renders as `0` (not `0.00`); other values keep two decimals at
/// every tier, up to `T`.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }

    let abs = value.abs();
    if abs >= 1e12 {
        format!("{:.2}T", value / 1e12)
    } else if abs >= 1e9 {
        format!("{:.2}B", value / 1e9)
    } else if abs >= 1e6 {
        format!("{:.2}M", value / 1e6)
    } else if abs >= 1e3 {
        format!("{:.2}K", value / 1e3)
    } else {
        format!("{:.2}", value)
    }
}

/// Presentation category for a signed delta
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeDirection {
    /// Strictly positive change
    Positive,
    /// Strictly negative change
    Negative,
    /// Exactly zero
    Neutral,
}

impl ChangeDirection {
    /// Classifies a delta into one of the three categories
    pub fn of(value: f64) -> Self {
        if value > 0.0 {
            ChangeDirection::Positive
        } else if value < 0.0 {
            ChangeDirection::Negative
        } else {
            ChangeDirection::Neutral
        }
    }

    /// CSS class the presentation layer maps each category to
    pub fn css_class(&self) -> &'static str {
        match self {
            ChangeDirection::Positive => "text-success",
            ChangeDirection::Negative => "text-destructive",
            ChangeDirection::Neutral => "text-muted-foreground",
        }
    }
}

/// Renders a millisecond timestamp as a full date, e.g. `Jan 5, 2024`
pub fn format_date(timestamp_ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(timestamp_ms)
        .map(|dt| dt.format("%b %-d, %Y").to_string())
        .unwrap_or_default()
}

/// Renders a millisecond timestamp as a short axis label, e.g. `Jan 5`
pub fn format_chart_date(timestamp_ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(timestamp_ms)
        .map(|dt| dt.format("%b %-d").to_string())
        .unwrap_or_default()
}

/// Renders a countdown as `45s` or `2m 05s`
pub fn format_time_remaining(secs: u64) -> String {
    if secs == 0 {
        return "0s".to_string();
    }
    if secs < 60 {
        return format!("{}s", secs);
    }
    format!("{}m {:02}s", secs / 60, secs % 60)
}

/// Truncates text with an ellipsis when it exceeds `max_len` characters
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max_len).collect();
    format!("{}...", truncated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_magnitude_tiers() {
        assert_eq!(format_currency(1_000_000_000.0), "$1.00B");
        assert_eq!(format_currency(2_500_000.0), "$2.50M");
        assert_eq!(format_currency(-1000.0), "-$1.00K");
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(43.2), "$43.20");
    }

    #[test]
    fn currency_small_values_get_six_decimals() {
        assert_eq!(format_currency(0.5), "$0.500000");
        assert_eq!(format_currency(0.000123), "$0.000123");
        assert_eq!(format_currency(-0.25), "-$0.250000");
    }

    #[test]
    fn currency_below_thousand_has_no_suffix() {
        for value in [1.0, 12.34, 999.0] {
            let s = format_currency(value);
            assert!(!s.ends_with('K') && !s.ends_with('M') && !s.ends_with('B'));
            // two decimal places after the symbol
            assert_eq!(s.split('.').nth(1).map(str::len), Some(2));
        }
    }

    #[test]
    fn safe_currency_handles_missing_and_trillions() {
        assert_eq!(format_currency_safe(None), "$0.00");
        assert_eq!(format_currency_safe(Some(f64::NAN)), "$0.00");
        assert_eq!(format_currency_safe(Some(f64::INFINITY)), "$0.00");
        assert_eq!(format_currency_safe(Some(1_500_000_000_000.0)), "$1.50T");
        assert_eq!(format_currency_safe(Some(-2_000.0)), "-$2.00K");
        assert_eq!(format_currency_safe(Some(0.0)), "$0.00");
    }

    #[test]
    fn percentage_signs() {
        assert_eq!(format_percentage(0.0), "0.00%");
        assert_eq!(format_percentage(2.5), "+2.50%");
        assert_eq!(format_percentage(-5.2), "-5.20%");
        assert!(format_percentage(0.001).starts_with('+'));
        assert!(format_percentage(-0.015).starts_with('-'));
    }

    #[test]
    fn safe_percentage_maps_non_finite_to_zero() {
        assert_eq!(format_percentage_safe(None), "0.00%");
        assert_eq!(format_percentage_safe(Some(f64::NAN)), "0.00%");
        assert_eq!(format_percentage_safe(Some(3.0)), "+3.00%");
    }

    #[test]
    fn number_tiers_and_zero() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(1_500_000_000_000.0), "1.50T");
        assert_eq!(format_number(2_500_000.0), "2.50M");
        assert_eq!(format_number(-1_000_000_000_000.0), "-1.00T");
        assert_eq!(format_number(512.0), "512.00");
    }

    #[test]
    fn change_direction_partitions_on_zero() {
        assert_eq!(ChangeDirection::of(0.0), ChangeDirection::Neutral);
        assert_eq!(ChangeDirection::of(-0.0), ChangeDirection::Neutral);
        assert_eq!(ChangeDirection::of(f64::MIN_POSITIVE), ChangeDirection::Positive);
        assert_eq!(ChangeDirection::of(-0.0001), ChangeDirection::Negative);
        assert_eq!(ChangeDirection::of(5.0).css_class(), "text-success");
    }

    #[test]
    fn date_rendering() {
        // 2024-01-01T00:00:00Z
        assert_eq!(format_date(1_704_067_200_000), "Jan 1, 2024");
        assert_eq!(format_chart_date(1_704_067_200_000), "Jan 1");
    }

    #[test]
    fn countdown_rendering() {
        assert_eq!(format_time_remaining(0), "0s");
        assert_eq!(format_time_remaining(45), "45s");
        assert_eq!(format_time_remaining(125), "2m 05s");
        assert_eq!(format_time_remaining(60), "1m 00s");
    }

    #[test]
    fn text_truncation() {
        assert_eq!(truncate_text("hello", 10), "hello");
        assert_eq!(truncate_text("hello world", 5), "hello...");
    }
}
