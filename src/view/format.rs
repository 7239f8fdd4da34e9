//! Cell formatting shared by the list views.

use chrono::{DateTime, Utc};

/// Placeholder for missing values.
pub const MISSING: &str = "-";

pub fn decimal(value: f64, precision: usize) -> String {
    if value.is_finite() {
        format!("{:.*}", precision, value)
    } else {
        MISSING.to_string()
    }
}

/// Fraction as a percentage: 0.1234 -> "12.34%".
pub fn percent(value: f64) -> String {
    if value.is_finite() {
        format!("{:.2}%", value * 100.0)
    } else {
        MISSING.to_string()
    }
}

pub fn opt_percent(value: Option<f64>) -> String {
    value.map(percent).unwrap_or_else(|| MISSING.to_string())
}

pub fn opt_decimal(value: Option<f64>, precision: usize) -> String {
    value
        .map(|v| decimal(v, precision))
        .unwrap_or_else(|| MISSING.to_string())
}

pub fn flag(value: bool) -> String {
    if value { "yes" } else { "" }.to_string()
}

pub fn tags(tags: &[String]) -> String {
    tags.join(", ")
}

/// Importance 1..=5 as filled/empty stars.
pub fn stars(importance: u8) -> String {
    let filled = importance.min(5) as usize;
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

/// Age of `ts` relative to `now`: "just now", "5m ago", "3h ago", "2d ago",
/// then the calendar date once it is older than a month.
pub fn relative(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - ts).num_seconds();
    match secs {
        s if s < 60 => "just now".to_string(),
        s if s < 3_600 => format!("{}m ago", s / 60),
        s if s < 86_400 => format!("{}h ago", s / 3_600),
        s if s < 30 * 86_400 => format!("{}d ago", s / 86_400),
        _ => ts.format("%Y-%m-%d").to_string(),
    }
}

pub fn timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M UTC").to_string()
}
