//! Formatting utilities: currency strings and the plain-text prediction report.
//!
//! We keep formatting code in one place so the dashboard core and the TUI
//! display prices identically, and output changes stay localized.

use crate::domain::{ListingQuery, PredictionResult};

/// `$1,234.56`. Negative values keep their sign in front (`-$12.00`).
pub fn format_currency(v: f64) -> String {
    if !v.is_finite() {
        return "$-.--".to_string();
    }

    // Rounded from the float itself, so magnitudes past `u64` stay exact.
    let fixed = format!("{:.2}", v.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if v < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}${}.{cents}", group_thousands(whole))
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format the one-shot prediction report (query echo + result breakdown).
pub fn format_prediction_report(query: &ListingQuery, result: &PredictionResult) -> String {
    let mut out = String::new();

    out.push_str("=== rd - Listing Price Forecast ===\n");
    out.push_str(&format!(
        "Listing: {} | {} | available={}\n",
        query.neighborhood, query.room_type, query.available
    ));
    out.push_str(&format!(
        "Size: acc={} bed={} bath={} amenities={}\n",
        query.acc, query.bed, query.bath, query.amenities
    ));
    out.push_str(&format!(
        "Date: month={} day={} day_of_week={} weekend={}\n",
        query.seasonal.month, query.seasonal.day, query.seasonal.day_of_week, query.seasonal.is_weekend
    ));

    out.push_str(&format!("\nForecast: {}\n", format_currency(result.price)));
    out.push_str(&format!(
        "Range: {} - {}\n",
        format_currency(result.range_low),
        format_currency(result.range_high)
    ));
    out.push_str(&format!("Estimate: {}\n", format_currency(result.rf)));
    out.push_str(&format!("Tier: {} (index {:.0})\n", result.tier, result.tier.scale()));

    out.push_str("\nFeature impact:\n");
    for (label, value) in crate::domain::ImpactScores::LABELS.iter().zip(result.impact.values()) {
        out.push_str(&format!("  {label:<10} {value:>8.3}\n"));
    }

    if !result.insights.is_empty() {
        out.push_str("\nInsights:\n");
        for text in &result.insights {
            out.push_str(&format!("  \" {text} \"\n"));
        }
    }

    out
}
