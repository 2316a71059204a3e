//! Form validation: raw widget values → [`ListingQuery`].
//!
//! Building a query never fails. Numeric fields follow one named rule,
//! [`coerce_non_negative`]; categorical fields pass through untouched.

use crate::domain::{FormInputs, ListingQuery, SeasonalContext};

/// Build the request payload from the raw form values and the resolved date context.
pub fn build_query(inputs: &FormInputs, seasonal: SeasonalContext) -> ListingQuery {
    ListingQuery {
        acc: coerce_non_negative(&inputs.acc),
        bed: coerce_non_negative(&inputs.bed),
        bath: coerce_non_negative(&inputs.bath),
        amenities: coerce_non_negative(&inputs.amenities),
        neighborhood: inputs.neighborhood.clone(),
        room_type: inputs.room_type.clone(),
        available: inputs.available.clone(),
        seasonal,
    }
}

/// Numeric coercion rule for form fields.
///
/// - the longest leading decimal literal is parsed (`"3 guests"` → 3)
/// - no number, or a non-finite one → `0`
/// - negative → its absolute value
pub fn coerce_non_negative(raw: &str) -> f64 {
    match leading_number(raw) {
        Some(v) if v.is_finite() => v.abs(),
        _ => 0.0,
    }
}

/// Parse the longest prefix of `raw` (after leading whitespace) that forms a
/// decimal literal: `[+-]? digits? (. digits?)? ([eE] [+-]? digits)?`, with at
/// least one mantissa digit.
fn leading_number(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        end = frac_end;
    }

    if mantissa_digits == 0 {
        return None;
    }

    // Only consume an exponent if it is complete.
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }

    let literal = s[..end].trim_end_matches('.');
    // "+." / "-." never reach here (mantissa_digits > 0), but "5." trims to "5".
    literal.parse::<f64>().ok()
}
