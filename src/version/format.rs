//! Display formatting for raw version identifiers

use chrono::{DateTime, Datelike, Utc};

use super::types::VersionScheme;

/// Largest magnitude a timestamp may have (100 million days either side of the epoch)
const MAX_TIMESTAMP_MS: f64 = 8.64e15;

/// Rendering of an unrepresentable date, one `NaN` per calendar field
const INVALID_DATE: &str = "NaNNaNNaN";

/// Convert a raw identifier into its comparable display form
///
/// Date identifiers become `YYYYMMDD` (UTC). Tags pass through unchanged.
/// Never fails: a malformed date identifier renders as `NaNNaNNaN`.
pub fn format_version(scheme: VersionScheme, raw: &str) -> String {
    match scheme {
        VersionScheme::Date => format_version_date(raw),
        VersionScheme::Tag => raw.to_string(),
    }
}

fn format_version_date(raw: &str) -> String {
    let Some(date) = parse_epoch_millis(raw) else {
        return INVALID_DATE.to_string();
    };

    format!("{}{:02}{:02}", date.year(), date.month(), date.day())
}

/// Lenient numeric read: surrounding whitespace is ignored, empty is zero,
/// fractions truncate toward zero.
fn parse_epoch_millis(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    let millis = if trimmed.is_empty() {
        0.0
    } else {
        trimmed.parse::<f64>().ok()?
    };

    if !millis.is_finite() || millis.abs() > MAX_TIMESTAMP_MS {
        return None;
    }

    DateTime::from_timestamp_millis(millis.trunc() as i64)
}
