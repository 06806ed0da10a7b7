//! Lenient numeric input handling.
//!
//! Numeric form controls never reject input: text is read as the longest
//! leading decimal number, and anything without such a prefix becomes zero.

use regex::Regex;
use serde::{Deserialize, Deserializer};
use std::sync::LazyLock;

static NUMERIC_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("numeric prefix pattern")
});

/// Coerces raw control text to a number, treating unreadable input as zero.
pub fn coerce_number(raw: &str) -> f64 {
    let text = raw.trim_start();
    let value = NUMERIC_PREFIX
        .find(text)
        .and_then(|m| m.as_str().parse::<f64>().ok());

    match value {
        // `+ 0.0` turns "-0" into 0
        Some(v) if v.is_finite() => v + 0.0,
        Some(_) => {
            tracing::warn!("Numeric input '{}' is out of range, using 0", raw);
            0.0
        }
        None => {
            if !text.trim().is_empty() {
                tracing::warn!("Non-numeric input '{}' treated as 0", raw);
            }
            0.0
        }
    }
}

/// Accepts a JSON/TOML number, a numeric string, or null for an `f64` field.
pub fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
        Flag(#[allow(dead_code)] bool),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(n)) if n.is_finite() => n,
        Some(Raw::Number(_)) | Some(Raw::Flag(_)) | None => 0.0,
        Some(Raw::Text(s)) => coerce_number(&s),
    })
}
