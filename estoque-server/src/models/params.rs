//! Lenient parsing of query-string and body scalars
//!
//! Browser clients send numbers as strings, padded ids, and on/off tokens.
//! These helpers accept the same loose inputs the frontend has always sent.

use once_cell::sync::Lazy;
use regex::Regex;

use super::ValidationError;

/// Optional sign followed by digits, after leading whitespace
static LEADING_INT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([+-]?\d+)").expect("invalid leading int regex"));

/// Parse the integer prefix of a string (`" 42abc"` → 42).
///
/// Returns `None` when the string does not start with a number or the
/// number does not fit in an `i64`.
pub fn parse_leading_int(s: &str) -> Option<i64> {
    LEADING_INT_RE
        .captures(s)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// `1`, `true`, `yes` or `on`, case-insensitive, ignoring surrounding whitespace.
pub fn is_on_token(s: &str) -> bool {
    matches!(
        s.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Positive ids taken from a comma-separated list, deduplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdList(Vec<u64>);

impl IdList {
    /// Parse `"10, 11,12"` style input.
    ///
    /// # Rules
    /// - Blank input is `Required`
    /// - Pieces that are not positive integers are dropped
    /// - Nothing left after dropping is `Invalid`
    /// - Duplicates keep their first position
    ///
    /// # Example
    /// ```
    /// use estoque_server::models::IdList;
    ///
    /// let ids = IdList::parse("3, 1,3,x,-2").unwrap();
    /// assert_eq!(ids.as_slice(), &[3, 1]);
    /// assert!(IdList::parse("  ").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ValidationError::Required { field: "id" });
        }

        let mut ids: Vec<u64> = Vec::new();
        for id in raw
            .split(',')
            .filter_map(parse_leading_int)
            .filter(|&n| n > 0)
            .map(|n| n as u64)
        {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }

        if ids.is_empty() {
            return Err(ValidationError::Invalid { field: "id" });
        }

        Ok(Self(ids))
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
