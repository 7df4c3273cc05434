//! Purchase date extraction.

use chrono::NaiveDate;
use regex::Regex;

use super::patterns::{
    DATE_DAY_MONTH_NAME, DATE_EU_DOT, DATE_ISO, DATE_SHORT_YEAR, DATE_US_DASH, DATE_US_SLASH,
};

/// Date extractor trying an ordered list of (pattern, format) pairs.
///
/// The list order defines precedence: the first pattern whose first match in
/// the text also parses under the paired format wins. A match that fails to
/// parse falls through to the next pair rather than failing the extraction.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }

    fn formats() -> [(&'static Regex, &'static str); 6] {
        [
            (&*DATE_ISO, "%Y-%m-%d"),
            (&*DATE_US_SLASH, "%m/%d/%Y"),
            (&*DATE_US_DASH, "%m-%d-%Y"),
            (&*DATE_SHORT_YEAR, "%m/%d/%y"),
            (&*DATE_EU_DOT, "%d.%m.%Y"),
            (&*DATE_DAY_MONTH_NAME, "%d %b %Y"),
        ]
    }

    /// Extract the purchase date, normalized to a calendar date.
    pub fn extract(&self, text: &str) -> Option<NaiveDate> {
        for (pattern, format) in Self::formats() {
            if let Some(caps) = pattern.captures(text) {
                if let Ok(date) = NaiveDate::parse_from_str(&caps[1], format) {
                    return Some(date);
                }
            }
        }

        None
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}
