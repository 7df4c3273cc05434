//! Merchant identification from raw receipt text.

use regex::RegexBuilder;

use crate::error::{RecrError, Result};
use crate::models::config::MerchantPattern;

/// Matches raw text against an ordered table of known-merchant patterns.
///
/// Order matters: the first pattern that matches anywhere in the text wins,
/// so the result is deterministic for a fixed table.
pub struct MerchantMatcher {
    patterns: Vec<(String, regex::Regex)>,
}

impl MerchantMatcher {
    /// Compile the pattern table. Fails if any configured pattern is not a
    /// valid regex.
    pub fn from_config(merchants: &[MerchantPattern]) -> Result<Self> {
        let mut patterns = Vec::with_capacity(merchants.len());

        for entry in merchants {
            let regex = RegexBuilder::new(&entry.pattern)
                .case_insensitive(true)
                .build()
                .map_err(|e| {
                    RecrError::Config(format!(
                        "invalid merchant pattern for {}: {}",
                        entry.name, e
                    ))
                })?;
            patterns.push((entry.name.clone(), regex));
        }

        Ok(Self { patterns })
    }

    /// First merchant whose pattern matches the text, in table order.
    pub fn identify(&self, text: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|(_, regex)| regex.is_match(text))
            .map(|(name, _)| name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::ParserConfig;

    fn matcher() -> MerchantMatcher {
        MerchantMatcher::from_config(&ParserConfig::default().merchants).unwrap()
    }

    #[test]
    fn test_identify_spacing_and_hyphen_variants() {
        let m = matcher();

        assert_eq!(m.identify("WAL-MART SUPERCENTER #1234"), Some("Walmart"));
        assert_eq!(m.identify("walmart neighborhood market"), Some("Walmart"));
        assert_eq!(m.identify("WAL MART"), Some("Walmart"));
    }

    #[test]
    fn test_identify_apostrophe_variants() {
        let m = matcher();

        assert_eq!(m.identify("McDonalds Restaurant #456"), Some("McDonald's"));
        assert_eq!(m.identify("MCDONALD'S"), Some("McDonald's"));
        assert_eq!(m.identify("wendys drive thru"), Some("Wendy's"));
    }

    #[test]
    fn test_first_match_wins() {
        let m = matcher();

        // IKEA precedes Starbucks in the table.
        assert_eq!(m.identify("IKEA food court - Starbucks kiosk"), Some("IKEA"));
    }

    #[test]
    fn test_unknown_merchant() {
        let m = matcher();

        assert_eq!(m.identify("Bob's Corner Store"), None);
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let bad = vec![MerchantPattern {
            name: "Broken".to_string(),
            pattern: "(unclosed".to_string(),
        }];

        assert!(MerchantMatcher::from_config(&bad).is_err());
    }
}
