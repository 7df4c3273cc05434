//! Return policy lookup.

use crate::models::config::ReturnPolicy;

/// Maps a merchant name to a return window in days.
pub struct PolicyResolver {
    rules: Vec<(String, u32)>,
    default_days: u32,
}

impl PolicyResolver {
    pub fn from_config(policies: &[ReturnPolicy], default_days: u32) -> Self {
        Self {
            rules: policies
                .iter()
                .map(|p| (p.merchant.to_lowercase(), p.days))
                .collect(),
            default_days,
        }
    }

    /// Return window for a merchant. Substring match, case-insensitive,
    /// first rule wins; falls back to the default window.
    pub fn days_for(&self, merchant: &str) -> u32 {
        let merchant_lower = merchant.to_lowercase();

        self.rules
            .iter()
            .find(|(store, _)| merchant_lower.contains(store.as_str()))
            .map(|(_, days)| *days)
            .unwrap_or(self.default_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::ParserConfig;

    fn resolver() -> PolicyResolver {
        let config = ParserConfig::default();
        PolicyResolver::from_config(&config.return_policies, config.default_return_days)
    }

    #[test]
    fn test_known_merchants() {
        let r = resolver();

        assert_eq!(r.days_for("Walmart"), 90);
        assert_eq!(r.days_for("Best Buy"), 15);
        assert_eq!(r.days_for("CVS"), 60);
    }

    #[test]
    fn test_substring_containment() {
        let r = resolver();

        assert_eq!(r.days_for("Walmart Supercenter #42"), 90);
        assert_eq!(r.days_for("cvs pharmacy"), 60);
    }

    #[test]
    fn test_default_window() {
        let r = resolver();

        assert_eq!(r.days_for("Unknown"), 30);
        assert_eq!(r.days_for("Bob's Corner Store"), 30);
    }
}
