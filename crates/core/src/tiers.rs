//! The fixed catalog of product tiers and their pricing attributes.
//!
//! Exactly three tiers exist. Their base rates and usage fees are process-wide
//! constants expressed as pure functions over the enum, so an unrecognized
//! tier can never reach the arithmetic with a missing price.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::QuotationError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Fast,
    Pro,
    DeepResearch,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Fast, Tier::Pro, Tier::DeepResearch];

    /// Display name used in quotation output and user-facing messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Pro => "pro",
            Self::DeepResearch => "deep research",
        }
    }

    /// Base price per token, in R$.
    pub fn base_rate(&self) -> Decimal {
        match self {
            Self::Fast => Decimal::new(150_00, 2),
            Self::Pro => Decimal::new(300_00, 2),
            Self::DeepResearch => Decimal::new(500_00, 2),
        }
    }

    /// Fractional usage surcharge applied on top of the base price.
    pub fn usage_fee_pct(&self) -> Decimal {
        match self {
            Self::Fast => Decimal::new(5, 2),
            Self::Pro => Decimal::new(8, 2),
            Self::DeepResearch => Decimal::new(12, 2),
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Tier {
    type Err = QuotationError;

    /// Matches free text against the three known tiers. Input is trimmed and
    /// case-folded, and `deep research` tolerates space, underscore, and
    /// hyphen separators. Anything else is rejected; no default tier exists.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "fast" => Ok(Self::Fast),
            "pro" => Ok(Self::Pro),
            "deep research" | "deep_research" | "deep-research" => Ok(Self::DeepResearch),
            _ => Err(QuotationError::UnknownTier { input: value.trim().to_string() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::Tier;
    use crate::errors::QuotationError;

    #[test]
    fn canonical_spellings_resolve() {
        assert_eq!("fast".parse::<Tier>(), Ok(Tier::Fast));
        assert_eq!("pro".parse::<Tier>(), Ok(Tier::Pro));
        assert_eq!("deep research".parse::<Tier>(), Ok(Tier::DeepResearch));
    }

    #[test]
    fn parsing_tolerates_case_whitespace_and_separators() {
        assert_eq!("FAST".parse::<Tier>(), Ok(Tier::Fast));
        assert_eq!("  Pro ".parse::<Tier>(), Ok(Tier::Pro));
        assert_eq!("Deep Research".parse::<Tier>(), Ok(Tier::DeepResearch));
        assert_eq!("deep_research".parse::<Tier>(), Ok(Tier::DeepResearch));
        assert_eq!("deep-research".parse::<Tier>(), Ok(Tier::DeepResearch));
    }

    #[test]
    fn unknown_tier_is_rejected_with_the_offending_input() {
        let error = "ultra".parse::<Tier>().unwrap_err();
        assert_eq!(error, QuotationError::UnknownTier { input: "ultra".to_string() });
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!("   ".parse::<Tier>().is_err());
    }

    #[test]
    fn rates_and_fees_match_the_published_catalog() {
        assert_eq!(Tier::Fast.base_rate(), Decimal::new(150_00, 2));
        assert_eq!(Tier::Pro.base_rate(), Decimal::new(300_00, 2));
        assert_eq!(Tier::DeepResearch.base_rate(), Decimal::new(500_00, 2));

        assert_eq!(Tier::Fast.usage_fee_pct(), Decimal::new(5, 2));
        assert_eq!(Tier::Pro.usage_fee_pct(), Decimal::new(8, 2));
        assert_eq!(Tier::DeepResearch.usage_fee_pct(), Decimal::new(12, 2));
    }
}
