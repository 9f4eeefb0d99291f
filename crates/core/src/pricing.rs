//! Deterministic quotation pricing.
//!
//! `total = base_rate(tier) * tokens * (1 + usage_fee_pct(tier))`, computed in
//! `Decimal` end to end and rounded half-up to the cent. No shared state is
//! read or written, so the engine is safe under arbitrary concurrency and
//! identical inputs always render byte-identical output.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::errors::QuotationError;
use crate::tiers::Tier;

/// One validated tool invocation. Built per call, discarded after pricing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuotationRequest {
    pub tier: Tier,
    pub tokens: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotationResult {
    pub tier: Tier,
    pub tokens: u64,
    pub total: Decimal,
    pub usage_fee_pct: Decimal,
}

impl QuotationResult {
    /// Stable output format consumed verbatim by the dispatch layer:
    /// `Quotation: {tier} for {tokens} tokens -> R$ {total} (includes {fee}% usage fee)`
    pub fn render(&self) -> String {
        let fee_pct = (self.usage_fee_pct * Decimal::ONE_HUNDRED).normalize();
        format!(
            "Quotation: {} for {} tokens -> R$ {:.2} (includes {}% usage fee)",
            self.tier, self.tokens, self.total, fee_pct
        )
    }
}

pub trait PricingEngine: Send + Sync {
    fn price(&self, request: QuotationRequest) -> QuotationResult;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DeterministicPricingEngine;

impl PricingEngine for DeterministicPricingEngine {
    fn price(&self, request: QuotationRequest) -> QuotationResult {
        price_quotation(request)
    }
}

pub fn price_quotation(request: QuotationRequest) -> QuotationResult {
    let base_rate = request.tier.base_rate();
    let usage_fee_pct = request.tier.usage_fee_pct();
    let gross = base_rate * Decimal::from(request.tokens) * (Decimal::ONE + usage_fee_pct);

    QuotationResult {
        tier: request.tier,
        tokens: request.tokens,
        total: round_to_cents(gross),
        usage_fee_pct,
    }
}

/// Validates free-text inputs, prices the quotation, and renders the result.
///
/// `tier_input` is trimmed and case-folded before matching; a tier outside the
/// catalog is `UnknownTier`, never a default. Negative `tokens` is
/// `InvalidTokenCount`; zero is a valid quotation of zero cost.
pub fn calculate_quotation(tier_input: &str, tokens: i64) -> Result<String, QuotationError> {
    let tier: Tier = tier_input.parse()?;
    let tokens = u64::try_from(tokens)
        .map_err(|_| QuotationError::InvalidTokenCount { input: tokens.to_string() })?;

    Ok(price_quotation(QuotationRequest { tier, tokens }).render())
}

/// Half-up to the cent. The rates and fees in the catalog currently produce
/// exact cents, but the rounding policy is fixed here so a future rate change
/// cannot reintroduce float-style drift.
fn round_to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
