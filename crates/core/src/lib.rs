//! Deterministic core of the tierquote sales assistant.
//!
//! Everything in this crate is pure and synchronous: the tier catalog, the
//! pricing formula, the error taxonomy the dispatch layer reacts to, and the
//! layered configuration loader. The generative model never computes a price;
//! it only decides when to call into here.

pub mod config;
pub mod errors;
pub mod pricing;
pub mod tiers;

pub use errors::QuotationError;
pub use pricing::{
    calculate_quotation, price_quotation, DeterministicPricingEngine, PricingEngine,
    QuotationRequest, QuotationResult,
};
pub use tiers::Tier;
