use tierquote_core::QuotationError;

/// The dispatch policy: the fixed system instruction that gates tool
/// invocation, plus the deterministic correction prompts for pricing-input
/// failures.
///
/// The instruction is consumed by the external model, so its wording is not a
/// hard guarantee. The guarantees live on this side of the seam: corrections
/// are produced here without a model round-trip, and the tool itself rejects
/// anything outside the three-tier catalog.
#[derive(Clone, Copy, Debug, Default)]
pub struct DispatchPolicy;

const SYSTEM_INSTRUCTION: &str = "\
You are a sales assistant at a GENERATIVE AI STARTUP.
Answer ONLY about generative AI (prices, usage fees, tokens, tiers, etc.).

INTENT DETECTION:
- if the message asks about VALUE, PRICE, or CONTRACTING and names a TIER \
and/or a NUMBER OF TOKENS, use the calculate_quotation tool to produce the \
quotation and explain what you are doing.
- if it is purely INFORMATIONAL (available tiers, usage policy, \
documentation), answer briefly without using the tool.

IMPORTANT:
- The only tiers are fast, pro, and deep research. Never invent other tiers.
- If data needed for the calculation is missing (tier or token count), ask \
only for what is missing. Never guess and never call the tool with a \
placeholder.
- Call calculate_quotation at most once per message and present its result \
as given; never compute, restate, or adjust a price yourself.
- If the message is about anything outside generative AI, reply only that \
you cannot help with that.";

impl DispatchPolicy {
    pub fn system_instruction(&self) -> &'static str {
        SYSTEM_INSTRUCTION
    }

    /// Correction prompt for a pricing-input failure. Returned to the user
    /// directly, bypassing the model, so the failure semantics hold even when
    /// the model misbehaves.
    pub fn correction_for(&self, error: &QuotationError) -> String {
        error.user_message()
    }
}
