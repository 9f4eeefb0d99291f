use thiserror::Error;

/// Validation failures raised by the pricing engine.
///
/// Both kinds are recoverable: the dispatch layer turns them into correction
/// prompts for the user instead of presenting a number.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum QuotationError {
    #[error("unknown tier `{input}` (expected fast, pro, or deep research)")]
    UnknownTier { input: String },
    #[error("invalid token count `{input}` (expected a non-negative integer)")]
    InvalidTokenCount { input: String },
}

impl QuotationError {
    /// User-safe correction text, kept separate from the internal `Display`
    /// so log lines can carry the offending input without leaking it to chat.
    pub fn user_message(&self) -> String {
        match self {
            Self::UnknownTier { .. } => {
                "I don't recognize that tier. The available tiers are fast, pro, \
                 and deep research. Which one would you like a quotation for?"
                    .to_string()
            }
            Self::InvalidTokenCount { .. } => {
                "The token count must be a non-negative whole number. \
                 How many tokens would you like to contract?"
                    .to_string()
            }
        }
    }
}
