use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{json, Value};
use thiserror::Error;
use tierquote_core::{calculate_quotation, QuotationError};

#[derive(Debug, Error)]
pub enum ToolError {
    /// Recoverable pricing-input failure; the runtime answers with a
    /// correction prompt instead of a number.
    #[error(transparent)]
    Quotation(#[from] QuotationError),
    /// The model sent arguments outside the declared schema.
    #[error("invalid tool arguments: {0}")]
    InvalidArguments(String),
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    /// JSON schema for the tool's parameters, rendered into the model's
    /// function declarations.
    fn parameters(&self) -> Value;
    async fn execute(&self, args: Value) -> Result<Value, ToolError>;
}

#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn register<T>(&mut self, tool: T)
    where
        T: Tool + 'static,
    {
        self.tools.insert(tool.name().to_string(), Box::new(tool));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|tool| tool.as_ref())
    }

    /// Function declarations in Gemini form, sorted by name so the request
    /// body is stable across runs.
    pub fn declarations(&self) -> Vec<Value> {
        let mut tools: Vec<&dyn Tool> = self.tools.values().map(|tool| tool.as_ref()).collect();
        tools.sort_by_key(|tool| tool.name());
        tools
            .into_iter()
            .map(|tool| {
                json!({
                    "name": tool.name(),
                    "description": tool.description(),
                    "parameters": tool.parameters(),
                })
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// The quotation calculation tool. Parameter schema is exactly
/// `(tier: string, tokens: integer)` and the return value is the pricing
/// engine's formatted string.
#[derive(Clone, Copy, Debug, Default)]
pub struct QuotationTool;

impl QuotationTool {
    pub const NAME: &'static str = "calculate_quotation";
}

#[async_trait]
impl Tool for QuotationTool {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn description(&self) -> &'static str {
        "Calculates the total contracting cost for a generative AI tier, \
         given the tier name and the number of tokens"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "tier": {
                    "type": "string",
                    "description": "Tier name: fast, pro, or deep research"
                },
                "tokens": {
                    "type": "integer",
                    "description": "Number of tokens to contract (non-negative)"
                }
            },
            "required": ["tier", "tokens"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let tier = args
            .get("tier")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::InvalidArguments("`tier` must be a string".to_string()))?;
        let tokens = parse_tokens(args.get("tokens"))?;

        let quotation = calculate_quotation(tier, tokens)?;
        Ok(Value::String(quotation))
    }
}

/// The schema declares `integer`; some models still send the count as a
/// quoted string, which is accepted. Fractional or missing counts map to
/// `InvalidTokenCount` so the user gets a correction prompt.
fn parse_tokens(value: Option<&Value>) -> Result<i64, ToolError> {
    let value = value.ok_or_else(|| QuotationError::InvalidTokenCount {
        input: "(missing)".to_string(),
    })?;

    if let Some(tokens) = value.as_i64() {
        return Ok(tokens);
    }
    if let Some(text) = value.as_str() {
        if let Ok(tokens) = text.trim().parse::<i64>() {
            return Ok(tokens);
        }
    }

    Err(QuotationError::InvalidTokenCount { input: value.to_string() }.into())
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};
    use tierquote_core::QuotationError;

    use super::{QuotationTool, Tool, ToolError, ToolRegistry};

    #[tokio::test]
    async fn quotation_tool_prices_a_valid_request() {
        let result = QuotationTool
            .execute(json!({"tier": "fast", "tokens": 100}))
            .await
            .expect("valid arguments");
        assert_eq!(
            result,
            Value::String(
                "Quotation: fast for 100 tokens -> R$ 15750.00 (includes 5% usage fee)"
                    .to_string()
            )
        );
    }

    #[tokio::test]
    async fn quotation_tool_accepts_a_numeric_string_token_count() {
        let result = QuotationTool
            .execute(json!({"tier": "pro", "tokens": "50"}))
            .await
            .expect("numeric string should parse");
        assert!(result.as_str().is_some_and(|text| text.contains("R$ 16200.00")));
    }

    #[tokio::test]
    async fn unknown_tier_surfaces_as_a_quotation_error() {
        let error = QuotationTool
            .execute(json!({"tier": "ultra", "tokens": 10}))
            .await
            .unwrap_err();
        assert!(matches!(
            error,
            ToolError::Quotation(QuotationError::UnknownTier { .. })
        ));
    }

    #[tokio::test]
    async fn negative_tokens_surface_as_a_quotation_error() {
        let error = QuotationTool
            .execute(json!({"tier": "pro", "tokens": -5}))
            .await
            .unwrap_err();
        assert!(matches!(
            error,
            ToolError::Quotation(QuotationError::InvalidTokenCount { .. })
        ));
    }

    #[tokio::test]
    async fn fractional_tokens_are_rejected_not_truncated() {
        let error = QuotationTool
            .execute(json!({"tier": "fast", "tokens": 10.5}))
            .await
            .unwrap_err();
        assert!(matches!(
            error,
            ToolError::Quotation(QuotationError::InvalidTokenCount { .. })
        ));
    }

    #[tokio::test]
    async fn missing_tokens_ask_for_a_token_count() {
        let error = QuotationTool.execute(json!({"tier": "fast"})).await.unwrap_err();
        assert!(matches!(
            error,
            ToolError::Quotation(QuotationError::InvalidTokenCount { .. })
        ));
    }

    #[tokio::test]
    async fn non_string_tier_is_a_schema_violation() {
        let error = QuotationTool
            .execute(json!({"tier": 3, "tokens": 10}))
            .await
            .unwrap_err();
        assert!(matches!(error, ToolError::InvalidArguments(_)));
    }

    #[test]
    fn registry_renders_the_declared_schema() {
        let mut registry = ToolRegistry::default();
        registry.register(QuotationTool);

        let declarations = registry.declarations();
        assert_eq!(declarations.len(), 1);
        assert_eq!(declarations[0]["name"], "calculate_quotation");
        assert_eq!(declarations[0]["parameters"]["required"], json!(["tier", "tokens"]));
        assert_eq!(
            declarations[0]["parameters"]["properties"]["tokens"]["type"],
            "integer"
        );
    }

    #[test]
    fn registry_lookup_is_by_declared_name() {
        let mut registry = ToolRegistry::default();
        assert!(registry.is_empty());
        registry.register(QuotationTool);
        assert_eq!(registry.len(), 1);
        assert!(registry.get(QuotationTool::NAME).is_some());
        assert!(registry.get("send_email").is_none());
    }
}
