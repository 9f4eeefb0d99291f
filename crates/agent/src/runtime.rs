use std::sync::Arc;

use serde_json::json;
use thiserror::Error;

use crate::llm::{ChatModel, ChatRequest, ModelError, ModelReply, Turn};
use crate::policy::DispatchPolicy;
use crate::tools::{QuotationTool, ToolError, ToolRegistry};

/// Failures the dispatch layer cannot recover from. Pricing-input errors are
/// not represented here: those are handled as correction prompts and never
/// leave the runtime as errors.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("external model call failed: {0}")]
    ExternalModel(#[from] ModelError),
    #[error("external model violated the tool contract: {0}")]
    Contract(String),
}

impl AgentError {
    pub fn user_message(&self) -> &'static str {
        "The assistant is temporarily unavailable. Please try again shortly."
    }
}

/// Per-message orchestrator. One inbound message runs one constrained loop:
/// a model turn, at most one tool execution, and at most one follow-up model
/// turn to phrase the result. Holds no mutable state and is safe to share
/// across concurrent requests.
pub struct AgentRuntime {
    model: Arc<dyn ChatModel>,
    tools: ToolRegistry,
    policy: DispatchPolicy,
}

impl AgentRuntime {
    pub fn new(model: Arc<dyn ChatModel>, tools: ToolRegistry, policy: DispatchPolicy) -> Self {
        Self { model, tools, policy }
    }

    /// Standard assembly: the quotation tool and the default dispatch policy.
    pub fn with_quotation_tool(model: Arc<dyn ChatModel>) -> Self {
        let mut tools = ToolRegistry::default();
        tools.register(QuotationTool);
        Self::new(model, tools, DispatchPolicy)
    }

    pub async fn handle_message(&self, text: &str) -> Result<String, AgentError> {
        let declarations = self.tools.declarations();
        let mut turns = vec![Turn::User(text.to_string())];

        let reply = self
            .model
            .generate(ChatRequest {
                system_instruction: self.policy.system_instruction(),
                turns: &turns,
                tool_declarations: &declarations,
            })
            .await?;

        let call = match reply {
            // Informational answer or a missing-parameter prompt; either way
            // no number was produced, so the text passes through as-is.
            ModelReply::Text(answer) => return Ok(answer),
            ModelReply::FunctionCall(call) => call,
        };

        let tool = self.tools.get(&call.name).ok_or_else(|| {
            AgentError::Contract(format!("model requested unknown tool `{}`", call.name))
        })?;

        let quotation = match tool.execute(call.args.clone()).await {
            Ok(value) => value,
            Err(ToolError::Quotation(error)) => {
                tracing::info!(
                    event_name = "agent.quotation_rejected",
                    tool = call.name.as_str(),
                    reason = %error,
                    "pricing input rejected, returning correction prompt"
                );
                return Ok(self.policy.correction_for(&error));
            }
            Err(ToolError::InvalidArguments(detail)) => {
                return Err(AgentError::Contract(detail));
            }
        };

        tracing::info!(
            event_name = "agent.quotation_computed",
            tool = call.name.as_str(),
            "pricing tool executed"
        );

        let tool_name = call.name.clone();
        turns.push(Turn::ModelCall(call));
        turns.push(Turn::FunctionResult {
            name: tool_name,
            response: json!({ "content": quotation }),
        });

        let followup = self
            .model
            .generate(ChatRequest {
                system_instruction: self.policy.system_instruction(),
                turns: &turns,
                tool_declarations: &declarations,
            })
            .await?;

        match followup {
            ModelReply::Text(answer) => Ok(answer),
            ModelReply::FunctionCall(call) => Err(AgentError::Contract(format!(
                "model requested a second tool call `{}` in one message",
                call.name
            ))),
        }
    }
}
