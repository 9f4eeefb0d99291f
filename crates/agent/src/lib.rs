//! Agent runtime - intent-gated orchestration between the chat model and the
//! deterministic pricing engine.
//!
//! This crate owns the contract side of the dispatch policy:
//! - the fixed system instruction given to the model (`policy`)
//! - the tool binding the model may invoke (`tools`)
//! - the chat-model abstraction and Gemini client (`llm`)
//! - the per-message orchestration loop (`runtime`)
//!
//! # Safety principle
//!
//! The model is strictly a translator. It decides *when* the quotation tool
//! runs, never *what* the number is. Every quotation string the user sees was
//! produced by `tierquote_core::pricing`; a reply that would require the
//! model to invent a price is either a correction prompt or an error.

pub mod llm;
pub mod policy;
pub mod runtime;
pub mod tools;

pub use llm::{ChatModel, ChatRequest, FunctionCall, GeminiChatModel, ModelError, ModelReply, Turn};
pub use policy::DispatchPolicy;
pub use runtime::{AgentError, AgentRuntime};
pub use tools::{QuotationTool, Tool, ToolError, ToolRegistry};
