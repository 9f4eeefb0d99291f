//! The assistant endpoint: one free-text user message in, one free-text
//! reply out.
//!
//! - `POST /api/v1/assistant` — raw text body, raw text response.
//!
//! Pricing-input problems never surface here as errors; the agent runtime
//! already turned them into correction prompts. Only an external-model
//! failure reaches this layer, and it maps to `502 Bad Gateway` with a
//! user-safe body and a correlation id for the logs.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Router};
use tierquote_agent::AgentRuntime;
use tracing::{error, info};
use uuid::Uuid;

#[derive(Clone)]
pub struct AssistantState {
    runtime: Arc<AgentRuntime>,
}

pub fn router(runtime: Arc<AgentRuntime>) -> Router {
    Router::new()
        .route("/api/v1/assistant", post(ask_assistant))
        .with_state(AssistantState { runtime })
}

pub async fn ask_assistant(
    State(state): State<AssistantState>,
    user_message: String,
) -> (StatusCode, String) {
    let correlation_id = Uuid::new_v4().to_string();

    info!(
        event_name = "assistant.request.received",
        correlation_id = %correlation_id,
        message_chars = user_message.len(),
        "assistant request received"
    );

    match state.runtime.handle_message(&user_message).await {
        Ok(reply) => {
            info!(
                event_name = "assistant.request.answered",
                correlation_id = %correlation_id,
                reply_chars = reply.len(),
                "assistant request answered"
            );
            (StatusCode::OK, reply)
        }
        Err(agent_error) => {
            error!(
                event_name = "assistant.request.failed",
                correlation_id = %correlation_id,
                error = %agent_error,
                "external model collaborator failed"
            );
            let body = format!("{} (ref: {correlation_id})", agent_error.user_message());
            (StatusCode::BAD_GATEWAY, body)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::json;
    use tierquote_agent::{
        AgentRuntime, ChatModel, ChatRequest, FunctionCall, ModelError, ModelReply,
    };
    use tower::util::ServiceExt;

    use super::router;

    struct ScriptedModel {
        replies: Mutex<VecDeque<Result<ModelReply, ModelError>>>,
    }

    impl ScriptedModel {
        fn new(replies: Vec<Result<ModelReply, ModelError>>) -> Arc<Self> {
            Arc::new(Self { replies: Mutex::new(replies.into_iter().collect()) })
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedModel {
        async fn generate(&self, _request: ChatRequest<'_>) -> Result<ModelReply, ModelError> {
            self.replies
                .lock()
                .expect("replies lock")
                .pop_front()
                .expect("scripted model ran out of replies")
        }
    }

    fn post_message(text: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/assistant")
            .body(Body::from(text.to_string()))
            .expect("request builds")
    }

    async fn body_text(body: Body) -> String {
        let bytes = to_bytes(body, usize::MAX).await.expect("body reads");
        String::from_utf8(bytes.to_vec()).expect("body is utf-8")
    }

    #[tokio::test]
    async fn replies_are_returned_verbatim_as_raw_text() {
        let model = ScriptedModel::new(vec![Ok(ModelReply::Text(
            "We offer fast, pro, and deep research.".to_string(),
        ))]);
        let app = router(Arc::new(AgentRuntime::with_quotation_tool(model)));

        let response =
            app.oneshot(post_message("what models do you offer?")).await.expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response.into_body()).await;
        assert_eq!(body, "We offer fast, pro, and deep research.");
    }

    #[tokio::test]
    async fn quotation_replies_carry_the_engine_total() {
        let model = ScriptedModel::new(vec![
            Ok(ModelReply::FunctionCall(FunctionCall {
                name: "calculate_quotation".to_string(),
                args: json!({ "tier": "pro", "tokens": 50 }),
            })),
            Ok(ModelReply::Text(
                "Quotation: pro for 50 tokens -> R$ 16200.00 (includes 8% usage fee)"
                    .to_string(),
            )),
        ]);
        let app = router(Arc::new(AgentRuntime::with_quotation_tool(model)));

        let response =
            app.oneshot(post_message("price for pro, 50 tokens")).await.expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response.into_body()).await;
        assert!(body.contains("R$ 16200.00"));
    }

    #[tokio::test]
    async fn model_failure_maps_to_bad_gateway_without_a_quotation() {
        let model = ScriptedModel::new(vec![Err(ModelError::Status {
            status: 503,
            body: "overloaded".to_string(),
        })]);
        let app = router(Arc::new(AgentRuntime::with_quotation_tool(model)));

        let response = app.oneshot(post_message("price for pro")).await.expect("response");

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_text(response.into_body()).await;
        assert!(body.contains("temporarily unavailable"));
        assert!(body.contains("(ref: "));
        assert!(!body.contains("R$"), "a failure response must never carry a number");
    }

    #[tokio::test]
    async fn pricing_corrections_are_successful_responses() {
        let model = ScriptedModel::new(vec![Ok(ModelReply::FunctionCall(FunctionCall {
            name: "calculate_quotation".to_string(),
            args: json!({ "tier": "ultra", "tokens": 10 }),
        }))]);
        let app = router(Arc::new(AgentRuntime::with_quotation_tool(model)));

        let response = app.oneshot(post_message("quote ultra 10")).await.expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response.into_body()).await;
        assert!(body.contains("fast"));
        assert!(body.contains("deep research"));
    }
}
