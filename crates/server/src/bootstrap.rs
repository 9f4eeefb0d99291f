use std::sync::Arc;

use thiserror::Error;
use tierquote_agent::{AgentRuntime, GeminiChatModel, ModelError};
use tierquote_core::config::{AppConfig, ConfigError, LoadOptions};
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub runtime: Arc<AgentRuntime>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("chat model client initialization failed: {0}")]
    ChatModel(#[source] ModelError),
}

pub fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config)
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let model = GeminiChatModel::new(&config.llm).map_err(BootstrapError::ChatModel)?;
    let runtime = Arc::new(AgentRuntime::with_quotation_tool(Arc::new(model)));

    info!(
        event_name = "system.bootstrap.runtime_ready",
        correlation_id = "bootstrap",
        model = %config.llm.model,
        "agent runtime constructed with quotation tool"
    );

    Ok(Application { config, runtime })
}

#[cfg(test)]
mod tests {
    use tierquote_core::config::{AppConfig, ConfigOverrides, LoadOptions};

    use crate::bootstrap::{bootstrap, bootstrap_with_config, BootstrapError};

    #[test]
    fn bootstrap_fails_fast_without_an_api_key() {
        let result = bootstrap(LoadOptions {
            overrides: ConfigOverrides {
                llm_model: Some("gemini-2.0-flash".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        });

        let message = match result {
            Ok(_) => panic!("bootstrap should fail without an api key"),
            Err(error) => error.to_string(),
        };
        assert!(message.contains("llm.api_key"));
    }

    #[test]
    fn bootstrap_constructs_a_runtime_from_a_valid_config() {
        let mut config = AppConfig::default();
        config.llm.api_key = Some("test-key".to_string().into());
        config.llm.model = "gemini-2.0-flash".to_string();
        config.validate().expect("config should be valid");

        let app = match bootstrap_with_config(config) {
            Ok(app) => app,
            Err(BootstrapError::Config(error)) => panic!("unexpected config error: {error}"),
            Err(BootstrapError::ChatModel(error)) => panic!("unexpected client error: {error}"),
        };
        assert_eq!(app.config.llm.model, "gemini-2.0-flash");
    }
}
