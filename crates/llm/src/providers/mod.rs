pub mod azure_openai;

use triage_core::config::AzureOpenAiConfig;

use crate::provider::{LlmError, LlmProvider};

/// Create the chat provider described by config.
pub fn create_provider(config: &AzureOpenAiConfig) -> Result<Box<dyn LlmProvider>, LlmError> {
    let endpoint = config
        .endpoint
        .as_ref()
        .ok_or_else(|| LlmError::NotConfigured("AZURE_OPENAI_ENDPOINT not set".into()))?;
    let api_key = config
        .api_key
        .as_ref()
        .ok_or_else(|| LlmError::NotConfigured("AZURE_OPENAI_KEY not set".into()))?;
    let deployment = config
        .chat_deployment
        .as_ref()
        .ok_or_else(|| LlmError::NotConfigured("AZURE_OPENAI_CHAT_DEPLOYMENT not set".into()))?;

    Ok(Box::new(azure_openai::AzureOpenAiProvider::new(
        endpoint.clone(),
        api_key.clone(),
        deployment.clone(),
        config.api_version.clone(),
    )))
}
