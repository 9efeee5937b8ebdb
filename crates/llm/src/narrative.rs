//! Optional incident narrative: a short summary and runbook written by a chat model.
//!
//! Exposed as the [`NarrativeGenerator`] capability with two variants:
//! [`ConfiguredNarrator`] (calls an [`LlmProvider`]) and [`DisabledNarrator`]
//! (returns [`NOT_CONFIGURED`]). Callers pick one once via
//! [`narrator_from_config`] and never branch on availability again.

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};
use triage_core::config::AzureOpenAiConfig;
use triage_core::Severity;

use crate::provider::{LlmError, LlmProvider, Message};
use crate::providers::create_provider;

/// Returned by the disabled narrator.
pub const NOT_CONFIGURED: &str = "Azure OpenAI not configured.";

const SYSTEM_PROMPT: &str = "You are concise, operational, and pragmatic.";

/// Incident context handed to the narrator.
#[derive(Debug, Clone, Serialize)]
pub struct NarrativeRequest {
    pub pipeline: String,
    pub severity: Severity,
    pub findings: Vec<String>,
    pub actions: Vec<String>,
}

impl NarrativeRequest {
    pub fn new(
        pipeline: impl Into<String>,
        severity: Severity,
        findings: Vec<String>,
        actions: Vec<String>,
    ) -> Self {
        Self {
            pipeline: pipeline.into(),
            severity,
            findings,
            actions,
        }
    }
}

#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    /// Free-form narrative text. The caller decides how to surface errors.
    async fn generate_narrative(&self, request: &NarrativeRequest) -> Result<String, LlmError>;

    fn is_available(&self) -> bool;
}

/// Narrator backed by a chat-completion provider.
pub struct ConfiguredNarrator {
    provider: Box<dyn LlmProvider>,
    temperature: f32,
    max_tokens: u32,
}

impl ConfiguredNarrator {
    pub fn new(provider: Box<dyn LlmProvider>, temperature: f32, max_tokens: u32) -> Self {
        Self {
            provider,
            temperature,
            max_tokens,
        }
    }
}

#[async_trait]
impl NarrativeGenerator for ConfiguredNarrator {
    async fn generate_narrative(&self, request: &NarrativeRequest) -> Result<String, LlmError> {
        info!(pipeline = %request.pipeline, severity = %request.severity, "Generating narrative");

        let messages = vec![Message::system(SYSTEM_PROMPT), Message::user(build_prompt(request))];
        let text = self
            .provider
            .complete(messages, self.temperature, self.max_tokens)
            .await?;
        Ok(text.trim().to_string())
    }

    fn is_available(&self) -> bool {
        true
    }
}

pub struct DisabledNarrator;

#[async_trait]
impl NarrativeGenerator for DisabledNarrator {
    async fn generate_narrative(&self, _request: &NarrativeRequest) -> Result<String, LlmError> {
        Ok(NOT_CONFIGURED.to_string())
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// Pick the narrator variant for this config.
pub fn narrator_from_config(config: &AzureOpenAiConfig) -> Box<dyn NarrativeGenerator> {
    if !config.is_configured() {
        return Box::new(DisabledNarrator);
    }
    match create_provider(config) {
        Ok(provider) => Box::new(ConfiguredNarrator::new(
            provider,
            config.temperature,
            config.max_tokens,
        )),
        Err(e) => {
            warn!(error = %e, "Narrative provider unavailable, falling back to disabled narrator");
            Box::new(DisabledNarrator)
        }
    }
}

fn bullet_list(items: &[String]) -> String {
    if items.is_empty() {
        "None".to_string()
    } else {
        items.join("\n- ")
    }
}

/// User prompt for the incident-commander narrative.
pub fn build_prompt(request: &NarrativeRequest) -> String {
    format!(
        "You are a DataOps incident commander. Create a concise incident summary and a 6-step runbook.\n\
         \n\
         Pipeline: {pipeline}\n\
         Severity: {severity}\n\
         Key findings:\n\
         - {findings}\n\
         \n\
         Recommended actions:\n\
         - {actions}\n\
         \n\
         Rules:\n\
         - Summary first (3-4 lines, no fluff).\n\
         - Then 'Runbook:' with 6 numbered, imperative steps (short).\n\
         - End with 'Exit criteria:' (2 bullets).\n",
        pipeline = request.pipeline,
        severity = request.severity,
        findings = bullet_list(&request.findings),
        actions = bullet_list(&request.actions),
    )
}
