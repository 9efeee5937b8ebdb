pub mod narrative;
pub mod provider;
pub mod providers;

pub use narrative::{
    build_prompt, narrator_from_config, ConfiguredNarrator, DisabledNarrator, NarrativeGenerator,
    NarrativeRequest, NOT_CONFIGURED,
};
pub use provider::{LlmError, LlmProvider, Message, Role};
