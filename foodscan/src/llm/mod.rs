mod api;
pub mod prompts;
mod provider;

pub use api::LlmApiClient;
pub use prompts::AnalysisPrompt;
pub use provider::{LlmBackend, LlmProvider, VisionModel};
