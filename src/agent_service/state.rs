use std::sync::Arc;

use crate::agent_service::completion::CompletionProvider;
use crate::agent_service::config::ModelDefaults;
use crate::agent_service::prompts::AgentPromptTable;

/// Read-only state shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub prompts: Arc<AgentPromptTable>,
    pub models: ModelDefaults,
    pub completion: Arc<dyn CompletionProvider>,
}

impl AppState {
    pub fn new(models: ModelDefaults, completion: Arc<dyn CompletionProvider>) -> Self {
        Self {
            prompts: Arc::new(AgentPromptTable::default()),
            models,
            completion,
        }
    }

    pub fn fast_model_or(&self, requested: Option<String>) -> String {
        pick_model(requested, &self.models.fast)
    }

    pub fn smart_model_or(&self, requested: Option<String>) -> String {
        pick_model(requested, &self.models.smart)
    }
}

fn pick_model(requested: Option<String>, default: &str) -> String {
    requested
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| default.to_string())
}
