use serde::{Deserialize, Serialize};

use super::AgentAction;

/// An action the agent took, paired with what the tool returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentStep {
    action: AgentAction,
    observation: String,
}

impl AgentStep {
    pub fn new(action: AgentAction, observation: impl Into<String>) -> Self {
        Self {
            action,
            observation: observation.into(),
        }
    }

    pub fn action(&self) -> &AgentAction {
        &self.action
    }

    pub fn observation(&self) -> &str {
        &self.observation
    }
}
