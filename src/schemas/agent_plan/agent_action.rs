use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// A tool invocation requested by an agent.
///
/// `tool` names the tool to run and `tool_input` is the raw payload handed to it.
/// `log` keeps the free-text reasoning the agent produced before deciding on the action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentAction {
    tool: String,
    tool_input: String,
    #[serde(default)]
    log: String,
}

impl AgentAction {
    pub fn new(
        tool: impl Into<String>,
        tool_input: impl Into<String>,
        log: impl Into<String>,
    ) -> Self {
        Self {
            tool: tool.into(),
            tool_input: tool_input.into(),
            log: log.into(),
        }
    }

    pub fn tool(&self) -> &str {
        &self.tool
    }

    pub fn tool_input(&self) -> &str {
        &self.tool_input
    }

    pub fn log(&self) -> &str {
        &self.log
    }
}

impl Display for AgentAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.tool, self.tool_input)
    }
}
