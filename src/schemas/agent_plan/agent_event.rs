use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{AgentAction, AgentFinish};

/// The outcome of a single planning step: either call a tool or stop.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AgentEvent {
    Action(AgentAction),
    Finish(AgentFinish),
}

impl AgentEvent {
    pub fn is_finish(&self) -> bool {
        matches!(self, AgentEvent::Finish(_))
    }

    pub fn log(&self) -> &str {
        match self {
            AgentEvent::Action(action) => action.log(),
            AgentEvent::Finish(finish) => finish.log(),
        }
    }
}

impl From<AgentAction> for AgentEvent {
    fn from(action: AgentAction) -> Self {
        AgentEvent::Action(action)
    }
}

impl From<AgentFinish> for AgentEvent {
    fn from(finish: AgentFinish) -> Self {
        AgentEvent::Finish(finish)
    }
}

impl<'de> Deserialize<'de> for AgentEvent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;

        if value.get("tool").is_some() {
            AgentAction::deserialize(value)
                .map(AgentEvent::Action)
                .map_err(serde::de::Error::custom)
        } else if value.get("return_values").is_some() {
            AgentFinish::deserialize(value)
                .map(AgentEvent::Finish)
                .map_err(serde::de::Error::custom)
        } else {
            Err(serde::de::Error::custom(format!(
                "Invalid format: {}",
                value
            )))
        }
    }
}
