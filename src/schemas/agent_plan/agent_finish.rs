use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The final answer of an agent, returned when no further tool call is needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentFinish {
    return_values: HashMap<String, Value>,
    #[serde(default)]
    log: String,
}

impl AgentFinish {
    pub fn new(return_values: HashMap<String, Value>, log: impl Into<String>) -> Self {
        Self {
            return_values,
            log: log.into(),
        }
    }

    pub fn return_values(&self) -> &HashMap<String, Value> {
        &self.return_values
    }

    /// Looks up a single return value, e.g. `"output"`.
    pub fn return_value(&self, key: &str) -> Option<&Value> {
        self.return_values.get(key)
    }

    pub fn log(&self) -> &str {
        &self.log
    }

    pub fn into_return_values(self) -> HashMap<String, Value> {
        self.return_values
    }
}
