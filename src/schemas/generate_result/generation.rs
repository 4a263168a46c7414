use std::{
    collections::HashMap,
    fmt::{self, Display},
};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw provider metadata attached to a generation, e.g. the reason it finished.
pub type GenerationInfo = HashMap<String, Value>;

/// Output of a single completion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Generation {
    text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    generation_info: Option<GenerationInfo>,
}

impl Generation {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            generation_info: None,
        }
    }

    pub fn with_generation_info(mut self, generation_info: GenerationInfo) -> Self {
        self.generation_info = Some(generation_info);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn generation_info(&self) -> Option<&GenerationInfo> {
        self.generation_info.as_ref()
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

impl Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}
