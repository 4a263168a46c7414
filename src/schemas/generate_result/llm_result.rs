use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Generation;

/// Everything a model returned for a batch of prompts.
///
/// `generations[i]` holds the alternate completions for the `i`-th prompt. An inner
/// list may be empty when the provider produced nothing for that prompt.
/// `llm_output` carries provider-wide data such as token usage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LLMResult {
    generations: Vec<Vec<Generation>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    llm_output: Option<HashMap<String, Value>>,
}

impl LLMResult {
    pub fn new(generations: Vec<Vec<Generation>>) -> Self {
        Self {
            generations,
            llm_output: None,
        }
    }

    pub fn with_llm_output(mut self, llm_output: HashMap<String, Value>) -> Self {
        self.llm_output = Some(llm_output);
        self
    }

    pub fn generations(&self) -> &[Vec<Generation>] {
        &self.generations
    }

    pub fn llm_output(&self) -> Option<&HashMap<String, Value>> {
        self.llm_output.as_ref()
    }

    /// Number of prompts this result answers.
    pub fn len(&self) -> usize {
        self.generations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generations.is_empty()
    }

    pub fn into_generations(self) -> Vec<Vec<Generation>> {
        self.generations
    }
}
