use std::collections::HashMap;

use serde_json::Value;

use crate::{llm::LLMError, schemas::LLMResult};

use super::StreamingGeneration;

/// Streaming counterpart of [`LLMResult`]: one [`StreamingGeneration`] per prompt,
/// in prompt order.
#[derive(Debug, Default)]
pub struct LLMStreamingResult {
    generations: Vec<StreamingGeneration>,
    llm_output: Option<HashMap<String, Value>>,
}

impl LLMStreamingResult {
    pub fn new(generations: Vec<StreamingGeneration>) -> Self {
        Self {
            generations,
            llm_output: None,
        }
    }

    pub fn with_llm_output(mut self, llm_output: HashMap<String, Value>) -> Self {
        self.llm_output = Some(llm_output);
        self
    }

    pub fn generations(&self) -> &[StreamingGeneration] {
        &self.generations
    }

    /// Mutable access, needed to drain individual generations in place.
    pub fn generations_mut(&mut self) -> &mut [StreamingGeneration] {
        &mut self.generations
    }

    pub fn llm_output(&self) -> Option<&HashMap<String, Value>> {
        self.llm_output.as_ref()
    }

    pub fn len(&self) -> usize {
        self.generations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generations.is_empty()
    }

    /// Drains every generation in prompt order into a finished [`LLMResult`].
    ///
    /// Each prompt gets exactly one generation. The first stream failure aborts
    /// the collection.
    pub async fn collect(self) -> Result<LLMResult, LLMError> {
        let mut generations = Vec::with_capacity(self.generations.len());
        for (index, generation) in self.generations.into_iter().enumerate() {
            log::trace!("Draining streaming generation {index}");
            generations.push(vec![generation.into_generation().await?]);
        }

        let result = LLMResult::new(generations);
        Ok(match self.llm_output {
            Some(llm_output) => result.with_llm_output(llm_output),
            None => result,
        })
    }
}

impl IntoIterator for LLMStreamingResult {
    type Item = StreamingGeneration;
    type IntoIter = std::vec::IntoIter<StreamingGeneration>;

    fn into_iter(self) -> Self::IntoIter {
        self.generations.into_iter()
    }
}
