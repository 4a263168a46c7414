use async_trait::async_trait;

use crate::{
    llm::{options::CallOptions, LLMError},
    schemas::{LLMResult, LLMStreamingResult},
};

#[async_trait]
pub trait LLM: Sync + Send {
    /// Runs every prompt and returns the completions grouped per prompt.
    async fn generate(&self, prompts: Vec<String>) -> Result<LLMResult, LLMError>;

    /// Starts one streaming generation per prompt, in prompt order.
    async fn stream(&self, prompts: Vec<String>) -> Result<LLMStreamingResult, LLMError>;

    async fn invoke(&self, prompt: &str) -> Result<String, LLMError> {
        let result = self.generate(vec![prompt.to_string()]).await?;
        let text = result
            .into_generations()
            .into_iter()
            .next()
            .and_then(|generations| generations.into_iter().next())
            .ok_or(LLMError::ContentNotFound("No generations".into()))?
            .into_text();
        Ok(text)
    }

    /// This is useful when you want to create a chain and override
    /// LLM options
    fn add_call_options(&mut self, call_options: CallOptions);
}

impl<L> From<L> for Box<dyn LLM>
where
    L: 'static + LLM,
{
    fn from(llm: L) -> Self {
        Box::new(llm)
    }
}
