use std::{
    collections::HashMap,
    sync::atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::{
    llm::{options::CallOptions, LLMError, LLM},
    schemas::{Generation, GenerationInfoCell, LLMResult, LLMStreamingResult, StreamingGeneration},
};

const MODEL_NAME: &str = "fake-list";

/// Deterministic model that answers each prompt with the next canned response,
/// wrapping around at the end of the list.
#[derive(Debug)]
pub struct FakeListLLM {
    responses: Vec<String>,
    next: AtomicUsize,
    options: CallOptions,
}

impl FakeListLLM {
    pub fn new<S: Into<String>>(responses: impl IntoIterator<Item = S>) -> Self {
        Self {
            responses: responses.into_iter().map(Into::into).collect(),
            next: AtomicUsize::new(0),
            options: CallOptions::default(),
        }
    }

    fn next_response(&self) -> Result<String, LLMError> {
        if self.responses.is_empty() {
            return Err(LLMError::OtherError("FakeListLLM has no responses".into()));
        }
        let index = self.next.fetch_add(1, Ordering::Relaxed) % self.responses.len();
        Ok(self.responses[index].clone())
    }

    fn llm_output() -> HashMap<String, Value> {
        HashMap::from([("model_name".to_string(), json!(MODEL_NAME))])
    }
}

/// Splits after every whitespace run so the pieces concatenate back to `text`.
fn split_chunks(text: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut in_whitespace = false;

    for c in text.chars() {
        if in_whitespace && !c.is_whitespace() {
            chunks.push(std::mem::take(&mut current));
        }
        in_whitespace = c.is_whitespace();
        current.push(c);
    }
    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

#[async_trait]
impl LLM for FakeListLLM {
    async fn generate(&self, prompts: Vec<String>) -> Result<LLMResult, LLMError> {
        let n = self.options.n.unwrap_or(1);
        let mut generations = Vec::with_capacity(prompts.len());
        for prompt in &prompts {
            log::trace!("FakeListLLM prompt:\n{prompt}");
            let mut per_prompt = Vec::with_capacity(n as usize);
            for _ in 0..n {
                let response = self.next_response()?;
                per_prompt.push(Generation::new(response).with_generation_info(HashMap::from(
                    [("finish_reason".to_string(), json!("stop"))],
                )));
            }
            generations.push(per_prompt);
        }

        Ok(LLMResult::new(generations).with_llm_output(Self::llm_output()))
    }

    async fn stream(&self, prompts: Vec<String>) -> Result<LLMStreamingResult, LLMError> {
        let mut generations = Vec::with_capacity(prompts.len());
        for _ in &prompts {
            let chunks = split_chunks(&self.next_response()?);
            let info = GenerationInfoCell::new();
            let producer = info.clone();

            let text = async_stream::stream! {
                for chunk in chunks {
                    tokio::task::yield_now().await;
                    yield Ok::<_, LLMError>(chunk);
                }
                producer.insert("finish_reason", json!("stop"));
            };

            generations.push(StreamingGeneration::new(text).with_info_cell(info));
        }

        Ok(LLMStreamingResult::new(generations).with_llm_output(Self::llm_output()))
    }

    fn add_call_options(&mut self, call_options: CallOptions) {
        self.options.merge_options(call_options);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_chunks_concatenates_back() {
        let text = "The quick  brown\nfox ";

        let chunks = split_chunks(text);

        assert_eq!(chunks, vec!["The ", "quick  ", "brown\n", "fox "]);
        assert_eq!(chunks.concat(), text);
        assert!(split_chunks("").is_empty());
    }

    #[tokio::test]
    async fn test_generate_cycles_responses() {
        let llm = FakeListLLM::new(["one", "two"]);

        let result = llm
            .generate(vec!["a".into(), "b".into(), "c".into()])
            .await
            .unwrap();

        let texts: Vec<&str> = result.generations().iter().map(|g| g[0].text()).collect();
        assert_eq!(texts, vec!["one", "two", "one"]);
        assert_eq!(
            result.llm_output().unwrap().get("model_name"),
            Some(&json!("fake-list"))
        );
    }

    #[tokio::test]
    async fn test_generate_respects_n() {
        let mut llm = FakeListLLM::new(["x", "y", "z"]);
        llm.add_call_options(CallOptions::new().with_n(2));

        let result = llm.generate(vec!["p1".into(), "p2".into()]).await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result.generations()[0].len(), 2);
        assert_eq!(result.generations()[1][0].text(), "z");
        assert_eq!(result.generations()[1][1].text(), "x");
    }

    #[tokio::test]
    async fn test_invoke_returns_first_text() {
        let llm = FakeListLLM::new(["hello"]);

        assert_eq!(llm.invoke("hi").await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_empty_responses_is_an_error() {
        let llm = FakeListLLM::new(Vec::<String>::new());

        assert!(llm.invoke("hi").await.is_err());
    }

    #[tokio::test]
    async fn test_stream_fills_info_after_drain() {
        let llm = FakeListLLM::new(["first answer", "second"]);

        let result = llm.stream(vec!["a".into(), "b".into()]).await.unwrap();
        assert_eq!(result.len(), 2);

        let mut generations = result.into_iter();
        let mut first = generations.next().unwrap();
        assert!(first.generation_info().is_none());

        assert_eq!(first.next_chunk().await.unwrap().unwrap(), "first ");
        assert_eq!(first.next_chunk().await.unwrap().unwrap(), "answer");
        assert!(first.next_chunk().await.is_none());
        assert_eq!(
            first.generation_info().unwrap().get("finish_reason"),
            Some(&json!("stop"))
        );

        let second = generations.next().unwrap().into_generation().await.unwrap();
        assert_eq!(second.text(), "second");
    }

    #[tokio::test]
    async fn test_stream_collects_into_llm_result() {
        let llm = FakeListLLM::new(["a b c"]);

        let result = llm.stream(vec!["p".into()]).await.unwrap().collect().await.unwrap();

        assert_eq!(result.generations()[0][0].text(), "a b c");
        assert!(result.llm_output().is_some());
    }

    #[tokio::test]
    async fn test_boxed_llm() {
        let llm: Box<dyn LLM> = FakeListLLM::new(["boxed"]).into();

        assert_eq!(llm.invoke("hi").await.unwrap(), "boxed");
    }
}
