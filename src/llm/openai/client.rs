use std::collections::HashMap;

pub use async_openai::config::{Config, OpenAIConfig};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::{
    llm::{options::CallOptions, LLMError, LLM},
    schemas::{LLMResult, LLMStreamingResult},
    stream::sse_generation,
};

use super::{
    request::OpenAIRequest,
    response::{api_error, group_choices, parse_stream_data, CompletionResponse},
    OpenAIModel,
};

/// Client for OpenAI-compatible text completion endpoints.
#[derive(Clone)]
pub struct OpenAI<C: Config> {
    config: C,
    options: CallOptions,
    model: String,
    http_client: reqwest::Client,
}

impl<C: Config> OpenAI<C> {
    pub fn new(config: C) -> Self {
        Self {
            config,
            options: CallOptions::default(),
            model: OpenAIModel::Gpt35Instruct.to_string(),
            http_client: reqwest::Client::new(),
        }
    }

    pub fn with_model<S: Into<String>>(mut self, model: S) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_config(mut self, config: C) -> Self {
        self.config = config;
        self
    }

    pub fn with_options(mut self, options: CallOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_http_client(mut self, http_client: reqwest::Client) -> Self {
        self.http_client = http_client;
        self
    }

    async fn send(&self, request: &OpenAIRequest) -> Result<reqwest::Response, LLMError> {
        let response = self
            .http_client
            .post(self.config.url("/completions"))
            .query(&self.config.query())
            .headers(self.config.headers())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            log::warn!("Completion request failed with {status}");
            return Err(api_error(status, &body));
        }

        Ok(response)
    }
}

impl Default for OpenAI<OpenAIConfig> {
    fn default() -> Self {
        Self::new(OpenAIConfig::default())
    }
}

#[async_trait]
impl<C: Config + Clone + Send + Sync + 'static> LLM for OpenAI<C> {
    async fn generate(&self, prompts: Vec<String>) -> Result<LLMResult, LLMError> {
        let prompt_count = prompts.len();
        if prompt_count == 0 {
            return Ok(LLMResult::default());
        }

        let n = self.options.n.unwrap_or(1) as usize;
        let request = OpenAIRequest::new(&self.model, prompts).with_options(&self.options);
        log::debug!(
            "Requesting {n} completion(s) for {prompt_count} prompt(s) from {}",
            self.model
        );

        let body = self.send(&request).await?.text().await?;
        let response: CompletionResponse = serde_json::from_str(&body)?;

        let llm_output = HashMap::from([
            (
                "token_usage".to_string(),
                response.usage.unwrap_or_else(|| json!({})),
            ),
            (
                "model_name".to_string(),
                Value::String(response.model.unwrap_or_else(|| self.model.clone())),
            ),
        ]);

        Ok(
            LLMResult::new(group_choices(response.choices, prompt_count, n))
                .with_llm_output(llm_output),
        )
    }

    async fn stream(&self, prompts: Vec<String>) -> Result<LLMStreamingResult, LLMError> {
        let mut generations = Vec::with_capacity(prompts.len());

        for prompt in prompts {
            let mut request = OpenAIRequest::new(&self.model, vec![prompt])
                .with_options(&self.options)
                .with_stream(true);
            // Interleaved choices cannot be told apart on a single text stream.
            request.n = None;

            log::debug!("Opening completion stream from {}", self.model);
            let response = self.send(&request).await?;
            generations.push(sse_generation(response.bytes_stream(), parse_stream_data));
        }

        let llm_output = HashMap::from([("model_name".to_string(), json!(self.model))]);
        Ok(LLMStreamingResult::new(generations).with_llm_output(llm_output))
    }

    fn add_call_options(&mut self, call_options: CallOptions) {
        self.options.merge_options(call_options)
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use mockito::Matcher;

    use super::*;

    fn client(server: &mockito::ServerGuard) -> OpenAI<OpenAIConfig> {
        let config = OpenAIConfig::new()
            .with_api_base(server.url())
            .with_api_key("test-key");
        OpenAI::new(config)
    }

    #[tokio::test]
    async fn test_generate_groups_choices_per_prompt() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/completions")
            .match_header("authorization", "Bearer test-key")
            .match_body(Matcher::PartialJson(json!({
                "model": "gpt-3.5-turbo-instruct",
                "prompt": ["Say hello", "Pick a letter"],
                "n": 2
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "id": "cmpl-1",
                    "object": "text_completion",
                    "model": "gpt-3.5-turbo-instruct",
                    "choices": [
                        { "text": "hello", "index": 0, "finish_reason": "stop", "logprobs": null },
                        { "text": "hi", "index": 1, "finish_reason": "length", "logprobs": null },
                        { "text": "a", "index": 2, "finish_reason": "stop", "logprobs": null },
                        { "text": "b", "index": 3, "finish_reason": "stop", "logprobs": null }
                    ],
                    "usage": { "prompt_tokens": 8, "completion_tokens": 4, "total_tokens": 12 }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let llm = client(&server).with_options(CallOptions::new().with_n(2));
        let result = llm
            .generate(vec!["Say hello".into(), "Pick a letter".into()])
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result.len(), 2);
        assert_eq!(result.generations()[0][0].text(), "hello");
        assert_eq!(result.generations()[0][1].text(), "hi");
        assert_eq!(result.generations()[1][1].text(), "b");
        assert_eq!(
            result.generations()[0][1]
                .generation_info()
                .unwrap()
                .get("finish_reason"),
            Some(&json!("length"))
        );

        let llm_output = result.llm_output().unwrap();
        assert_eq!(llm_output["token_usage"]["total_tokens"], json!(12));
        assert_eq!(llm_output["model_name"], json!("gpt-3.5-turbo-instruct"));
    }

    #[tokio::test]
    async fn test_generate_without_prompts_skips_request() {
        let server = mockito::Server::new_async().await;

        let result = client(&server).generate(Vec::new()).await.unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_generate_maps_api_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/completions")
            .with_status(429)
            .with_body(r#"{"error":{"message":"Rate limit reached","type":"requests"}}"#)
            .create_async()
            .await;

        let err = client(&server).invoke("hello").await.unwrap_err();

        mock.assert_async().await;
        match err {
            LLMError::ApiError { status, message } => {
                assert_eq!(status.as_u16(), 429);
                assert_eq!(message, "Rate limit reached");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_stream_records_finish_reason_after_drain() {
        let mut server = mockito::Server::new_async().await;
        let body = indoc! {r#"
            data: {"choices":[{"text":"Hello","index":0,"finish_reason":null,"logprobs":null}]}

            data: {"choices":[{"text":" there","index":0,"finish_reason":null,"logprobs":null}]}

            data: {"choices":[{"text":"","index":0,"finish_reason":"stop","logprobs":null}]}

            data: [DONE]

        "#};
        let mock = server
            .mock("POST", "/completions")
            .match_body(Matcher::PartialJson(json!({ "stream": true, "prompt": ["Greet me"] })))
            .with_status(200)
            .with_header("content-type", "text/event-stream")
            .with_body(body)
            .create_async()
            .await;

        let result = client(&server).stream(vec!["Greet me".into()]).await.unwrap();
        assert_eq!(result.len(), 1);

        let mut generations = result.into_iter();
        let mut generation = generations.next().unwrap();

        let mut chunks = Vec::new();
        while let Some(chunk) = generation.next_chunk().await {
            chunks.push(chunk.unwrap());
        }

        mock.assert_async().await;
        assert_eq!(chunks, vec!["Hello", " there"]);
        assert_eq!(
            generation.generation_info().unwrap().get("finish_reason"),
            Some(&json!("stop"))
        );
        assert!(generation.next_chunk().await.is_none());
    }

    #[tokio::test]
    async fn test_stream_without_done_marker_is_truncated() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/completions")
            .with_status(200)
            .with_header("content-type", "text/event-stream")
            .with_body("data: {\"choices\":[{\"text\":\"cut\",\"index\":0}]}\n\n")
            .create_async()
            .await;

        let result = client(&server).stream(vec!["p".into()]).await.unwrap();

        let err = result.collect().await.unwrap_err();
        assert!(matches!(err, LLMError::StreamTruncated));
    }

    #[tokio::test]
    async fn test_stream_one_request_per_prompt_in_order() {
        let mut server = mockito::Server::new_async().await;
        let first = server
            .mock("POST", "/completions")
            .match_body(Matcher::PartialJson(json!({ "prompt": ["first"] })))
            .with_status(200)
            .with_body("data: {\"choices\":[{\"text\":\"1\",\"index\":0}]}\n\ndata: [DONE]\n\n")
            .create_async()
            .await;
        let second = server
            .mock("POST", "/completions")
            .match_body(Matcher::PartialJson(json!({ "prompt": ["second"] })))
            .with_status(200)
            .with_body("data: {\"choices\":[{\"text\":\"2\",\"index\":0}]}\n\ndata: [DONE]\n\n")
            .create_async()
            .await;

        let result = client(&server)
            .stream(vec!["first".into(), "second".into()])
            .await
            .unwrap()
            .collect()
            .await
            .unwrap();

        first.assert_async().await;
        second.assert_async().await;
        assert_eq!(result.generations()[0][0].text(), "1");
        assert_eq!(result.generations()[1][0].text(), "2");
    }
}
