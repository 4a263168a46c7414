use serde::Serialize;

use crate::llm::options::CallOptions;

/// Request payload sent to an OpenAI-compatible `/completions` endpoint.
#[derive(Serialize, Debug)]
pub struct OpenAIRequest {
    pub model: String,
    pub prompt: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
}

impl OpenAIRequest {
    /// Creates a new [`OpenAIRequest`].
    pub fn new(model: impl Into<String>, prompt: Vec<String>) -> Self {
        OpenAIRequest {
            model: model.into(),
            prompt,
            stream: None,
            max_tokens: None,
            temperature: None,
            top_p: None,
            n: None,
            stop: None,
        }
    }

    /// Adds options to the request.
    pub fn with_options(self, options: &CallOptions) -> Self {
        OpenAIRequest {
            max_tokens: options.max_tokens,
            temperature: options.temperature,
            top_p: options.top_p,
            n: options.n,
            stop: options.stop_words.clone(),
            ..self
        }
    }

    pub fn with_stream(self, stream: bool) -> Self {
        OpenAIRequest {
            stream: Some(stream),
            ..self
        }
    }
}
