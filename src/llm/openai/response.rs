use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    llm::LLMError,
    schemas::{Generation, GenerationInfo, GenerationInfoCell},
};

/// Body of a `/completions` response. Streaming chunks share the same shape.
#[derive(Deserialize, Debug)]
pub struct CompletionResponse {
    #[serde(default)]
    pub model: Option<String>,
    pub choices: Vec<CompletionChoice>,
    #[serde(default)]
    pub usage: Option<Value>,
}

#[derive(Deserialize, Debug)]
pub struct CompletionChoice {
    pub text: String,
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub finish_reason: Option<String>,
    #[serde(default)]
    pub logprobs: Option<Value>,
}

impl CompletionChoice {
    fn into_generation(self) -> Generation {
        let info = GenerationInfo::from([
            ("finish_reason".to_string(), json!(self.finish_reason)),
            ("logprobs".to_string(), self.logprobs.unwrap_or(Value::Null)),
        ]);
        Generation::new(self.text).with_generation_info(info)
    }
}

/// Splits the flat choice list into `n` generations per prompt.
///
/// The provider numbers choices across the whole batch, so choice `i` belongs to
/// prompt `i / n`. Prompts the provider returned nothing for get an empty list.
pub fn group_choices(
    mut choices: Vec<CompletionChoice>,
    prompt_count: usize,
    n: usize,
) -> Vec<Vec<Generation>> {
    choices.sort_by_key(|choice| choice.index);

    let mut generations: Vec<Vec<Generation>> = (0..prompt_count).map(|_| Vec::new()).collect();
    for (position, choice) in choices.into_iter().enumerate() {
        let prompt = position / n.max(1);
        match generations.get_mut(prompt) {
            Some(slot) => slot.push(choice.into_generation()),
            None => log::warn!("Dropping choice {} beyond prompt count", choice.index),
        }
    }

    generations
}

/// Extracts the text of one streamed completion chunk, recording finish metadata.
pub fn parse_stream_data(
    data: &str,
    info: &GenerationInfoCell,
) -> Result<Option<String>, LLMError> {
    let chunk: CompletionResponse = serde_json::from_str(data)?;
    log::trace!("Completion chunk: {data}");

    let Some(choice) = chunk.choices.into_iter().next() else {
        return Ok(None);
    };

    if let Some(finish_reason) = choice.finish_reason {
        info.insert("finish_reason", Value::String(finish_reason));
    }
    if let Some(logprobs) = choice.logprobs.filter(|l| !l.is_null()) {
        info.insert("logprobs", logprobs);
    }

    Ok(Some(choice.text))
}

/// Maps a non-success response to [`LLMError::ApiError`], preferring the
/// provider's `error.message` over the raw body.
pub fn api_error(status: StatusCode, body: &str) -> LLMError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(Value::as_str)
                .map(String::from)
        })
        .unwrap_or_else(|| body.to_string());

    LLMError::ApiError { status, message }
}
