use std::{
    fmt,
    pin::Pin,
    task::{Context, Poll},
};

use futures::{
    stream::{Fuse, FusedStream},
    Stream, StreamExt,
};

use crate::{
    llm::LLMError,
    schemas::{Generation, GenerationInfo},
};

use super::GenerationInfoCell;

pub type TextStream = Pin<Box<dyn Stream<Item = Result<String, LLMError>> + Send>>;

/// A generation whose text arrives chunk by chunk.
///
/// The text can be drained exactly once: the underlying stream is fused, so after it
/// reports the end every later poll yields `None`. Nothing is buffered; callers that
/// need the whole text use [`StreamingGeneration::collect_text`] or accumulate
/// chunks themselves.
///
/// A transport failure shows up as an `Err` chunk, after which the stream ends.
///
/// Generation metadata may only be known once the last chunk has been produced, so
/// read [`StreamingGeneration::generation_info`] after draining.
pub struct StreamingGeneration {
    text: Fuse<TextStream>,
    generation_info: GenerationInfoCell,
}

impl StreamingGeneration {
    pub fn new<S>(text: S) -> Self
    where
        S: Stream<Item = Result<String, LLMError>> + Send + 'static,
    {
        let text: TextStream = Box::pin(text);
        Self {
            text: text.fuse(),
            generation_info: GenerationInfoCell::new(),
        }
    }

    /// Attaches metadata that is already known when the stream starts.
    pub fn with_generation_info(self, generation_info: GenerationInfo) -> Self {
        self.generation_info.set(generation_info);
        self
    }

    /// Replaces the metadata slot with one the producer already holds a handle to.
    pub fn with_info_cell(mut self, cell: GenerationInfoCell) -> Self {
        self.generation_info = cell;
        self
    }

    /// Handle a producer can write metadata into while the text is being drained.
    pub fn info_cell(&self) -> GenerationInfoCell {
        self.generation_info.clone()
    }

    pub fn generation_info(&self) -> Option<GenerationInfo> {
        self.generation_info.get()
    }

    /// Waits for the next text chunk, `None` once the stream has ended.
    pub async fn next_chunk(&mut self) -> Option<Result<String, LLMError>> {
        self.text.next().await
    }

    /// Drains the remaining chunks and concatenates them.
    pub async fn collect_text(&mut self) -> Result<String, LLMError> {
        let mut text = String::new();
        while let Some(chunk) = self.text.next().await {
            text.push_str(&chunk?);
        }
        Ok(text)
    }

    /// Drains the stream into a finished [`Generation`], carrying over whatever
    /// metadata the producer recorded.
    pub async fn into_generation(mut self) -> Result<Generation, LLMError> {
        let text = self.collect_text().await?;
        let generation = Generation::new(text);

        Ok(match self.generation_info() {
            Some(info) => generation.with_generation_info(info),
            None => generation,
        })
    }
}

impl Stream for StreamingGeneration {
    type Item = Result<String, LLMError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.text.poll_next_unpin(cx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.text.size_hint()
    }
}

impl FusedStream for StreamingGeneration {
    fn is_terminated(&self) -> bool {
        self.text.is_terminated()
    }
}

impl fmt::Debug for StreamingGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamingGeneration")
            .field("terminated", &self.text.is_terminated())
            .field("generation_info", &self.generation_info())
            .finish()
    }
}
