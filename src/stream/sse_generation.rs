use futures::{Stream, StreamExt};

use crate::{
    llm::LLMError,
    schemas::{GenerationInfoCell, StreamingGeneration},
};

use super::{SseDecoder, SseEvent};

/// Turns a data-only SSE byte stream into a [`StreamingGeneration`].
///
/// `on_data` receives every event payload together with the generation's metadata
/// cell and returns the text chunk it carries, if any. Empty chunks are dropped.
///
/// The stream ends at `data: [DONE]`. A byte stream that closes before the marker
/// yields [`LLMError::StreamTruncated`]; transport and `on_data` failures are
/// yielded once and end the stream as well.
pub fn sse_generation<S, B, E, F>(bytes: S, mut on_data: F) -> StreamingGeneration
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Into<LLMError> + Send + 'static,
    F: FnMut(&str, &GenerationInfoCell) -> Result<Option<String>, LLMError> + Send + 'static,
{
    let info = GenerationInfoCell::new();
    let producer = info.clone();

    let text = async_stream::stream! {
        let mut decoder = SseDecoder::new();
        let mut done = false;
        futures::pin_mut!(bytes);

        'transport: while let Some(chunk) = bytes.next().await {
            let events = match chunk {
                Ok(chunk) => decoder.push(chunk.as_ref()),
                Err(e) => Err(e.into()),
            };
            let events = match events {
                Ok(events) => events,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };

            for event in events {
                match event {
                    SseEvent::Done => {
                        done = true;
                        break 'transport;
                    }
                    SseEvent::Data(data) => match on_data(&data, &producer) {
                        Ok(Some(text)) if !text.is_empty() => {
                            yield Ok(text);
                        }
                        Ok(_) => {}
                        Err(e) => {
                            yield Err(e);
                            return;
                        }
                    },
                }
            }
        }

        if !done {
            match decoder.finish() {
                Ok(Some(SseEvent::Done)) => done = true,
                Ok(Some(SseEvent::Data(data))) => {
                    log::warn!("Discarding unterminated SSE event: {data}");
                }
                Ok(None) => {}
                Err(e) => {
                    yield Err(e);
                    return;
                }
            }
        }

        if !done {
            log::warn!("SSE stream closed before {}", super::DONE_MARKER);
            yield Err(LLMError::StreamTruncated);
        }
    };

    StreamingGeneration::new(text).with_info_cell(info)
}
