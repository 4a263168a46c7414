use std::mem;

use crate::llm::LLMError;

/// Data payload that marks the end of a data-only SSE stream.
pub const DONE_MARKER: &str = "[DONE]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    Data(String),
    /// The `data: [DONE]` terminator.
    Done,
}

/// Incremental decoder for server-sent events.
///
/// Raw bytes are buffered until a full line is available, so a transport chunk may
/// end anywhere, including inside a multi-byte character. Only `data` fields are
/// kept; `event`, `id` and `retry` are ignored, as are `:` comment lines.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    data: Vec<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds a chunk of bytes and returns every event it completed.
    pub fn push(&mut self, bytes: &[u8]) -> Result<Vec<SseEvent>, LLMError> {
        self.buffer.extend_from_slice(bytes);

        let mut events = Vec::new();
        while let Some(newline) = self.buffer.iter().position(|b| *b == b'\n') {
            let mut line: Vec<u8> = self.buffer.drain(..=newline).collect();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }

            let line = String::from_utf8(line).map_err(|_| LLMError::InvalidStreamEncoding)?;
            if let Some(event) = self.process_line(&line) {
                events.push(event);
            }
        }

        Ok(events)
    }

    /// Flushes an event left pending when the transport closed without a blank line.
    pub fn finish(&mut self) -> Result<Option<SseEvent>, LLMError> {
        let rest = mem::take(&mut self.buffer);
        if !rest.is_empty() {
            let line = String::from_utf8(rest).map_err(|_| LLMError::InvalidStreamEncoding)?;
            let line = line.strip_suffix('\r').unwrap_or(&line);
            if let Some(event) = self.process_line(line) {
                return Ok(Some(event));
            }
        }

        Ok(self.dispatch())
    }

    fn process_line(&mut self, line: &str) -> Option<SseEvent> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        if field == "data" {
            self.data.push(value.to_string());
        }

        None
    }

    fn dispatch(&mut self) -> Option<SseEvent> {
        if self.data.is_empty() {
            return None;
        }

        let data = mem::take(&mut self.data).join("\n");
        if data == DONE_MARKER {
            Some(SseEvent::Done)
        } else {
            Some(SseEvent::Data(data))
        }
    }
}
