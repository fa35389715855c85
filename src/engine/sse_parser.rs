//! Server-Sent Events (SSE) parser for OpenAI-compatible streaming completions.
//!
//! This module provides utilities for parsing SSE streams from the
//! `/v1/completions` endpoint.

use bytes::{Bytes, BytesMut};
use futures_util::Stream;
use serde::Deserialize;

use super::EngineError;

/// Response structure for streaming text completions.
#[derive(Debug, Deserialize)]
struct StreamResponse {
    #[serde(default)]
    choices: Vec<StreamChoice>,
    #[serde(default)]
    error: Option<StreamErrorBody>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    index: u32,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamErrorBody {
    message: String,
}

/// A single meaningful SSE line.
#[derive(Debug, PartialEq, Eq)]
enum SseEvent {
    Text(String),
    Error(String),
    Done,
}

/// Converts a raw SSE byte stream into a stream of text chunks.
///
/// Only the first candidate sequence (`index == 0`) contributes text. An
/// error event from the server, or a line that is not UTF-8, ends the stream
/// with [`EngineError::Stream`].
pub fn sse_to_text_stream(
    byte_stream: impl Stream<Item = reqwest::Result<Bytes>> + Send + 'static,
) -> impl Stream<Item = Result<String, EngineError>> + Send {
    async_stream::stream! {
        use futures_util::StreamExt;

        let mut byte_stream = std::pin::pin!(byte_stream);
        let mut buffer = BytesMut::new();

        while let Some(chunk_result) = byte_stream.next().await {
            let chunk = match chunk_result {
                Ok(c) => c,
                Err(e) => {
                    yield Err(EngineError::Stream(e.to_string()));
                    return;
                }
            };

            // Chunks may end inside a multi-byte character; decode whole lines only.
            buffer.extend_from_slice(&chunk);

            while let Some(line_end) = buffer.iter().position(|&b| b == b'\n') {
                let raw = buffer.split_to(line_end + 1);
                let Ok(line) = std::str::from_utf8(&raw) else {
                    yield Err(EngineError::Stream("event stream is not valid UTF-8".to_string()));
                    return;
                };

                match parse_sse_line(line.trim()) {
                    Some(SseEvent::Text(text)) => {
                        yield Ok(text);
                    }
                    Some(SseEvent::Error(message)) => {
                        yield Err(EngineError::Stream(message));
                        return;
                    }
                    Some(SseEvent::Done) => return,
                    None => {}
                }
            }
        }
    }
}

/// Parses a single trimmed SSE line.
///
/// Returns `None` for comments, blank lines, empty text and unparseable data.
fn parse_sse_line(line: &str) -> Option<SseEvent> {
    let json_str = line.strip_prefix("data:")?.trim_start();

    if json_str == "[DONE]" {
        return Some(SseEvent::Done);
    }

    let response = serde_json::from_str::<StreamResponse>(json_str).ok()?;

    if let Some(error) = response.error {
        return Some(SseEvent::Error(error.message));
    }

    let text: String = response
        .choices
        .into_iter()
        .filter(|c| c.index == 0)
        .filter_map(|c| c.text)
        .collect();

    if text.is_empty() {
        None
    } else {
        Some(SseEvent::Text(text))
    }
}
