//! Server-sent event decoding for streamed chat completions
//!
//! The gateway answers with `text/event-stream`. Each event carries one
//! `data:` line holding a JSON completion chunk, and the stream ends with
//! `data: [DONE]`. Network chunks cut lines at arbitrary byte offsets, so
//! the decoder buffers bytes until a full line is available.
//!
//! ```text
//! AwaitingLine --data line, JSON ok--> FrameComplete --blank line--> AwaitingLine
//!      |                                     ^
//!      +--data line, JSON incomplete--> PartialFrame --continuation parses--+
//!
//! any state --data: [DONE] or finish()--> StreamDone
//! ```

use crate::{ChatStream, LlmError};
use futures::stream::{self, Stream, StreamExt};
use serde_json::Value;
use std::collections::VecDeque;
use std::fmt::Display;
use std::pin::Pin;
use tracing::debug;

const DATA_FIELD: &str = "data:";
const DONE_SENTINEL: &str = "[DONE]";

/// Where the decoder is in the event stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecoderState {
    /// Waiting for the next complete line
    #[default]
    AwaitingLine,

    /// Holding a `data:` payload whose JSON did not parse yet
    PartialFrame,

    /// A frame was decoded and its event is not yet terminated
    FrameComplete,

    /// `[DONE]` seen or input finished; further bytes are ignored
    StreamDone,
}

/// Incremental decoder from raw SSE bytes to content fragments
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    partial: Option<String>,
    state: DecoderState,
}

impl SseDecoder {
    /// Create a decoder waiting for its first line
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    pub fn state(&self) -> DecoderState {
        self.state
    }

    /// Whether the stream has ended
    pub fn is_done(&self) -> bool {
        self.state == DecoderState::StreamDone
    }

    /// Feed a chunk of bytes, returning every content fragment it completed
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut fragments = Vec::new();
        if self.is_done() {
            return fragments;
        }

        self.buffer.extend_from_slice(chunk);
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.buffer.drain(..=pos).collect();
            let text = String::from_utf8_lossy(&raw[..pos]);
            self.process_line(trim_cr(&text), &mut fragments);

            if self.is_done() {
                self.buffer.clear();
                break;
            }
        }

        fragments
    }

    /// Flush a trailing unterminated line and end the stream
    ///
    /// A payload still held as a partial frame at this point is discarded.
    pub fn finish(&mut self) -> Vec<String> {
        let mut fragments = Vec::new();

        if !self.is_done() && !self.buffer.is_empty() {
            let raw = std::mem::take(&mut self.buffer);
            let text = String::from_utf8_lossy(&raw);
            self.process_line(trim_cr(&text), &mut fragments);
        }
        if let Some(held) = self.partial.take() {
            debug!(bytes = held.len(), "Discarding unparseable trailing frame");
        }

        self.buffer.clear();
        self.state = DecoderState::StreamDone;
        fragments
    }

    fn process_line(&mut self, line: &str, out: &mut Vec<String>) {
        if self.is_done() {
            return;
        }

        if let Some(held) = self.partial.take() {
            if line.is_empty() || line.starts_with(':') {
                self.partial = Some(held);
                return;
            }
            if !line.starts_with(DATA_FIELD) {
                let joined = format!("{held}{line}");
                match content_of(&joined) {
                    Ok(content) => {
                        out.extend(content);
                        self.state = DecoderState::FrameComplete;
                    }
                    Err(_) => self.partial = Some(joined),
                }
                return;
            }
            debug!(bytes = held.len(), "Dropping partial frame superseded by a new data line");
            self.state = DecoderState::AwaitingLine;
        }

        // A blank line ends the event; other fields (event:, id:, retry:) carry nothing we use
        if line.is_empty() {
            if self.state == DecoderState::FrameComplete {
                self.state = DecoderState::AwaitingLine;
            }
            return;
        }
        if line.starts_with(':') {
            return;
        }
        let Some(data) = line.strip_prefix(DATA_FIELD) else {
            return;
        };
        let data = data.trim_start();

        if data.trim_end() == DONE_SENTINEL {
            self.state = DecoderState::StreamDone;
            return;
        }
        if data.trim_end().is_empty() {
            return;
        }

        match content_of(data) {
            Ok(content) => {
                out.extend(content);
                self.state = DecoderState::FrameComplete;
            }
            Err(_) => {
                self.partial = Some(data.to_string());
                self.state = DecoderState::PartialFrame;
            }
        }
    }
}

fn trim_cr(line: &str) -> &str {
    line.strip_suffix('\r').unwrap_or(line)
}

/// `choices[0].delta.content` of one completion chunk, when non-empty
fn content_of(json: &str) -> Result<Option<String>, serde_json::Error> {
    let value: Value = serde_json::from_str(json)?;
    Ok(value
        .pointer("/choices/0/delta/content")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string))
}

struct Pump<S> {
    bytes: Pin<Box<S>>,
    decoder: SseDecoder,
    ready: VecDeque<String>,
    exhausted: bool,
}

/// Turn a stream of response body chunks into a stream of content fragments
///
/// A transport error ends the stream after yielding `LlmError::Communication`.
pub fn content_stream<S, B, E>(bytes: S) -> ChatStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Display + Send + 'static,
{
    let pump = Pump {
        bytes: Box::pin(bytes),
        decoder: SseDecoder::new(),
        ready: VecDeque::new(),
        exhausted: false,
    };

    Box::pin(stream::unfold(pump, |mut pump| async move {
        loop {
            if let Some(fragment) = pump.ready.pop_front() {
                return Some((Ok(fragment), pump));
            }
            if pump.exhausted || pump.decoder.is_done() {
                return None;
            }

            match pump.bytes.next().await {
                Some(Ok(chunk)) => {
                    let fragments = pump.decoder.feed(chunk.as_ref());
                    pump.ready.extend(fragments);
                }
                Some(Err(e)) => {
                    pump.exhausted = true;
                    return Some((Err(LlmError::Communication(e.to_string())), pump));
                }
                None => {
                    pump.exhausted = true;
                    let fragments = pump.decoder.finish();
                    pump.ready.extend(fragments);
                }
            }
        }
    }))
}
