use super::logging::{emit_frame_parse_error, emit_frame_trace};
use serde_json::Value;

const DATA_PREFIX: &str = "data: ";
const DONE_MARKER: &str = "[DONE]";

/// Decode one chunk of the event stream. Complete lines produce events in
/// order; the unterminated tail comes back as the next call's carry-over.
/// Lines without the `data: ` prefix, empty payloads, the `[DONE]` marker,
/// and malformed JSON payloads are dropped (the last with a log entry).
pub fn decode_chunk(carry_over: &str, chunk: &str) -> (Vec<Value>, String) {
    let mut pending = String::with_capacity(carry_over.len() + chunk.len());
    pending.push_str(carry_over);
    pending.push_str(chunk);

    let mut events = Vec::new();
    let mut start = 0;

    while let Some(end) = pending[start..].find('\n') {
        let line = &pending[start..start + end];
        if let Some(event) = parse_data_line(line) {
            events.push(event);
        }
        start = start + end + 1;
    }

    let carry = pending.split_off(start);
    (events, carry)
}

fn parse_data_line(line: &str) -> Option<Value> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let payload = line.strip_prefix(DATA_PREFIX)?.trim();
    if payload.is_empty() || payload == DONE_MARKER {
        return None;
    }

    emit_frame_trace(payload);
    match serde_json::from_str(payload) {
        Ok(event) => Some(event),
        Err(e) => {
            emit_frame_parse_error(payload, &e);
            None
        }
    }
}

/// Stateful variant of [`decode_chunk`] for callers feeding raw bytes.
/// Buffering happens before UTF-8 conversion, so a multi-byte character
/// split across chunks is whole again by the time its line completes.
#[derive(Default)]
pub struct FrameDecoder {
    buffer: Vec<u8>,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: &[u8]) -> Vec<Value> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        let mut start = 0;

        while let Some(offset) = self.buffer[start..].iter().position(|&b| b == b'\n') {
            let line_end = start + offset;
            let line = String::from_utf8_lossy(&self.buffer[start..line_end]);
            if let Some(event) = parse_data_line(&line) {
                events.push(event);
            }
            start = line_end + 1;
        }

        if start > 0 {
            self.buffer.drain(..start);
        }

        events
    }

    pub fn flush(&mut self) -> String {
        let leftover = std::mem::take(&mut self.buffer);
        String::from_utf8_lossy(&leftover).into_owned()
    }
}
