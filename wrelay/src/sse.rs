//! Line-buffered event-stream decoding of chat completion deltas.
//!
//! ```rust
//! use wrelay::SseLineDecoder;
//!
//! let mut decoder = SseLineDecoder::new();
//! let mut deltas = decoder.push("data: {\"choices\":[{\"delta\":{\"content\":\"Hel");
//! assert!(deltas.is_empty());
//!
//! deltas.extend(decoder.push("lo\"}}]}\n\ndata: [DONE]\n"));
//! assert_eq!(deltas, vec!["Hello".to_string()]);
//! assert!(decoder.is_done());
//! ```

use serde_json::Value;

pub const DATA_PREFIX: &str = "data: ";
pub const DONE_SENTINEL: &str = "[DONE]";

const DELTA_CONTENT_POINTER: &str = "/choices/0/delta/content";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line<'a> {
    Skip,
    Done,
    Payload(&'a str),
}

fn classify(line: &str) -> Line<'_> {
    if line.starts_with(':') || line.trim().is_empty() {
        return Line::Skip;
    }

    let Some(rest) = line.strip_prefix(DATA_PREFIX) else {
        return Line::Skip;
    };

    let payload = rest.trim();
    if payload == DONE_SENTINEL {
        Line::Done
    } else {
        Line::Payload(payload)
    }
}

/// Parses one `data:` payload. `Ok(None)` means valid JSON without a non-empty string at
/// `choices[0].delta.content`.
pub fn parse_delta(payload: &str) -> Result<Option<String>, serde_json::Error> {
    let value = serde_json::from_str::<Value>(payload)?;

    Ok(value
        .pointer(DELTA_CONTENT_POINTER)
        .and_then(Value::as_str)
        .filter(|content| !content.is_empty())
        .map(str::to_string))
}

/// Accumulates decoded text and yields deltas as complete `data:` lines appear.
///
/// A line whose JSON fails to parse is assumed to be truncated: it is pushed back to the
/// front of the buffer and scanning stops until more text arrives. A complete but malformed
/// line therefore blocks every later line until [`SseLineDecoder::finish`], which drops it.
#[derive(Debug, Default)]
pub struct SseLineDecoder {
    buffer: String,
    done: bool,
}

impl SseLineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once a `data: [DONE]` line was seen. Later input is ignored.
    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn buffered(&self) -> &str {
        &self.buffer
    }

    pub fn push(&mut self, text: &str) -> Vec<String> {
        let mut deltas = Vec::new();
        if self.done {
            return deltas;
        }

        self.buffer.push_str(text);

        while let Some(newline) = self.buffer.find('\n') {
            let mut line = self.buffer.drain(..=newline).collect::<String>();
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }

            let payload = match classify(&line) {
                Line::Skip => continue,
                Line::Done => {
                    self.done = true;
                    self.buffer.clear();
                    break;
                }
                Line::Payload(payload) => payload,
            };

            match parse_delta(payload) {
                Ok(Some(delta)) => deltas.push(delta),
                Ok(None) => {}
                Err(_) => {
                    line.push('\n');
                    self.buffer.insert_str(0, &line);
                    break;
                }
            }
        }

        deltas
    }

    /// Drains whatever is left once no more input will arrive. Unparseable lines and
    /// sentinels are dropped silently.
    pub fn finish(&mut self) -> Vec<String> {
        let remaining = std::mem::take(&mut self.buffer);
        if remaining.trim().is_empty() {
            return Vec::new();
        }

        remaining
            .split('\n')
            .filter_map(|raw| {
                let raw = raw.strip_suffix('\r').unwrap_or(raw);
                match classify(raw) {
                    Line::Payload(payload) => parse_delta(payload).ok().flatten(),
                    Line::Skip | Line::Done => None,
                }
            })
            .collect()
    }
}
