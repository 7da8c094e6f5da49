//! Incremental UTF-8 decoding for chunked response bodies.
//!
//! ```rust
//! use wrelay::Utf8StreamDecoder;
//!
//! let bytes = "héllo".as_bytes();
//! let mut decoder = Utf8StreamDecoder::new();
//!
//! let mut text = decoder.decode(&bytes[..2]);
//! text.push_str(&decoder.decode(&bytes[2..]));
//!
//! assert_eq!(text, "héllo");
//! assert!(!decoder.has_pending());
//! ```

const REPLACEMENT: char = '\u{FFFD}';

/// Holds back an incomplete trailing sequence until the next chunk completes it. Invalid
/// sequences decode to U+FFFD, the same way `String::from_utf8_lossy` treats them.
#[derive(Debug, Default)]
pub struct Utf8StreamDecoder {
    pending: Vec<u8>,
}

impl Utf8StreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn decode(&mut self, chunk: &[u8]) -> String {
        let mut input = std::mem::take(&mut self.pending);
        input.extend_from_slice(chunk);

        let mut output = String::with_capacity(input.len());
        let mut rest = input.as_slice();

        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    output.push_str(valid);
                    break;
                }
                Err(error) => {
                    let (valid, after) = rest.split_at(error.valid_up_to());
                    output.push_str(&String::from_utf8_lossy(valid));

                    match error.error_len() {
                        Some(invalid_len) => {
                            output.push(REPLACEMENT);
                            rest = &after[invalid_len..];
                        }
                        None => {
                            self.pending = after.to_vec();
                            break;
                        }
                    }
                }
            }
        }

        output
    }

    /// Ends the stream and drops a truncated trailing sequence. Returns how many bytes were
    /// dropped.
    pub fn finish(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }
}
