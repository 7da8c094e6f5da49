//! Delta stream built on top of a raw relay body.
//!
//! ```rust
//! use futures_util::StreamExt;
//! use wrelay::{VecByteStream, delta_stream};
//!
//! # tokio_test_block_on(async {
//! let body = VecByteStream::from_chunks([
//!     "data: {\"choices\":[{\"delta\":{\"content\":\"hi\"}}]}\n",
//!     "data: [DONE]\n",
//! ]);
//! let deltas = delta_stream(Box::pin(body)).collect::<Vec<_>>().await;
//! assert_eq!(deltas, vec![Ok("hi".to_string())]);
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(future: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(future)
//! # }
//! ```

use std::pin::Pin;

use async_stream::try_stream;
use futures_core::Stream;
use futures_util::StreamExt;

use crate::{RelayByteStream, RelayError, SseLineDecoder, Utf8StreamDecoder};

pub type RelayDeltaStream<'a> = Pin<Box<dyn Stream<Item = Result<String, RelayError>> + Send + 'a>>;

/// Decodes body chunks into deltas. Each delta is yielded as soon as its line is complete,
/// so consumers observe it before the next chunk is read.
pub fn delta_stream<'a>(mut body: RelayByteStream<'a>) -> RelayDeltaStream<'a> {
    let stream = try_stream! {
        let mut text = Utf8StreamDecoder::new();
        let mut lines = SseLineDecoder::new();

        while let Some(chunk) = body.next().await {
            let chunk = chunk?;
            for delta in lines.push(&text.decode(&chunk)) {
                yield delta;
            }

            if lines.is_done() {
                break;
            }
        }

        // A sequence cut off by the end of the body is dropped so it cannot corrupt an
        // unterminated last line.
        text.finish();

        for delta in lines.finish() {
            yield delta;
        }
    };

    Box::pin(stream) as RelayDeltaStream<'a>
}
