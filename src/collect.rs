use crate::transcript::{StreamAccumulator, Transcript};
use crate::wire::decoder::FrameDecoder;
use crate::wire::logging::emit_dropped_carry;
use anyhow::Result;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use std::pin::Pin;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio_util::sync::CancellationToken;

pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// Decoder and accumulator for one in-flight response, fed raw bytes.
#[derive(Default)]
pub struct StreamSession {
    decoder: FrameDecoder,
    accumulator: StreamAccumulator,
}

impl StreamSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode whatever complete lines this chunk yields and fold the
    /// resulting events into the transcript.
    pub fn push_bytes(&mut self, chunk: &[u8]) {
        for event in self.decoder.push(chunk) {
            self.accumulator.ingest(&event);
        }
    }

    /// Snapshot the transcript. An unterminated line still sitting in the
    /// decoder is dropped with a log entry; it never becomes content.
    pub fn finalize(&mut self) -> Transcript {
        let leftover = self.decoder.flush();
        if !leftover.is_empty() {
            emit_dropped_carry(&leftover);
        }
        self.accumulator.finalize()
    }
}

/// Drain a byte stream to completion and reconstruct its transcript.
/// Transport errors propagate; callers wanting a partial transcript on
/// error can drive a [`StreamSession`] chunk by chunk instead.
pub async fn collect_transcript(mut stream: ByteStream) -> Result<Transcript> {
    let mut session = StreamSession::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        session.push_bytes(&chunk);
    }
    Ok(session.finalize())
}

/// Like [`collect_transcript`], but stop ingesting when `cancel` fires and
/// return the transcript of everything received up to that point.
pub async fn collect_transcript_with_cancel(
    mut stream: ByteStream,
    cancel: CancellationToken,
) -> Result<Transcript> {
    let mut session = StreamSession::new();
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            chunk = stream.next() => {
                match chunk {
                    Some(chunk) => session.push_bytes(&chunk?),
                    None => break,
                }
            }
        }
    }
    Ok(session.finalize())
}

/// Reconstruct a transcript from a captured dump, a pipe, or any other
/// async byte source.
pub async fn collect_from_reader<R>(mut reader: R) -> Result<Transcript>
where
    R: AsyncRead + Unpin,
{
    let mut session = StreamSession::new();
    let mut buf = [0u8; 8192];
    loop {
        let read = reader.read(&mut buf).await?;
        if read == 0 {
            break;
        }
        session.push_bytes(&buf[..read]);
    }
    Ok(session.finalize())
}
