use crate::{errors::FolioError, event_stream::AgentEventStream, types::AgentEvent};
use futures::{Stream, StreamExt};

/// Accumulates raw bytes and splits out complete lines, holding back the
/// trailing fragment until the line break that completes it arrives.
///
/// Bytes are only decoded once a full line is available, so a multi-byte
/// UTF-8 sequence split across chunk boundaries is reassembled correctly.
#[derive(Debug, Default)]
pub struct LineBuffer {
    buffer: Vec<u8>,
}

impl LineBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and return every line it completed, in order.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);
        let mut lines = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&byte| byte == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            lines.push(String::from_utf8_lossy(&line[..line.len() - 1]).into_owned());
        }
        lines
    }

    /// The held-back fragment, if any. Called once the source is exhausted
    /// without a final line break.
    #[must_use]
    pub fn finish(self) -> Option<String> {
        if self.buffer.is_empty() {
            None
        } else {
            Some(String::from_utf8_lossy(&self.buffer).into_owned())
        }
    }
}

/// Parse one stream line into an event. Blank lines yield nothing; a line
/// that fails to parse is reported and skipped so that the corruption of one
/// line never loses subsequent valid events.
fn parse_line(line: &str) -> Option<AgentEvent> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match serde_json::from_str(line) {
        Ok(event) => Some(event),
        Err(error) => {
            tracing::warn!(%error, line, "skipping malformed stream line");
            None
        }
    }
}

/// Decode a response body into a sequence of [`AgentEvent`]s, one per
/// newline-delimited JSON line.
///
/// The sequence ends when the byte source does, or immediately after a
/// `done` status event (which is still yielded once). No buffered state
/// survives the stream.
pub fn decode_events<S, B>(byte_stream: S) -> AgentEventStream
where
    S: Stream<Item = Result<B, reqwest::Error>> + Send + 'static,
    B: AsRef<[u8]> + Send,
{
    let stream = async_stream::try_stream! {
        let mut byte_stream = Box::pin(byte_stream);
        let mut buffer = LineBuffer::new();
        let mut finished = false;
        while let Some(chunk) = byte_stream.next().await {
            let chunk = chunk.map_err(FolioError::Transport)?;
            for line in buffer.push(chunk.as_ref()) {
                if let Some(event) = parse_line(&line) {
                    let done = event.is_done();
                    yield event;
                    if done {
                        finished = true;
                        break;
                    }
                }
            }
            if finished {
                break;
            }
        }
        if !finished {
            // A final line may arrive without a trailing line break.
            if let Some(event) = buffer.finish().as_deref().and_then(parse_line) {
                yield event;
            }
        }
    };
    AgentEventStream::from_stream(stream)
}
