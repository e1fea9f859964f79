use std::{
    pin::Pin,
    task::{Context, Poll},
};

use crate::{errors::FolioResult, types::AgentEvent};
use futures::Stream;

/// Decoded events from a single generation request. Finite and not
/// restartable; one stream serves exactly one request.
pub struct AgentEventStream(Pin<Box<dyn Stream<Item = FolioResult<AgentEvent>> + Send>>);

impl std::fmt::Debug for AgentEventStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentEventStream").finish_non_exhaustive()
    }
}

impl AgentEventStream {
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: Stream<Item = FolioResult<AgentEvent>> + Send + 'static,
    {
        Self(Box::pin(stream))
    }
}

impl Stream for AgentEventStream {
    type Item = FolioResult<AgentEvent>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.0.as_mut().poll_next(cx)
    }
}
