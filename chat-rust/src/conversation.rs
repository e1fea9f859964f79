use crate::{
    backend::GenerateBackend,
    errors::ChatError,
    store::SessionStore,
    transcript::{ChatMessage, MessageKind, Role},
};
use folio_sdk::{AgentEvent, EventContent, SessionInfo};
use futures::StreamExt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Notice appended to the transcript when a turn produced an article.
const ARTICLE_READY_MESSAGE: &str =
    "**Article completed**\n\nYour article is ready in the preview panel.";

/// Notice appended to the transcript when a turn failed.
const TURN_FAILED_MESSAGE: &str =
    "**An error occurred**\n\nPlease try again or rephrase your request.";

/// The agent currently shown as thinking feedback while a turn streams.
/// Always reflects the most recently processed event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentIndicator {
    pub agent_name: String,
    pub text: String,
}

/// Exactly one turn may stream at a time; the transition out of `Idle` is
/// guarded at the single [`Conversation::send`] entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Streaming,
}

/// Result of a [`Conversation::send`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input, or a turn already in flight. Nothing changed.
    Ignored,
    /// The turn ran to completion.
    Completed,
    /// The stream failed; a failure notice was appended instead of agent
    /// output.
    Failed,
}

struct ConversationState {
    phase: Phase,
    /// Bumped by `new_session`. A turn captures the epoch when it claims the
    /// stream slot; once the epochs diverge the turn is superseded and none
    /// of its output may reach the fresh conversation.
    epoch: u64,
    session: Option<SessionInfo>,
    transcript: Vec<ChatMessage>,
    article: Option<String>,
    current_agent: Option<AgentIndicator>,
}

/// Content recorded while a turn streams, from which the final transcript
/// entry is derived once the stream ends.
#[derive(Default)]
struct TurnRecord {
    /// Set by the latest article event of the turn.
    final_article: Option<String>,
    /// Latest text or question from an agent other than the writer. The
    /// writer's text is draft prose and never becomes the fallback message.
    last_non_writer: Option<(String, MessageKind)>,
}

/// Drives one send interaction end-to-end: session lifecycle, the event
/// stream of a turn, the transcript, and the article buffer. All state is
/// mirrored to the injected [`SessionStore`].
pub struct Conversation {
    backend: Arc<dyn GenerateBackend>,
    store: Arc<dyn SessionStore>,
    state: Mutex<ConversationState>,
}

/// Returns the conversation to `Idle` with no current agent on every exit
/// path of a turn, including cancellation of the `send` future.
struct StreamGuard<'a> {
    state: &'a Mutex<ConversationState>,
}

impl Drop for StreamGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.phase = Phase::Idle;
        state.current_agent = None;
    }
}

impl Conversation {
    #[must_use]
    pub fn new(backend: Arc<dyn GenerateBackend>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            backend,
            store,
            state: Mutex::new(ConversationState {
                phase: Phase::Idle,
                epoch: 0,
                session: None,
                transcript: Vec::new(),
                article: None,
                current_agent: None,
            }),
        }
    }

    /// Restore the conversation persisted by a previous run, if any.
    #[must_use]
    pub fn resume(backend: Arc<dyn GenerateBackend>, store: Arc<dyn SessionStore>) -> Self {
        let session = store.load_session();
        let (transcript, article) = match &session {
            Some(session) => (
                store.load_transcript(&session.session_id),
                store.load_article(&session.session_id),
            ),
            None => (Vec::new(), None),
        };
        Self {
            backend,
            store,
            state: Mutex::new(ConversationState {
                phase: Phase::Idle,
                epoch: 0,
                session,
                transcript,
                article,
                current_agent: None,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, ConversationState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn session(&self) -> Option<SessionInfo> {
        self.state().session.clone()
    }

    #[must_use]
    pub fn transcript(&self) -> Vec<ChatMessage> {
        self.state().transcript.clone()
    }

    /// The latest article payload of the conversation, or `None`.
    #[must_use]
    pub fn article(&self) -> Option<String> {
        self.state().article.clone()
    }

    #[must_use]
    pub fn current_agent(&self) -> Option<AgentIndicator> {
        self.state().current_agent.clone()
    }

    #[must_use]
    pub fn is_streaming(&self) -> bool {
        self.state().phase == Phase::Streaming
    }

    /// Create a session if none exists yet. On failure nothing is mutated
    /// and the existing state stays as it was.
    pub async fn ensure_session(&self) -> Result<SessionInfo, ChatError> {
        if let Some(session) = self.state().session.clone() {
            return Ok(session);
        }
        let session = self
            .backend
            .create_session()
            .await
            .map_err(ChatError::Session)?;
        let mut state = self.state();
        if let Some(existing) = state.session.clone() {
            // Another path created a session while ours was in flight; keep
            // the one already in place.
            return Ok(existing);
        }
        state.session = Some(session.clone());
        // A fresh session starts without a carried-over article.
        state.article = None;
        self.store.save_session(&session);
        Ok(session)
    }

    /// Run one send interaction end-to-end.
    ///
    /// Blank input and sends issued while a turn is already streaming are
    /// silent no-ops. A missing session is created first; if that fails the
    /// send aborts with an error and the transcript is untouched. Stream
    /// failures do not error: they append a generic failure notice and
    /// report [`SendOutcome::Failed`].
    pub async fn send(&self, user_text: &str) -> Result<SendOutcome, ChatError> {
        let user_text = user_text.trim();
        if user_text.is_empty() {
            return Ok(SendOutcome::Ignored);
        }

        // Claim the single stream slot before doing anything else.
        let epoch = {
            let mut state = self.state();
            if state.phase == Phase::Streaming {
                return Ok(SendOutcome::Ignored);
            }
            state.phase = Phase::Streaming;
            state.epoch
        };
        let _guard = StreamGuard { state: &self.state };

        let session = self.ensure_session().await?;

        {
            let mut state = self.state();
            if state.epoch != epoch {
                return Ok(SendOutcome::Ignored);
            }
            state
                .transcript
                .push(ChatMessage::now(Role::User, user_text, MessageKind::Normal));
            state.current_agent = None;
            self.store
                .save_transcript(&session.session_id, &state.transcript);
        }

        let mut record = TurnRecord::default();
        let failed = match self.backend.stream_generate(user_text, Some(&session)).await {
            Ok(mut events) => {
                let mut failed = false;
                while let Some(event) = events.next().await {
                    // A new session started mid-stream abandons this turn.
                    if self.state().epoch != epoch {
                        break;
                    }
                    match event {
                        Ok(event) => {
                            if event.is_done() {
                                break;
                            }
                            self.apply_event(epoch, &session, &event, &mut record);
                        }
                        Err(error) => {
                            tracing::error!(%error, "generation stream failed");
                            failed = true;
                            break;
                        }
                    }
                }
                failed
            }
            Err(error) => {
                tracing::error!(%error, "failed to open generation stream");
                true
            }
        };

        let message = if failed {
            // No partial agent output is committed on failure.
            Some(ChatMessage::now(
                Role::Ai,
                TURN_FAILED_MESSAGE,
                MessageKind::Normal,
            ))
        } else if record.final_article.is_some() {
            Some(ChatMessage::now(
                Role::Ai,
                ARTICLE_READY_MESSAGE,
                MessageKind::Normal,
            ))
        } else if let Some((content, kind)) = record.last_non_writer {
            Some(ChatMessage::now(Role::Ai, content, kind))
        } else {
            None
        };

        if let Some(message) = message {
            let mut state = self.state();
            if state.epoch == epoch {
                state.transcript.push(message);
                self.store
                    .save_transcript(&session.session_id, &state.transcript);
            }
        }

        Ok(if failed {
            SendOutcome::Failed
        } else {
            SendOutcome::Completed
        })
    }

    /// Apply one decoded event, in arrival order. The indicator and the
    /// article buffer are last-write-wins; status-only events (such as the
    /// leading `init` line) carry nothing and fall through. Events from a
    /// turn that a new session has superseded are dropped under the state
    /// lock, so they can never repopulate the store after its reset.
    fn apply_event(
        &self,
        epoch: u64,
        session: &SessionInfo,
        event: &AgentEvent,
        record: &mut TurnRecord,
    ) {
        if let Some(article) = event.article() {
            let mut state = self.state();
            if state.epoch != epoch {
                return;
            }
            tracing::debug!(agent = %event.agent_name, "article update");
            record.final_article = Some(article.to_string());
            state.article = Some(article.to_string());
            self.store.save_article(&session.session_id, article);
        } else if let Some(content) = event.content() {
            let (content, kind) = match content {
                EventContent::Text(text) => (text.to_string(), MessageKind::Text),
                EventContent::Question(question) => (question.to_string(), MessageKind::Question),
            };
            let mut state = self.state();
            if state.epoch != epoch {
                return;
            }
            tracing::debug!(agent = %event.agent_name, kind = ?kind, "agent update");
            state.current_agent = Some(AgentIndicator {
                agent_name: event.agent_name.clone(),
                text: content.clone(),
            });
            if !event.is_writer() {
                record.last_non_writer = Some((content, kind));
            }
        }
    }

    /// Discard the session, transcript, article and every persisted
    /// conversation entry, then request a fresh session. On failure the
    /// conversation is left sessionless.
    ///
    /// A turn still in flight is superseded, not cancelled: its remaining
    /// events are dropped and it keeps the stream slot until it unwinds, so
    /// at most one outbound stream ever exists.
    pub async fn new_session(&self) -> Result<SessionInfo, ChatError> {
        {
            let mut state = self.state();
            state.epoch += 1;
            state.session = None;
            state.transcript.clear();
            state.article = None;
            state.current_agent = None;
            self.store.clear_conversations();
        }

        let session = self
            .backend
            .create_session()
            .await
            .map_err(ChatError::Session)?;
        self.store.save_session(&session);
        self.state().session = Some(session.clone());
        Ok(session)
    }
}
