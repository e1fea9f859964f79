use crate::transcript::ChatMessage;
use folio_sdk::SessionInfo;
use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
};

/// Persistence boundary for conversation state: the current session, the
/// per-browser identifier, and one article blob and transcript per session.
///
/// Writes mirror in-memory state and are best-effort; implementations report
/// storage failures themselves rather than failing the conversation, and a
/// load that finds nothing returns empty state.
pub trait SessionStore: Send + Sync {
    fn load_session(&self) -> Option<SessionInfo>;
    fn save_session(&self, session: &SessionInfo);
    fn load_browser_id(&self) -> Option<String>;
    fn save_browser_id(&self, browser_id: &str);
    fn load_article(&self, session_id: &str) -> Option<String>;
    fn save_article(&self, session_id: &str, article: &str);
    fn load_transcript(&self, session_id: &str) -> Vec<ChatMessage>;
    fn save_transcript(&self, session_id: &str, transcript: &[ChatMessage]);
    /// Remove the current session and every per-session entry. Conversation
    /// state is invalidated together when a new session starts; the browser
    /// id survives.
    fn clear_conversations(&self);
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    session: Option<SessionInfo>,
    browser_id: Option<String>,
    articles: HashMap<String, String>,
    transcripts: HashMap<String, Vec<ChatMessage>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn inner(&self) -> std::sync::MutexGuard<'_, MemoryStoreInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionStore for MemoryStore {
    fn load_session(&self) -> Option<SessionInfo> {
        self.inner().session.clone()
    }

    fn save_session(&self, session: &SessionInfo) {
        self.inner().session = Some(session.clone());
    }

    fn load_browser_id(&self) -> Option<String> {
        self.inner().browser_id.clone()
    }

    fn save_browser_id(&self, browser_id: &str) {
        self.inner().browser_id = Some(browser_id.to_string());
    }

    fn load_article(&self, session_id: &str) -> Option<String> {
        self.inner().articles.get(session_id).cloned()
    }

    fn save_article(&self, session_id: &str, article: &str) {
        self.inner()
            .articles
            .insert(session_id.to_string(), article.to_string());
    }

    fn load_transcript(&self, session_id: &str) -> Vec<ChatMessage> {
        self.inner()
            .transcripts
            .get(session_id)
            .cloned()
            .unwrap_or_default()
    }

    fn save_transcript(&self, session_id: &str, transcript: &[ChatMessage]) {
        self.inner()
            .transcripts
            .insert(session_id.to_string(), transcript.to_vec());
    }

    fn clear_conversations(&self) {
        let mut inner = self.inner();
        inner.session = None;
        inner.articles.clear();
        inner.transcripts.clear();
    }
}
