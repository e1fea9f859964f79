use serde::{Deserialize, Serialize};

/// Identifier of the agent whose `text` output is draft article prose rather
/// than a status update. Its text and questions never become the fallback
/// chat message after a turn completes.
pub const WRITER_AGENT: &str = "writer_agent";

/// `status` value that terminates a generation stream.
pub const STATUS_DONE: &str = "done";

/// Server-issued identifier pair scoping one conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub session_id: String,
    pub user_id: String,
}

/// Body of a `POST /api/generate/stream` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
    pub session_id: Option<String>,
    pub user_id: Option<String>,
}

/// One decoded line from a generation stream.
///
/// The service emits at most one payload field per event (`article`, `text`
/// or `question`). Status-only events carry none of them: the stream opens
/// with an `init` status line and ends with a `done` status line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentEvent {
    #[serde(default)]
    pub agent_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Text-bearing payload of an [`AgentEvent`], tagged by payload kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventContent<'a> {
    Text(&'a str),
    Question(&'a str),
}

impl AgentEvent {
    /// Whether this event terminates the stream. A done event is a marker
    /// only and must never be treated as content.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.status.as_deref() == Some(STATUS_DONE)
    }

    /// Whether this event was produced by the writer agent.
    #[must_use]
    pub fn is_writer(&self) -> bool {
        self.agent_name == WRITER_AGENT
    }

    /// The article payload, when present and non-empty.
    #[must_use]
    pub fn article(&self) -> Option<&str> {
        self.article.as_deref().filter(|article| !article.is_empty())
    }

    /// The text or question payload, `text` taking precedence. Empty strings
    /// count as absent.
    #[must_use]
    pub fn content(&self) -> Option<EventContent<'_>> {
        if let Some(text) = self.text.as_deref().filter(|text| !text.is_empty()) {
            return Some(EventContent::Text(text));
        }
        self.question
            .as_deref()
            .filter(|question| !question.is_empty())
            .map(EventContent::Question)
    }

    /// Construct a text event from the named agent.
    #[must_use]
    pub fn text(agent_name: &str, text: &str) -> Self {
        Self {
            agent_name: agent_name.to_string(),
            text: Some(text.to_string()),
            ..Self::default()
        }
    }

    /// Construct a question event from the named agent.
    #[must_use]
    pub fn question(agent_name: &str, question: &str) -> Self {
        Self {
            agent_name: agent_name.to_string(),
            question: Some(question.to_string()),
            ..Self::default()
        }
    }

    /// Construct an article event from the named agent.
    #[must_use]
    pub fn article_from(agent_name: &str, article: &str) -> Self {
        Self {
            agent_name: agent_name.to_string(),
            article: Some(article.to_string()),
            ..Self::default()
        }
    }

    /// Construct the stream-terminating done event.
    #[must_use]
    pub fn done() -> Self {
        Self {
            status: Some(STATUS_DONE.to_string()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn done_event_is_not_content() {
        let event = AgentEvent::done();
        assert!(event.is_done());
        assert!(event.article().is_none());
        assert!(event.content().is_none());
    }

    #[test]
    fn text_takes_precedence_over_question() {
        let event = AgentEvent {
            agent_name: "research_agent".to_string(),
            text: Some("looking up sources".to_string()),
            question: Some("which angle?".to_string()),
            ..AgentEvent::default()
        };
        assert_eq!(
            event.content(),
            Some(EventContent::Text("looking up sources"))
        );
    }

    #[test]
    fn empty_payloads_count_as_absent() {
        let event = AgentEvent {
            agent_name: "outline_agent".to_string(),
            text: Some(String::new()),
            question: Some("which angle?".to_string()),
            article: Some(String::new()),
            ..AgentEvent::default()
        };
        assert!(event.article().is_none());
        assert_eq!(event.content(), Some(EventContent::Question("which angle?")));
    }

    #[test]
    fn deserializes_status_only_lines() {
        let event: AgentEvent =
            serde_json::from_str(r#"{"status":"init","session_id":"s1","user_id":"u1"}"#).unwrap();
        assert!(!event.is_done());
        assert!(event.agent_name.is_empty());
        assert!(event.content().is_none());
    }
}
