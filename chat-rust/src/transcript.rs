use chrono::Local;
use serde::{Deserialize, Serialize};

/// Who authored a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Ai,
}

/// Governs how a message renders: a plain entry, an agent status text, or a
/// question that expects an answer from the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Normal,
    Text,
    Question,
}

/// A persisted transcript entry. Immutable once appended; the transcript is
/// an ordered, append-only sequence for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    /// Markdown-formatted for `ai` entries.
    pub content: String,
    /// Human-readable clock time of the append.
    pub timestamp: String,
    #[serde(default)]
    pub kind: MessageKind,
}

impl ChatMessage {
    /// Build a message stamped with the current local clock time.
    #[must_use]
    pub fn now(role: Role, content: impl Into<String>, kind: MessageKind) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Local::now().format("%H:%M").to_string(),
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_defaults_to_normal_when_absent() {
        let message: ChatMessage = serde_json::from_str(
            r#"{"role":"user","content":"hello","timestamp":"09:15"}"#,
        )
        .unwrap();
        assert_eq!(message.role, Role::User);
        assert_eq!(message.kind, MessageKind::Normal);
    }

    #[test]
    fn kinds_round_trip_lowercase() {
        let message = ChatMessage::now(Role::Ai, "which angle?", MessageKind::Question);
        let json = serde_json::to_string(&message).unwrap();
        assert!(json.contains(r#""kind":"question""#));
        assert!(json.contains(r#""role":"ai""#));
    }
}
