mod backend;
mod conversation;
mod errors;
mod store;
mod transcript;

pub use backend::GenerateBackend;
pub use conversation::{AgentIndicator, Conversation, SendOutcome};
pub use errors::ChatError;
pub use store::{MemoryStore, SessionStore};
pub use transcript::{ChatMessage, MessageKind, Role};
