mod client;
mod decoder;
mod errors;
mod event_stream;
mod types;

pub use client::{generate_browser_id, FolioClient, FolioClientOptions};
pub use decoder::{decode_events, LineBuffer};
pub use errors::*;
pub use event_stream::AgentEventStream;
pub use types::*;
