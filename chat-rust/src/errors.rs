use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    /// A session could not be created. The transcript is left untouched and
    /// the conversation stays ready for the next attempt.
    #[error("Session creation failed: {0}")]
    Session(#[source] folio_sdk::FolioError),
}
