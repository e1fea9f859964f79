use thiserror::Error;

#[derive(Error, Debug)]
pub enum FolioError {
    /// The request to the service failed or the reading of the response body
    /// failed.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The service returned a non-success status code
    #[error("Status error: {1} (Status {0})")]
    StatusCode(reqwest::StatusCode, String),
    /// The response from the service was unexpected (e.g. a session reply
    /// missing its identifiers)
    #[error("Invariant: {0}")]
    Invariant(String),
}

pub type FolioResult<T> = Result<T, FolioError>;
