use async_trait::async_trait;
use folio_sdk::{AgentEventStream, FolioClient, FolioResult, SessionInfo};

/// Seam between the conversation and the generation service, so the
/// conversation can be driven by a real [`FolioClient`] or a test double.
#[async_trait]
pub trait GenerateBackend: Send + Sync {
    async fn create_session(&self) -> FolioResult<SessionInfo>;
    async fn stream_generate(
        &self,
        prompt: &str,
        session: Option<&SessionInfo>,
    ) -> FolioResult<AgentEventStream>;
}

#[async_trait]
impl GenerateBackend for FolioClient {
    async fn create_session(&self) -> FolioResult<SessionInfo> {
        FolioClient::create_session(self).await
    }

    async fn stream_generate(
        &self,
        prompt: &str,
        session: Option<&SessionInfo>,
    ) -> FolioResult<AgentEventStream> {
        FolioClient::stream_generate(
            self,
            prompt,
            session.map(|session| session.session_id.as_str()),
            session.map(|session| session.user_id.as_str()),
        )
        .await
    }
}
