use crate::{
    decoder::decode_events,
    errors::{FolioError, FolioResult},
    event_stream::AgentEventStream,
    types::{GenerateRequest, SessionInfo},
};
use reqwest::{
    header::{self, HeaderValue},
    Client,
};

const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Generate a fresh per-browser identifier. Callers persist it locally and
/// reuse it across sessions so the service can correlate requests.
#[must_use]
pub fn generate_browser_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// HTTP client for the Folio content-generation service.
pub struct FolioClient {
    pub base_url: String,
    pub client: Client,
}

pub struct FolioClientOptions {
    pub base_url: Option<String>,
    /// Sent as `x-api-key` on every request when configured.
    pub api_key: Option<String>,
    /// Client-generated UUID sent as `x-browser-id` on every request.
    pub browser_id: String,
}

impl FolioClient {
    pub fn new(options: FolioClientOptions) -> FolioClient {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        if let Some(api_key) = &options.api_key {
            let mut api_key_value: HeaderValue = api_key.as_str().try_into().unwrap();
            api_key_value.set_sensitive(true);
            headers.insert("x-api-key", api_key_value);
        }
        headers.insert(
            "x-browser-id",
            options.browser_id.as_str().try_into().unwrap(),
        );

        FolioClient {
            base_url: options.base_url.unwrap_or(DEFAULT_BASE_URL.to_string()),
            client: Client::builder().default_headers(headers).build().unwrap(),
        }
    }

    /// Build a client from the `FOLIO_BASE_URL` and `FOLIO_API_KEY`
    /// environment variables, with a freshly generated browser id.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(FolioClientOptions {
            base_url: std::env::var("FOLIO_BASE_URL").ok(),
            api_key: std::env::var("FOLIO_API_KEY").ok(),
            browser_id: generate_browser_id(),
        })
    }

    /// Request a new server-issued session.
    pub async fn create_session(&self) -> FolioResult<SessionInfo> {
        let response = self
            .client
            .post(format!("{}/api/session/new", self.base_url))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(FolioError::StatusCode(
                response.status(),
                response.text().await.unwrap_or_default(),
            ));
        }
        Ok(response.json::<SessionInfo>().await?)
    }

    /// Open one generation stream for the given prompt and session.
    ///
    /// Fails fast with [`FolioError::StatusCode`] on a non-success response,
    /// before any event is produced.
    pub async fn stream_generate(
        &self,
        prompt: &str,
        session_id: Option<&str>,
        user_id: Option<&str>,
    ) -> FolioResult<AgentEventStream> {
        let body = GenerateRequest {
            prompt: prompt.to_string(),
            session_id: session_id.map(str::to_owned),
            user_id: user_id.map(str::to_owned),
        };
        let response = self
            .client
            .post(format!("{}/api/generate/stream", self.base_url))
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(FolioError::StatusCode(
                response.status(),
                response.text().await.unwrap_or_default(),
            ));
        }
        Ok(decode_events(response.bytes_stream()))
    }
}
