use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use folio_sdk::{FolioClient, FolioClientOptions, FolioError, SessionInfo};
use futures::StreamExt;
use tokio::net::TcpListener;

const API_KEY: &str = "test-key";

async fn new_session(headers: HeaderMap) -> Response {
    if headers.get("x-api-key").map(|value| value.as_bytes()) != Some(API_KEY.as_bytes()) {
        return (StatusCode::UNAUTHORIZED, "Invalid or missing API key").into_response();
    }
    assert!(headers.contains_key("x-browser-id"));
    Json(SessionInfo {
        session_id: "session-1".to_string(),
        user_id: "user-1".to_string(),
    })
    .into_response()
}

async fn generate_stream() -> Response {
    // Deliver the body in chunks that split one event across a boundary.
    let chunks = vec![
        Ok::<_, std::convert::Infallible>(Bytes::from_static(
            b"{\"status\":\"init\",\"session_id\":\"session-1\",\"user_id\":\"user-1\"}\n{\"agent_name\":\"outline_a",
        )),
        Ok(Bytes::from_static(
            b"gent\",\"text\":\"outlining\"}\n{\"agent_name\":\"writer_agent\",\"article\":\"# Title\"}\n",
        )),
        Ok(Bytes::from_static(b"{\"status\":\"done\"}\n")),
    ];
    Body::from_stream(futures::stream::iter(chunks)).into_response()
}

async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn client(base_url: String, api_key: Option<&str>) -> FolioClient {
    FolioClient::new(FolioClientOptions {
        base_url: Some(base_url),
        api_key: api_key.map(str::to_owned),
        browser_id: folio_sdk::generate_browser_id(),
    })
}

#[tokio::test]
async fn create_session_returns_server_issued_identifiers() {
    let base_url = serve(Router::new().route("/api/session/new", post(new_session))).await;

    let session = client(base_url, Some(API_KEY)).create_session().await.unwrap();
    assert_eq!(session.session_id, "session-1");
    assert_eq!(session.user_id, "user-1");
}

#[tokio::test]
async fn create_session_surfaces_error_status() {
    let base_url = serve(Router::new().route("/api/session/new", post(new_session))).await;

    let error = client(base_url, None).create_session().await.unwrap_err();
    match error {
        FolioError::StatusCode(status, _) => assert_eq!(status, StatusCode::UNAUTHORIZED),
        other => panic!("expected status error, got {other}"),
    }
}

#[tokio::test]
async fn stream_generate_decodes_events_end_to_end() {
    let base_url = serve(Router::new().route(
        "/api/generate/stream",
        post(generate_stream),
    ))
    .await;

    let events: Vec<_> = client(base_url, Some(API_KEY))
        .stream_generate("write about rust", Some("session-1"), Some("user-1"))
        .await
        .unwrap()
        .map(|event| event.unwrap())
        .collect()
        .await;

    assert_eq!(events.len(), 4);
    assert_eq!(events[0].status.as_deref(), Some("init"));
    assert_eq!(events[1].agent_name, "outline_agent");
    assert_eq!(events[1].text.as_deref(), Some("outlining"));
    assert_eq!(events[2].article.as_deref(), Some("# Title"));
    assert!(events[3].is_done());
}

#[tokio::test]
async fn stream_generate_fails_fast_on_error_status() {
    let base_url = serve(Router::new().route(
        "/api/generate/stream",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    ))
    .await;

    let error = client(base_url, Some(API_KEY))
        .stream_generate("write about rust", None, None)
        .await
        .unwrap_err();
    match error {
        FolioError::StatusCode(status, body) => {
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body, "boom");
        }
        other => panic!("expected status error, got {other}"),
    }
}
