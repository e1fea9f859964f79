//! Stream one generation request and print every decoded event.

use folio_sdk::FolioClient;
use futures::StreamExt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let client = FolioClient::from_env();
    let session = client.create_session().await?;
    println!("session {} / user {}", session.session_id, session.user_id);

    let mut events = client
        .stream_generate(
            "Write a short article about the Rust borrow checker",
            Some(&session.session_id),
            Some(&session.user_id),
        )
        .await?;

    while let Some(event) = events.next().await {
        let event = event?;
        if event.is_done() {
            println!("(done)");
            break;
        }
        if let Some(article) = event.article() {
            println!("[{}] article ({} chars)", event.agent_name, article.len());
        } else if let Some(content) = event.content() {
            println!("[{}] {content:?}", event.agent_name);
        }
    }
    Ok(())
}
