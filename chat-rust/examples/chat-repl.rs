//! Minimal terminal chat against a running Folio service.
//!
//! Reads `FOLIO_BASE_URL` and `FOLIO_API_KEY` from the environment (or a
//! `.env` file). Type a prompt to send it, `/new` to start a fresh session.

use folio_chat::{Conversation, MemoryStore, Role, SessionStore};
use folio_sdk::{generate_browser_id, FolioClient, FolioClientOptions};
use std::{
    io::{BufRead, Write},
    sync::Arc,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let store = Arc::new(MemoryStore::new());
    // The browser id outlives sessions; reuse the persisted one when present.
    let browser_id = store.load_browser_id().unwrap_or_else(|| {
        let id = generate_browser_id();
        store.save_browser_id(&id);
        id
    });
    let client = FolioClient::new(FolioClientOptions {
        base_url: std::env::var("FOLIO_BASE_URL").ok(),
        api_key: std::env::var("FOLIO_API_KEY").ok(),
        browser_id,
    });

    let conversation = Conversation::resume(Arc::new(client), store);

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        if line.trim() == "/new" {
            let session = conversation.new_session().await?;
            println!("(session {})", session.session_id);
            continue;
        }

        conversation.send(&line).await?;

        if let Some(message) = conversation.transcript().last() {
            if message.role == Role::Ai {
                println!("{}", message.content);
            }
        }
        if let Some(article) = conversation.article() {
            println!("--- article ---\n{article}");
        }
    }
    Ok(())
}
