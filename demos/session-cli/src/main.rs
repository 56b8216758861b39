//! Example command line client for the session service.
//!
//! Run with: cargo run -p session-cli -- list
//!
//! The service URL comes from `SESSION_BRIDGE_URL` (default
//! `http://127.0.0.1:4096`). Output is JSON on stdout.

use anyhow::{Context, bail};
use serde_json::json;
use session_bridge_adapter::SessionAdapter;
use session_bridge_core::WorkspaceContext;
use session_bridge_http::{HttpClientConfig, HttpSessionClient};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "usage: session-cli <list|status|create [TITLE]|show ID|share ID|delete ID>";

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    if let Err(e) = run(std::env::args().skip(1).collect()).await {
        tracing::error!("{e:#}");
        std::process::exit(1);
    }
}

async fn run(args: Vec<String>) -> anyhow::Result<()> {
    let config = HttpClientConfig::from_env()?;
    let client = HttpSessionClient::new(&config)?;
    let adapter = SessionAdapter::new(client, WorkspaceContext::current());
    tracing::info!(
        "Using {} for {}",
        adapter.client().base_url(),
        adapter.context().directory().display()
    );

    let arg = |i: usize| {
        args.get(i)
            .map(String::as_str)
            .with_context(|| format!("missing argument\n{USAGE}"))
    };

    let output = match arg(0)? {
        "list" => {
            // Sessions and their status in one round of requests.
            let (sessions, status) =
                futures::join!(adapter.list_sessions(), adapter.get_session_status());
            let status = status.unwrap_or_default();
            let rows: Vec<_> = sessions?
                .into_iter()
                .map(|s| {
                    let state = status.get(&s.id).cloned();
                    json!({ "session": s, "status": state })
                })
                .collect();
            json!(rows)
        }
        "status" => json!(adapter.get_session_status().await),
        "create" => {
            let options = session_bridge_adapter::CreateSessionOptions {
                title: args.get(1).cloned(),
                parent_id: None,
            };
            json!({ "id": adapter.create_session_with(options).await? })
        }
        "show" => {
            let id = arg(1)?;
            let (session, messages, todos) = futures::join!(
                adapter.switch_session(id),
                adapter.get_messages(id),
                adapter.get_session_todos(id),
            );
            json!({
                "session": session?,
                "messages": messages?.len(),
                "todos": todos,
            })
        }
        "share" => serde_json::to_value(adapter.share_session(arg(1)?).await)?,
        "delete" => serde_json::to_value(adapter.delete_session(arg(1)?).await)?,
        other => bail!("unknown command '{other}'\n{USAGE}"),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
