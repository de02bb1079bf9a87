use anyhow::Result;
use clap::Parser;
use engine::Engine;
use server::{build_app, AppState, DEFAULT_MAX_SESSIONS};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "server", about = "Serve questions and summaries over a text corpus")]
struct Args {
    /// Text file or directory of pages to load at startup
    #[arg(long)]
    corpus: Option<PathBuf>,
    /// Open chat sessions kept before the oldest are dropped
    #[arg(long, default_value_t = DEFAULT_MAX_SESSIONS)]
    max_sessions: usize,
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let state = AppState::with_session_limit(Arc::new(Engine::new()), args.max_sessions);
    if let Some(path) = &args.corpus {
        let loaded = state.load_path(path)?;
        tracing::info!(path = %path.display(), pages = loaded.pages, sentences = loaded.sentences, terms = loaded.terms, "preloaded corpus");
    }

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, max_sessions = args.max_sessions, "server listening");
    axum::serve(listener, build_app(state)).await?;
    Ok(())
}
