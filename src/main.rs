use std::sync::Arc;

use rootserve::config::Config;
use rootserve::fs::ContentRoot;
use rootserve::server::{self, StartupError};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let (listener, root, read_timeout) = match start() {
        Ok(started) => started,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(e.exit_code());
        }
    };

    tokio::select! {
        res = server::serve(listener, root, read_timeout) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}

fn start() -> Result<
    (
        tokio::net::TcpListener,
        Arc<ContentRoot>,
        Option<std::time::Duration>,
    ),
    StartupError,
> {
    let cfg = Config::load().map_err(StartupError::Config)?;
    let addr = cfg.socket_addr().map_err(StartupError::Config)?;

    let root = ContentRoot::open(&cfg.content.root).map_err(StartupError::ContentRoot)?;
    tracing::info!("Serving {}", root.path().display());

    let listener = server::bind(addr, cfg.server.backlog)?;
    Ok((listener, Arc::new(root), cfg.read_timeout()))
}
