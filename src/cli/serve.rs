//! Serve command: run the HTTP API until Ctrl-C

use std::path::Path;

use anyhow::Result;
use tracing::{info, warn};

use super::{load_config, open_services};
use crate::auth::AuthService;
use crate::http::{HttpServer, HttpState};

pub async fn serve_command(config_path: Option<&Path>, port: Option<u16>) -> Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(port) = port {
        config.server.port = port;
    }

    let (db, progress) = open_services(&config)?;
    match db.prune_sessions(chrono::Utc::now().timestamp()) {
        Ok(0) => {}
        Ok(n) => info!("[bowo:auth] Pruned {} expired sessions", n),
        Err(e) => warn!("[bowo:auth] Failed to prune sessions: {}", e),
    }

    let state = HttpState {
        progress,
        auth: AuthService::new(db, config.auth.clone()),
        max_body_bytes: config.server.max_body_bytes,
    };
    let server = HttpServer::bind(&config.server.bind_addr(), state, config.server.workers)?;
    let workers = server.spawn();

    tokio::signal::ctrl_c().await?;
    info!("[bowo:http] Shutting down");
    server.shutdown();

    tokio::task::spawn_blocking(move || {
        for worker in workers {
            let _ = worker.join();
        }
    })
    .await?;
    Ok(())
}
