use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::Config;
use crate::http::connection::Connection;
use crate::site::router::Router;
use crate::site::templates::SERVER_NAME;

/// Accepts connections forever, serving each on its own task.
///
/// Only a failure to bind or to accept returns; both are fatal.
pub async fn run(cfg: Arc<Config>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&cfg.server.listen_addr)
        .await
        .with_context(|| format!("cannot listen on {}", cfg.server.listen_addr))?;
    info!(
        "{} listening on {} serving {}",
        SERVER_NAME,
        cfg.server.listen_addr,
        cfg.site.web_root.display()
    );

    serve(listener, cfg).await
}

/// Accept loop over an already bound listener.
pub async fn serve(listener: TcpListener, cfg: Arc<Config>) -> anyhow::Result<()> {
    let router = Arc::new(Router::new(Arc::new(cfg.site.clone())));
    let legacy_post_ack = cfg.server.legacy_post_ack;

    loop {
        let (socket, peer) = listener
            .accept()
            .await
            .context("failed to accept connection")?;
        tracing::debug!("Accepted connection from {}", peer);

        let router = Arc::clone(&router);
        tokio::spawn(async move {
            let mut conn = Connection::new(socket, peer, router).legacy_post_ack(legacy_post_ack);
            if let Err(e) = conn.run().await {
                tracing::warn!("Connection error from {}: {:#}", peer, e);
            }
        });
    }
}
