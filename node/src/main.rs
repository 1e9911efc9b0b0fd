use axum::serve;
use chamberconnect_node::{init_tracing, router, AppConfig, AppState};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::from_env()?;
    let (state, _store_task) = AppState::bootstrap(config.clone())?;

    let mut events = state.store().subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => debug!(sequence = event.sequence, "store event"),
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "store event log lagged"),
                Err(RecvError::Closed) => break,
            }
        }
    });

    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;
    info!(%local_addr, build_id = %config.build_id, "starting ChamberConnect node service");

    serve(listener, app).await?;
    Ok(())
}
