pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use std::future::pending;

use log::{info, warn};
use tokio::{net::TcpListener, signal};

pub use config::ServerConfig;
pub use error::{Result, ServerErr};
pub use routes::create_router;
pub use state::AppState;

/// Loads the model and serves predictions until Ctrl-C or SIGTERM is received.
///
/// The model is loaded before binding so a missing or broken artifact fails without ever
/// accepting a connection.
pub async fn run(config: ServerConfig) -> Result<()> {
    let state = AppState::load(&config.model_path)?;

    let addr = config.addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("listening at {addr}");

    serve(listener, state, shutdown_signal()).await
}

/// Serves predictions on `listener` until `shutdown` resolves, then finishes the in-flight
/// requests.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("server stopped");
    Ok(())
}

/// Resolves on Ctrl-C or, on unix, on SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("failed to listen for Ctrl-C: {e}");
            pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("failed to listen for SIGTERM: {e}");
                pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl-C, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
