//! Graceful shutdown

use tokio::signal;

/// Resolves once the process is asked to stop
///
/// Listens to Ctrl+C everywhere and to SIGTERM on unix
pub async fn handler() {
    let interrupt = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("Could not listen for Ctrl+C: {err}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!("Could not listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal_name = tokio::select! {
        () = interrupt => "interrupt",
        () = terminate => "terminate",
    };

    tracing::info!(signal = signal_name, "Shutting down, draining open requests");
}
