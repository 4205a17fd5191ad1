//! Connect command implementation

use std::sync::Arc;

use anyhow::Result;
use tokio_util::sync::CancellationToken;

use rt_core::config::ClientConfig;
use rt_core::session::{
    spawn_stdin_pump, CrosstermTerminal, EscapeDetector, RelaySession, SessionEnd,
    DISCONNECT_NOTICE,
};
use rt_core::{ConnectionDescriptor, ConnectionError, RelayError};

use crate::output::{print_info, print_success, print_warning};
use crate::remote::GrpcRemote;

/// Execute the connect command - open the remote connection and relay until it ends
pub async fn connect_command(
    config: &ClientConfig,
    descriptor: ConnectionDescriptor,
) -> Result<SessionEnd> {
    print_info(&format!("Connecting to {} via {}...", descriptor, config.target));

    let remote = GrpcRemote::connect(&config.target, config.connect_timeout)
        .await
        .map_err(|e| {
            RelayError::ConnectionEstablishment(ConnectionError::Unreachable(e.to_string()))
        })?;

    let session =
        RelaySession::open(Arc::new(remote), descriptor, config.session.clone()).await?;
    let detector = EscapeDetector::from_config(&config.session)?;

    print_success(&format!(
        "Connected id={}; {} to quit",
        session.connection_id(),
        detector.describe()
    ));

    cancel_on_signal(session.termination_token());

    let result = session
        .run(CrosstermTerminal, spawn_stdin_pump(), tokio::io::stdout())
        .await;

    // The remote may have left the cursor mid-line
    println!();
    println!("{}", DISCONNECT_NOTICE);

    let end = result?;
    match &end {
        SessionEnd::StreamFailed(reason) => {
            print_warning(&format!("Connection lost: {}", reason));
        }
        other => tracing::debug!("Session ended: {:?}", other),
    }

    Ok(end)
}

/// End the session on SIGINT, SIGTERM or SIGHUP
///
/// In raw mode Ctrl+C reaches the remote as a byte, so these only arrive
/// from outside (kill, closed terminal window).
fn cancel_on_signal(token: CancellationToken) {
    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        let terminate = async {
            use tokio::signal::unix::{signal, SignalKind};

            match (
                signal(SignalKind::terminate()),
                signal(SignalKind::hangup()),
            ) {
                (Ok(mut term), Ok(mut hup)) => {
                    tokio::select! {
                        _ = term.recv() => {}
                        _ = hup.recv() => {}
                    }
                }
                _ => {
                    tracing::warn!("Failed to install signal handlers");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                tracing::info!("Received interrupt, ending session...");
            }
            _ = terminate => {
                tracing::info!("Received termination signal, ending session...");
            }
            _ = token.cancelled() => return,
        }

        token.cancel();
    });
}
