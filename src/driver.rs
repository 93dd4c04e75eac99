//! Polling loop that keeps the presence alive until interrupted

use std::future::Future;

use crate::error::PresenceError;
use crate::presence::{Connector, Overrides, PresenceSession};

/// Connect, then push the presence every update interval until `shutdown`
/// resolves. The session is closed on every exit path.
///
/// `shutdown` is polled before the first connection attempt, so an interrupt
/// arriving during startup is seen too. Returns an error only when the
/// initial connection cannot be established.
pub async fn run<C, F>(session: &mut PresenceSession<C>, shutdown: F) -> Result<(), PresenceError>
where
    C: Connector,
    F: Future<Output = ()>,
{
    run_with_clock(session, shutdown, || chrono::Utc::now().timestamp()).await
}

/// [`run`] with the source of the per-update start timestamp supplied by the caller
pub(crate) async fn run_with_clock<C, F, N>(
    session: &mut PresenceSession<C>,
    shutdown: F,
    now: N,
) -> Result<(), PresenceError>
where
    C: Connector,
    F: Future<Output = ()>,
    N: Fn() -> i64,
{
    tokio::pin!(shutdown);

    let connected = tokio::select! {
        biased;
        _ = &mut shutdown => None,
        result = session.connect_default() => Some(result),
    };

    match connected {
        None => {
            tracing::info!("Interrupt received during startup, closing Rich Presence");
            session.close().await;
            return Ok(());
        }
        Some(Err(e)) => {
            tracing::error!("Could not establish initial connection: {}", e);
            session.close().await;
            return Err(e);
        }
        Some(Ok(())) => {}
    }

    let interval = session.settings().update_interval();

    tracing::info!(
        "Rich Presence active, updating every {}s (press Ctrl-C to stop)",
        interval.as_secs()
    );

    loop {
        if let Err(e) = session.update(&Overrides::with_start(now())).await {
            tracing::warn!("Presence update failed: {}", e);

            if let Err(e) = session.connect_default().await {
                tracing::warn!("Reconnect failed, trying again next cycle: {}", e);
            }
        }

        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("Interrupt received, closing Rich Presence");
                break;
            }
            _ = tokio::time::sleep(interval) => {}
        }
    }

    session.close().await;
    Ok(())
}
