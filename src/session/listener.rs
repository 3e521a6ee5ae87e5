use tokio::{sync::watch, task::JoinHandle};
use tokio_util::sync::CancellationToken;

use super::SessionIdentity;
use crate::reports::ReportController;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// Refetch on sign-in, clear on sign-out, until `cancel_token` fires or the
/// gate goes away.
pub fn spawn_identity_listener(
    mut identity_rx: watch::Receiver<Option<SessionIdentity>>,
    reports: ReportController,
    cancel_token: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                _ = cancel_token.cancelled() => {
                    log_info!("identity listener shutting down");
                    break;
                }
                changed = identity_rx.changed() => {
                    if changed.is_err() {
                        log_info!("session gate dropped; identity listener exiting");
                        break;
                    }

                    let signed_in = identity_rx.borrow_and_update().is_some();
                    if signed_in {
                        if let Err(err) = reports.fetch_all().await {
                            log_warn!("fetch after sign-in failed: {err}");
                        }
                    } else {
                        reports.clear().await;
                    }
                }
            }
        }
    })
}
