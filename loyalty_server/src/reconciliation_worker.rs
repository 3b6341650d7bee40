use std::time::Duration;

use log::*;
use loyalty_engine::{HttpAccrualClient, Reconciler, SqliteDatabase};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{config::ReconciliationConfig, errors::ServerError};

/// A handle on the background reconciliation task.
pub struct ReconciliationWorker {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Starts the reconciliation worker against the accrual system at `address`. The worker runs until
/// [`ReconciliationWorker::stop`] is called.
pub fn start_reconciliation_worker(
    db: SqliteDatabase,
    address: &str,
    config: &ReconciliationConfig,
) -> Result<ReconciliationWorker, ServerError> {
    let client = HttpAccrualClient::new(address, config.accrual_timeout)
        .map_err(|e| ServerError::InitializeError(format!("Could not create the accrual client. {e}")))?;
    info!("🔄️ Reconciling orders against the accrual system at {}", client.base_url());
    let reconciler = Reconciler::new(db, client, config.reconciler_config());
    let cancel = CancellationToken::new();
    let handle = tokio::spawn(reconciler.run(cancel.clone()));
    Ok(ReconciliationWorker { cancel, handle })
}

impl ReconciliationWorker {
    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Asks the worker to stop and waits up to `grace` for it to finish the order it is working on. If it takes longer,
    /// the task is aborted.
    pub async fn stop(self, grace: Duration) {
        info!("🔄️ Stopping the reconciliation worker");
        self.cancel.cancel();
        let abort = self.handle.abort_handle();
        match tokio::time::timeout(grace, self.handle).await {
            Ok(Ok(())) => debug!("🔄️ Reconciliation worker has shut down"),
            Ok(Err(e)) => error!("🔄️ Reconciliation worker did not shut down cleanly. {e}"),
            Err(_) => {
                warn!("🔄️ Reconciliation worker did not stop within {grace:?}. Aborting it.");
                abort.abort();
            },
        }
    }
}
