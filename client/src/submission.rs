use ethers::types::H256;
use eyre::Result;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::errors::ClientError;

/// An input submission running in the background.
///
/// The transaction may not even be broadcast yet when this is returned. Either `wait` for the
/// hash of the mined transaction or `detach` to let it finish on its own.
#[derive(Debug)]
#[must_use = "a pending submission does nothing to report its failure unless waited on or detached"]
pub struct PendingSubmission {
    handle: JoinHandle<Result<H256>>,
}

impl PendingSubmission {
    pub(crate) fn new(handle: JoinHandle<Result<H256>>) -> Self {
        Self { handle }
    }

    pub async fn wait(self) -> Result<H256> {
        self.handle.await.map_err(ClientError::from)?
    }

    /// Drops the handle, logging the outcome if the submission fails.
    pub fn detach(self) {
        tokio::spawn(async move {
            if let Err(err) = self.wait().await {
                warn!(target: "rollup_bench::client", "detached submission failed: {}", err);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use super::*;

    #[tokio::test]
    async fn test_wait_returns_tx_hash() {
        let hash = H256::repeat_byte(0xab);
        let pending = PendingSubmission::new(tokio::spawn(async move { Ok(hash) }));

        assert_eq!(pending.wait().await.unwrap(), hash);
    }

    #[tokio::test]
    async fn test_wait_surfaces_panics_as_join_errors() {
        let pending = PendingSubmission::new(tokio::spawn(async { panic!("boom") }));

        let err = pending.wait().await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ClientError>(),
            Some(ClientError::Join(_))
        ));
    }

    #[traced_test]
    #[tokio::test]
    async fn test_detach_logs_failures() {
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let pending = PendingSubmission::new(tokio::spawn(async move {
            let _ = rx.await;
            Err(eyre::eyre!("replacement transaction underpriced"))
        }));

        pending.detach();
        tx.send(()).unwrap();

        for _ in 0..100 {
            if logs_contain("detached submission failed") {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        assert!(logs_contain("replacement transaction underpriced"));
    }
}
