use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::errors::DataSourceError;

/// Cooperative cancellation shared by one scan and everything it awaits
#[derive(Debug, Clone)]
pub struct CancelToken {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once `cancel` has been called
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives as long as self, so this only returns on cancel
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }

    /// Run `fut` unless cancellation wins first
    pub async fn guard<F, T>(&self, fut: F) -> Result<T, DataSourceError>
    where
        F: Future<Output = T>,
    {
        if self.is_cancelled() {
            return Err(DataSourceError::Cancelled);
        }
        tokio::select! {
            _ = self.cancelled() => Err(DataSourceError::Cancelled),
            value = fut => Ok(value),
        }
    }

    pub async fn sleep(&self, duration: Duration) -> Result<(), DataSourceError> {
        self.guard(tokio::time::sleep(duration)).await
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}
