//! Cooperative cancellation for in-flight requests.
//!
//! A [`CancelHandle`] is held by whoever may abort a request (the Ctrl+C
//! handler in the binary, a UI "stop" button). Each request receives a
//! [`CancelSignal`] and checks it whenever it would otherwise wait on the
//! network.

use std::sync::Arc;
use tokio::sync::watch;

/// Fires the paired [`CancelSignal`]s. Firing is idempotent.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
}

/// Observes a [`CancelHandle`].
#[derive(Debug, Clone)]
pub struct CancelSignal {
    rx: watch::Receiver<bool>,
}

/// Create a connected handle and signal.
pub fn cancel_pair() -> (CancelHandle, CancelSignal) {
    let (tx, rx) = watch::channel(false);
    (
        CancelHandle {
            tx: Arc::new(tx),
        },
        CancelSignal { rx },
    )
}

impl CancelHandle {
    pub fn cancel(&self) {
        // send_replace succeeds even when every signal has been dropped
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Another signal observing this handle.
    pub fn signal(&self) -> CancelSignal {
        CancelSignal {
            rx: self.tx.subscribe(),
        }
    }
}

impl CancelSignal {
    /// A signal with no handle; it never fires.
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self { rx }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once the handle fires.
    ///
    /// Pends forever if every handle is dropped without firing.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}
