//! Stop requests for the reload task and the scrape server.
//!
//! [`Shutdown`] is owned by the running [`Exporter`](super::Exporter); each
//! background task holds a [`ShutdownSignal`] taken from it. A signal resolves
//! once a stop is requested or once the owning handle is dropped, so a task
//! never outlives the exporter that spawned it. The stop flag is sticky: a
//! signal taken after the request still resolves immediately.

use tokio::sync::watch;

/// Owner side of the stop request.
pub struct Shutdown {
    tx: watch::Sender<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    /// A signal for one background task.
    pub fn signal(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Ask every task holding a signal to stop.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
        tracing::info!(tasks = self.tx.receiver_count(), "Shutdown requested");
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Task side of the stop request.
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Resolve once a stop was requested or the [`Shutdown`] handle is gone.
    ///
    /// Safe to use as a `tokio::select!` branch.
    pub async fn recv(&mut self) {
        // Err means the sender was dropped, which is a stop as well.
        let _ = self.rx.wait_for(|stopped| *stopped).await;
    }
}
