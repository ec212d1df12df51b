//! Interrupt handling
//!
//! A `Shutdown` handle is triggered by Ctrl-C (or SIGTERM on unix). The
//! coordinator watches a `ShutdownListener` and stops dispatching new URLs
//! once it fires; fetches already in flight are allowed to finish.

use tokio::sync::watch;

/// Sending half of the interrupt signal
#[derive(Debug, Clone)]
pub struct Shutdown {
    sender: watch::Sender<bool>,
}

/// Receiving half watched by the coordinator's dispatch loop
#[derive(Debug, Clone)]
pub struct ShutdownListener {
    receiver: watch::Receiver<bool>,
}

impl Shutdown {
    /// Creates an untriggered handle and a listener for it
    pub fn new() -> (Self, ShutdownListener) {
        let (sender, receiver) = watch::channel(false);
        (Self { sender }, ShutdownListener { receiver })
    }

    /// Signals every listener; triggering twice is harmless
    pub fn trigger(&self) {
        self.sender.send_replace(true);
    }
}

impl ShutdownListener {
    /// Resolves once shutdown has been triggered
    ///
    /// If every `Shutdown` handle is dropped without triggering, this never
    /// resolves.
    pub async fn notified(&mut self) {
        while !*self.receiver.borrow_and_update() {
            if self.receiver.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }

    /// Returns true once shutdown has been triggered
    pub fn is_triggered(&self) -> bool {
        *self.receiver.borrow()
    }
}

/// Triggers `shutdown` on Ctrl-C, and on SIGTERM where supported
pub fn install_signal_handlers(shutdown: Shutdown) {
    let ctrlc = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, finishing in-flight requests");
            ctrlc.trigger();
        }
    });

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let term = shutdown;
        tokio::spawn(async move {
            if let Ok(mut sig) = signal(SignalKind::terminate()) {
                sig.recv().await;
                term.trigger();
            }
        });
    }
}
