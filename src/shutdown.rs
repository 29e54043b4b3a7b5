use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::broadcast;

pub type ShutdownReceiver = broadcast::Receiver<()>;

/// Single-fire cancellation signal bridging the status controller (and any
/// other trigger, such as an operator interrupt) to the listener lifecycle.
///
/// Concurrent callers may race to fire it; only the first send reaches the
/// broadcast channel.
#[derive(Debug)]
pub struct ShutdownSignal {
    fired: AtomicBool,
    tx: broadcast::Sender<()>,
}

impl ShutdownSignal {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self {
            fired: AtomicBool::new(false),
            tx,
        }
    }

    /// Fires the signal. Returns `true` only for the first caller.
    pub fn fire(&self) -> bool {
        if self.fired.swap(true, Ordering::SeqCst) {
            return false;
        }
        if self.tx.send(()).is_err() {
            tracing::debug!("Shutdown fired with no live subscriber.");
        }
        true
    }

    #[must_use]
    pub fn is_fired(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }

    /// Subscribers registered before `fire` receive exactly one message.
    #[must_use]
    pub fn subscribe(&self) -> ShutdownReceiver {
        self.tx.subscribe()
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fire_is_at_most_once() {
        let signal = ShutdownSignal::new();
        assert!(!signal.is_fired());
        assert!(signal.fire());
        assert!(!signal.fire());
        assert!(signal.is_fired());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn subscriber_sees_exactly_one_message() -> Result<(), String> {
        let signal = ShutdownSignal::new();
        let mut rx = signal.subscribe();
        assert!(signal.fire());
        assert!(!signal.fire());
        rx.recv()
            .await
            .map_err(|err| format!("recv failed: {}", err))?;
        assert!(rx.try_recv().is_err());
        Ok(())
    }
}
