use tokio::sync::watch;

/// Latch is a one-shot broadcast signal. It is set at most once, every
/// waiter parked in [`Latch::wait`] is released when it is, and a wait that
/// starts after the fact returns immediately.
#[derive(Debug)]
pub(crate) struct Latch {
    tx: watch::Sender<bool>,
}

impl Default for Latch {
    fn default() -> Self {
        Self::new()
    }
}

impl Latch {
    pub(crate) fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Latch { tx }
    }

    /// set fires the latch. Returns false if it had already been fired.
    pub(crate) fn set(&self) -> bool {
        self.tx.send_if_modified(|fired| {
            if *fired {
                false
            } else {
                *fired = true;
                true
            }
        })
    }

    pub(crate) fn is_set(&self) -> bool {
        *self.tx.borrow()
    }

    pub(crate) async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        // the sender lives as long as self, so this can not observe a close
        let _ = rx.wait_for(|fired| *fired).await;
    }
}
