//! Countdown latch
//!
//! A counter that starts at N and is ticked down once per event; waiters
//! suspend until it reaches zero. Built on `tokio::sync::watch` so any number
//! of tasks can wait and late waiters observe an already-released latch
//! immediately.

use tokio::sync::watch;

/// Counting wait satisfied after a fixed number of ticks
#[derive(Debug)]
pub struct Countdown {
    remaining: watch::Sender<usize>,
}

impl Countdown {
    /// Create a latch that releases after `count` ticks
    pub fn new(count: usize) -> Self {
        let (tx, _) = watch::channel(count);
        Self { remaining: tx }
    }

    /// Record one event; saturates at zero
    pub fn tick(&self) {
        self.remaining.send_modify(|n| *n = n.saturating_sub(1));
    }

    /// Number of ticks still outstanding
    pub fn remaining(&self) -> usize {
        *self.remaining.borrow()
    }

    /// Whether the latch has released
    pub fn is_released(&self) -> bool {
        self.remaining() == 0
    }

    /// Suspend until the count reaches zero
    pub async fn wait(&self) {
        let mut rx = self.remaining.subscribe();
        while *rx.borrow_and_update() != 0 {
            if rx.changed().await.is_err() {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_released_after_count_ticks() {
        let latch = Countdown::new(2);
        assert_eq!(latch.remaining(), 2);

        latch.tick();
        assert!(!latch.is_released());

        latch.tick();
        assert!(latch.is_released());

        // Waiting on a released latch returns immediately
        latch.wait().await;
    }

    #[tokio::test]
    async fn test_tick_saturates() {
        let latch = Countdown::new(1);
        latch.tick();
        latch.tick();
        assert_eq!(latch.remaining(), 0);
    }

    #[tokio::test]
    async fn test_waiter_unblocks_on_release() {
        let latch = Arc::new(Countdown::new(3));

        let waiter = {
            let latch = Arc::clone(&latch);
            tokio::spawn(async move { latch.wait().await })
        };

        latch.tick();
        latch.tick();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!waiter.is_finished());

        latch.tick();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should unblock")
            .unwrap();
    }

    #[tokio::test]
    async fn test_multiple_waiters() {
        let latch = Arc::new(Countdown::new(1));

        let waiters: Vec<_> = (0..4)
            .map(|_| {
                let latch = Arc::clone(&latch);
                tokio::spawn(async move { latch.wait().await })
            })
            .collect();

        latch.tick();
        for waiter in waiters {
            tokio::time::timeout(Duration::from_secs(1), waiter)
                .await
                .expect("waiter should unblock")
                .unwrap();
        }
    }
}
