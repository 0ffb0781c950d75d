//! Pool and buffer implementation

use std::ops::Deref;
use std::sync::{Arc, Mutex, MutexGuard};

use bytes::BytesMut;
use tokio::sync::Semaphore;

struct PoolInner {
    /// One permit per free buffer
    permits: Semaphore,
    free: Mutex<Vec<BytesMut>>,
    capacity: usize,
}

impl PoolInner {
    fn free_list(&self) -> MutexGuard<'_, Vec<BytesMut>> {
        // The guard only wraps push/pop, so a poisoned lock still holds a
        // consistent list.
        self.free.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Fixed-capacity pool of transmit buffers
///
/// Cloning is cheap and shares the same underlying pool.
#[derive(Clone)]
pub struct TxBufferPool {
    inner: Arc<PoolInner>,
}

impl TxBufferPool {
    /// Create a pool of `capacity` buffers, each pre-sized to `buffer_size`
    pub fn new(capacity: usize, buffer_size: usize) -> Self {
        let free = (0..capacity)
            .map(|_| BytesMut::with_capacity(buffer_size))
            .collect();

        Self {
            inner: Arc::new(PoolInner {
                permits: Semaphore::new(capacity),
                free: Mutex::new(free),
                capacity,
            }),
        }
    }

    /// Take a buffer, suspending until one is free
    ///
    /// Concurrent callers are woken one per released buffer; a permit is
    /// never granted without a buffer on the free list.
    pub async fn acquire(&self) -> TxBuffer {
        let permit = self
            .inner
            .permits
            .acquire()
            .await
            .expect("pool semaphore is never closed");
        permit.forget();

        let mut buf = self
            .inner
            .free_list()
            .pop()
            .expect("permit granted without a free buffer");
        buf.clear();

        TxBuffer {
            buf: Some(buf),
            pool: Arc::clone(&self.inner),
        }
    }

    /// Total number of buffers owned by the pool
    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    /// Number of buffers currently free
    pub fn available(&self) -> usize {
        self.inner.permits.available_permits()
    }
}

/// A transmit buffer on loan from the pool
///
/// The buffer is a plain byte sink; the pool never interprets its contents.
/// Dropping the guard returns the buffer, whether the send was confirmed,
/// rejected, or abandoned.
pub struct TxBuffer {
    buf: Option<BytesMut>,
    pool: Arc<PoolInner>,
}

impl TxBuffer {
    /// Replace the buffer contents with `payload`
    pub fn fill(&mut self, payload: &[u8]) {
        let buf = self.buf.as_mut().expect("buffer taken");
        buf.clear();
        buf.extend_from_slice(payload);
    }

    /// Current payload length in bytes
    pub fn len(&self) -> usize {
        self.buf.as_ref().map_or(0, |b| b.len())
    }

    /// Whether the buffer holds no payload
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Deref for TxBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.buf.as_deref().unwrap_or(&[])
    }
}

impl std::fmt::Debug for TxBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TxBuffer").field("len", &self.len()).finish()
    }
}

impl Drop for TxBuffer {
    fn drop(&mut self) {
        if let Some(buf) = self.buf.take() {
            self.pool.free_list().push(buf);
            self.pool.permits.add_permits(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_acquire_up_to_capacity() {
        let pool = TxBufferPool::new(3, 64);

        let a = pool.acquire().await;
        let b = pool.acquire().await;
        let c = pool.acquire().await;
        assert_eq!(pool.available(), 0);

        drop(a);
        drop(b);
        drop(c);
        assert_eq!(pool.available(), 3);
    }

    #[tokio::test]
    async fn test_acquire_blocks_until_release() {
        let pool = TxBufferPool::new(1, 64);

        let held = pool.acquire().await;

        // Second acquire must not complete while the buffer is held
        let mut pending = tokio_test::task::spawn(pool.acquire());
        tokio_test::assert_pending!(pending.poll());

        drop(held);
        let reacquired = tokio_test::assert_ready!(pending.poll());
        assert_eq!(pool.available(), 0);
        drop(reacquired);
    }

    #[tokio::test]
    async fn test_release_wakes_exactly_one() {
        let pool = TxBufferPool::new(1, 64);

        let held = pool.acquire().await;

        let mut first = tokio_test::task::spawn(pool.acquire());
        let mut second = tokio_test::task::spawn(pool.acquire());
        tokio_test::assert_pending!(first.poll());
        tokio_test::assert_pending!(second.poll());

        // One release, one wake
        drop(held);
        let woken = tokio_test::assert_ready!(first.poll());
        tokio_test::assert_pending!(second.poll());

        drop(woken);
        let _ = tokio_test::assert_ready!(second.poll());
    }

    #[tokio::test]
    async fn test_fill_and_reuse() {
        let pool = TxBufferPool::new(1, 8);

        let mut buf = pool.acquire().await;
        buf.fill(&[1, 2, 3]);
        assert_eq!(&buf[..], &[1, 2, 3]);
        assert_eq!(buf.len(), 3);
        drop(buf);

        // A recycled buffer comes back empty
        let buf = pool.acquire().await;
        assert!(buf.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_acquire_release() {
        let pool = TxBufferPool::new(4, 32);

        let tasks: Vec<_> = (0..16)
            .map(|i| {
                let pool = pool.clone();
                tokio::spawn(async move {
                    for _ in 0..50 {
                        let mut buf = pool.acquire().await;
                        buf.fill(&[i as u8]);
                        tokio::task::yield_now().await;
                    }
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap();
        }

        // Every buffer made it back
        assert_eq!(pool.available(), 4);
    }
}
