//! Async consumption of blocking streams
//!
//! Provides a `futures::Stream` over any of the blocking sequences. A
//! `spawn_blocking` worker pulls from the sequence and pushes into a
//! bounded channel. At most `buffer + 1` items are read ahead of the
//! consumer: a full channel plus the one the worker is blocked sending.
//!
//! ```ignore
//! use futures::StreamExt;
//!
//! let mut users = db.users().stream_async(16)?;
//! while let Some(user) = users.next().await {
//!     println!("{}", user?.name);
//! }
//! // Dropping `users` early stops the worker and releases its connection
//! ```

use crate::pagination::LazyPaginationStream;
use crate::scan::RowStream;
use crate::table::UserTable;
use futures::Stream;
use std::future::Future;
use std::pin::Pin;
use std::task::{ready, Context, Poll};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use trickle_core::{
    error::{Result, TrickleError},
    Connector, RowsOf, UserRecord,
};

/// Stream of items produced by a blocking sequence on a worker task
pub struct AsyncStream<T> {
    rx: mpsc::Receiver<Result<T>>,
    worker: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> AsyncStream<T> {
    /// Move `items` onto a blocking worker and stream its output
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn<I>(items: I, buffer: usize) -> Result<Self>
    where
        I: Iterator<Item = Result<T>> + Send + 'static,
    {
        let handle = ensure_runtime()?;

        let (tx, rx) = mpsc::channel(buffer.max(1));
        let worker = handle.spawn_blocking(move || {
            for item in items {
                if tx.blocking_send(item).is_err() {
                    tracing::trace!("async consumer dropped, stopping worker");
                    break;
                }
            }
        });

        Ok(Self {
            rx,
            worker: Some(worker),
        })
    }
}

fn ensure_runtime() -> Result<Handle> {
    Handle::try_current()
        .map_err(|_| TrickleError::InvalidState("async streams require a Tokio runtime".into()))
}

// Fields are never pinned structurally.
impl<T> Unpin for AsyncStream<T> {}

impl<T> Stream for AsyncStream<T> {
    type Item = Result<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        if let Some(item) = ready!(this.rx.poll_recv(cx)) {
            return Poll::Ready(Some(item));
        }

        // Channel closed: the worker is done. Surface a panic instead of
        // letting it look like a clean end of stream.
        let Some(worker) = this.worker.as_mut() else {
            return Poll::Ready(None);
        };
        let joined = ready!(Pin::new(worker).poll(cx));
        this.worker = None;
        match joined {
            Ok(()) => Poll::Ready(None),
            Err(e) => Poll::Ready(Some(Err(TrickleError::Internal(format!(
                "stream worker failed: {}",
                e
            ))))),
        }
    }
}

impl<C> UserTable<C>
where
    C: Connector + 'static,
    RowsOf<C>: 'static,
{
    /// Async version of [`UserTable::stream`]
    ///
    /// The connection is opened before this returns, so connection failures
    /// are reported here rather than from the stream.
    pub fn stream_async(&self, buffer: usize) -> Result<AsyncStream<UserRecord>> {
        ensure_runtime()?;
        let rows: RowStream<RowsOf<C>> = self.stream()?;
        AsyncStream::spawn(rows, buffer)
    }

    /// Async version of [`UserTable::lazy_paginate`]
    pub fn lazy_paginate_async(
        &self,
        page_size: usize,
        buffer: usize,
    ) -> Result<AsyncStream<Vec<UserRecord>>> {
        let pages: LazyPaginationStream<C> = self.lazy_paginate(page_size)?;
        AsyncStream::spawn(pages, buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryConnector;
    use futures::StreamExt;
    use std::time::Duration;

    #[tokio::test]
    async fn test_stream_async_yields_all_rows() {
        let connector = MemoryConnector::with_ages(&[67, 119, 49, 22, 102]);
        let ages: Vec<u32> = connector
            .table()
            .stream_async(2)
            .unwrap()
            .map(|u| u.unwrap().age)
            .collect()
            .await;

        assert_eq!(ages, vec![67, 119, 49, 22, 102]);
    }

    #[tokio::test]
    async fn test_dropped_async_stream_releases_connection() {
        let ages: Vec<u32> = (0..100).collect();
        let connector = MemoryConnector::with_ages(&ages);

        let mut users = connector.table().stream_async(1).unwrap();
        users.next().await.unwrap().unwrap();
        drop(users);

        for _ in 0..200 {
            if connector.open_connections() == 0 {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("connection still open after async stream was dropped");
    }

    #[tokio::test]
    async fn test_async_connection_failure_is_immediate() {
        let connector = MemoryConnector::with_ages(&[1]).refusing();
        let err = connector.table().stream_async(4).err().unwrap();
        assert!(err.is_connection());
    }

    #[tokio::test]
    async fn test_paginate_async() {
        let connector = MemoryConnector::with_ages(&[1, 2, 3, 4, 5]);
        let sizes: Vec<usize> = connector
            .table()
            .lazy_paginate_async(2, 1)
            .unwrap()
            .map(|p| p.unwrap().len())
            .collect()
            .await;
        assert_eq!(sizes, vec![2, 2, 1]);
    }

    #[tokio::test]
    async fn test_read_ahead_is_buffer_plus_one() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let pulled = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&pulled);
        let items = std::iter::from_fn(move || {
            Some(Ok::<_, TrickleError>(counter.fetch_add(1, Ordering::SeqCst)))
        });

        let mut stream = AsyncStream::spawn(items, 1).unwrap();
        for _ in 0..200 {
            if pulled.load(Ordering::SeqCst) >= 2 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(pulled.load(Ordering::SeqCst), 2);

        assert_eq!(stream.next().await.unwrap().unwrap(), 0);
        drop(stream);
    }

    #[test]
    fn test_requires_runtime() {
        let connector = MemoryConnector::with_ages(&[1]);
        let err = connector.table().stream_async(1).err().unwrap();
        assert!(matches!(err, TrickleError::InvalidState(_)));
    }
}
