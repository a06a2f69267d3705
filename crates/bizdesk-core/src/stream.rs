// ── Reactive slice subscriptions ──
//
// Consumers either poll `latest()` or await `changed()`; `into_stream`
// adapts the subscription for `StreamExt` combinators.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::store::ListState;

/// A subscription to one slice's state.
pub struct SliceStream<R: Clone + Send + Sync + 'static> {
    current: Arc<ListState<R>>,
    receiver: watch::Receiver<Arc<ListState<R>>>,
}

impl<R: Clone + Send + Sync + 'static> SliceStream<R> {
    pub(crate) fn new(receiver: watch::Receiver<Arc<ListState<R>>>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// The state captured at creation time or at the last `changed()`.
    pub fn current(&self) -> &Arc<ListState<R>> {
        &self.current
    }

    pub fn latest(&self) -> Arc<ListState<R>> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change. Returns `None` once the slice is dropped.
    pub async fn changed(&mut self) -> Option<Arc<ListState<R>>> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }

    pub fn into_stream(self) -> SliceWatchStream<R> {
        SliceWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter yielding a snapshot per slice mutation.
pub struct SliceWatchStream<R: Clone + Send + Sync + 'static> {
    inner: WatchStream<Arc<ListState<R>>>,
}

impl<R: Clone + Send + Sync + 'static> Stream for SliceWatchStream<R> {
    type Item = Arc<ListState<R>>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
