//! Per-conversation aggregation buffer and debounce scheduler.
//!
//! Every fragment restarts the conversation's quiet-period timer. When a
//! timer survives the full delay it takes the buffered fragments and hands
//! them to the flush sink as one batch.
//!
//! Each timer carries a generation number. A timer only takes the buffer if
//! its generation is still the current one, so a superseded timer that was
//! already past its sleep when it got aborted never flushes.
//!
//! A flush is counted as in flight from just before its buffer is taken until
//! the sink returns. `flush_all` waits for that count to reach zero, so no
//! taken buffer is left unanswered on shutdown.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::conversation::ids::ConversationId;

/// Boxed future type for flush sink operations.
pub type FlushFuture<'a> = Pin<Box<dyn Future<Output = ()> + Send + 'a>>;

/// Consumer of flushed batches.
pub trait FlushSink: Send + Sync {
    /// Process one batch; failures must be handled inside.
    fn flush(&self, batch: FlushBatch) -> FlushFuture<'_>;
}

/// A conversation's fragments, taken out of the buffer in arrival order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlushBatch {
    /// Conversation the fragments belong to.
    pub conversation: ConversationId,
    /// Raw fragments, oldest first.
    pub fragments: Vec<String>,
}

impl FlushBatch {
    /// Fragments joined with single spaces.
    #[must_use]
    pub fn utterance(&self) -> String {
        self.fragments.join(" ")
    }
}

#[derive(Default)]
struct PendingFlush {
    fragments: Vec<String>,
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

struct DebouncerInner {
    delay: Duration,
    pending: DashMap<ConversationId, PendingFlush>,
    next_generation: AtomicU64,
    in_flight: AtomicUsize,
    idle: Notify,
    sink: Arc<dyn FlushSink>,
}

/// Marks one flush as in flight until dropped.
struct InFlightGuard<'a> {
    inner: &'a DebouncerInner,
}

impl<'a> InFlightGuard<'a> {
    fn enter(inner: &'a DebouncerInner) -> Self {
        inner.in_flight.fetch_add(1, Ordering::SeqCst);
        Self { inner }
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if self.inner.in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.inner.idle.notify_waiters();
        }
    }
}

impl DebouncerInner {
    /// Remove a conversation's entry. With `generation` set, only if that
    /// timer is still the live one.
    fn take(&self, conversation: &ConversationId, generation: Option<u64>) -> Option<FlushBatch> {
        let removed = match generation {
            Some(current) => self
                .pending
                .remove_if(conversation, |_, pending| pending.generation == current),
            None => self.pending.remove(conversation),
        };

        removed.map(|(conversation, pending)| {
            if let (None, Some(timer)) = (generation, pending.timer) {
                timer.abort();
            }
            FlushBatch {
                conversation,
                fragments: pending.fragments,
            }
        })
    }
}

/// Debounced aggregation of fragments, one cycle per conversation.
#[derive(Clone)]
pub struct Debouncer {
    inner: Arc<DebouncerInner>,
}

impl Debouncer {
    /// Create a debouncer that hands finished batches to `sink`.
    #[must_use]
    pub fn new(delay: Duration, sink: Arc<dyn FlushSink>) -> Self {
        Self {
            inner: Arc::new(DebouncerInner {
                delay,
                pending: DashMap::new(),
                next_generation: AtomicU64::new(1),
                in_flight: AtomicUsize::new(0),
                idle: Notify::new(),
                sink,
            }),
        }
    }

    /// Buffer a fragment and restart the conversation's timer.
    ///
    /// Must be called from within a tokio runtime. Returns the number of
    /// fragments now buffered for the conversation.
    pub fn on_fragment(&self, conversation: ConversationId, text: impl Into<String>) -> usize {
        let generation = self.inner.next_generation.fetch_add(1, Ordering::Relaxed);

        // The entry guard is held across cancel + install; the new timer
        // cannot observe the entry until the guard is released.
        let mut pending = self.inner.pending.entry(conversation.clone()).or_default();
        if let Some(previous) = pending.timer.take() {
            previous.abort();
        }
        pending.fragments.push(text.into());
        pending.generation = generation;
        pending.timer = Some(self.spawn_timer(conversation.clone(), generation));
        let buffered = pending.fragments.len();
        drop(pending);

        debug!(conversation = %conversation, buffered, generation, "Fragment buffered");
        buffered
    }

    /// Flush a conversation immediately, cancelling its timer.
    ///
    /// Returns `false` if nothing was buffered.
    pub async fn flush_now(&self, conversation: &ConversationId) -> bool {
        let _guard = InFlightGuard::enter(&self.inner);
        match self.inner.take(conversation, None) {
            Some(batch) => {
                self.inner.sink.flush(batch).await;
                true
            }
            None => false,
        }
    }

    /// Flush every buffered conversation immediately, then wait for flushes
    /// already started by timers. Returns how many buffers this call flushed.
    pub async fn flush_all(&self) -> usize {
        let conversations: Vec<ConversationId> = self
            .inner
            .pending
            .iter()
            .map(|entry| entry.key().clone())
            .collect();

        let mut flushed = 0;
        for conversation in conversations {
            if self.flush_now(&conversation).await {
                flushed += 1;
            }
        }
        self.wait_idle().await;
        flushed
    }

    /// Wait until no flush is in flight.
    pub async fn wait_idle(&self) {
        loop {
            let idle = self.inner.idle.notified();
            if self.inner.in_flight.load(Ordering::SeqCst) == 0 {
                return;
            }
            idle.await;
        }
    }

    /// Number of flushes currently waiting on the sink.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.inner.in_flight.load(Ordering::SeqCst)
    }

    /// Number of conversations with a buffer awaiting flush.
    #[must_use]
    pub fn pending_conversations(&self) -> usize {
        self.inner.pending.len()
    }

    /// Number of fragments buffered for `conversation`.
    #[must_use]
    pub fn buffered(&self, conversation: &ConversationId) -> usize {
        self.inner
            .pending
            .get(conversation)
            .map_or(0, |pending| pending.fragments.len())
    }

    fn spawn_timer(&self, conversation: ConversationId, generation: u64) -> JoinHandle<()> {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(inner.delay).await;
            // Entered before the take so a concurrent drain that finds the
            // entry gone still sees this flush.
            let _guard = InFlightGuard::enter(&inner);
            if let Some(batch) = inner.take(&conversation, Some(generation)) {
                debug!(
                    conversation = %conversation,
                    fragments = batch.fragments.len(),
                    "Quiet period elapsed"
                );
                inner.sink.flush(batch).await;
            }
        })
    }
}
