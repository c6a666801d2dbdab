//! The bus: ordered message queues plus a persistent key/value store.
//!
//! Both halves of the adapter speak through this crate. The [`Bus`] trait
//! presents four queue surfaces (request, get-request/get-response,
//! notifications, view transitions) and the shared hash/key store holding
//! the id-translation tables and counters. Delivery is at-least-once and
//! in-order per queue.
//!
//! Two implementations exist: [`MemoryBus`] for in-process wiring and
//! tests, and [`RedisBus`] backed by a Redis server for the split-process
//! deployment.

mod memory;
mod message;
pub mod ops;
mod redis_backend;
pub mod store;

pub use memory::MemoryBus;
pub use message::{BusMessage, FieldValue};
pub use redis_backend::RedisBus;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors from the transport layer.
#[derive(Debug, Error)]
pub enum BusError {
    #[error("bus backend error: {0}")]
    Backend(String),

    #[error("bus message encoding error: {0}")]
    Encoding(String),
}

pub type BusResult<T> = Result<T, BusError>;

/// The named queues of the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BusQueue {
    /// Mutation stream, library → daemon.
    AsicState,
    /// Get requests, library → daemon.
    GetRequest,
    /// Get responses, daemon → library.
    GetResponse,
    /// Asynchronous events, daemon → library.
    Notifications,
    /// View-transition requests, library → daemon.
    ViewRequest,
    /// View-transition replies, daemon → library.
    ViewResponse,
}

impl BusQueue {
    pub const ALL: [BusQueue; 6] = [
        BusQueue::AsicState,
        BusQueue::GetRequest,
        BusQueue::GetResponse,
        BusQueue::Notifications,
        BusQueue::ViewRequest,
        BusQueue::ViewResponse,
    ];

    /// Stable queue name, also used as the backing Redis key.
    pub const fn name(self) -> &'static str {
        match self {
            BusQueue::AsicState => "ASIC_STATE",
            BusQueue::GetRequest => "GETREQUEST",
            BusQueue::GetResponse => "GETRESPONSE",
            BusQueue::Notifications => "NOTIFICATIONS",
            BusQueue::ViewRequest => "NOTIFYSYNCDREQUEST",
            BusQueue::ViewResponse => "NOTIFYSYNCDRESPONSE",
        }
    }

    fn index(self) -> usize {
        match self {
            BusQueue::AsicState => 0,
            BusQueue::GetRequest => 1,
            BusQueue::GetResponse => 2,
            BusQueue::Notifications => 3,
            BusQueue::ViewRequest => 4,
            BusQueue::ViewResponse => 5,
        }
    }
}

/// Outcome of a multi-source wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selected {
    /// A queue became readable.
    Queue(BusQueue),
    /// The wake event fired.
    Event,
    /// The timeout elapsed with nothing readable.
    Timeout,
}

/// A cancellation token observable by [`Bus::select`] waiters.
///
/// Notification is level-triggered: once set, every subsequent select
/// returns [`Selected::Event`] until the flag is cleared.
#[derive(Debug, Clone, Default)]
pub struct WakeEvent {
    flag: Arc<AtomicBool>,
}

impl WakeEvent {
    pub fn new() -> Self {
        WakeEvent::default()
    }

    pub fn notify(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    pub fn clear(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// The transport contract.
///
/// Queue ordering is per-queue FIFO. `select` wakes when any of the given
/// queues is readable, when the event fires (checked with bounded latency),
/// or when the timeout elapses; `timeout: None` waits indefinitely.
pub trait Bus: Send + Sync {
    fn push(&self, queue: BusQueue, message: BusMessage) -> BusResult<()>;

    fn pop(&self, queue: BusQueue) -> BusResult<Option<BusMessage>>;

    fn select(
        &self,
        queues: &[BusQueue],
        event: Option<&WakeEvent>,
        timeout: Option<Duration>,
    ) -> BusResult<Selected>;

    // persistent store surface

    fn hset(&self, hash: &str, field: &str, value: &str) -> BusResult<()>;

    fn hget(&self, hash: &str, field: &str) -> BusResult<Option<String>>;

    fn hdel(&self, hash: &str, field: &str) -> BusResult<()>;

    fn hgetall(&self, hash: &str) -> BusResult<Vec<(String, String)>>;

    /// Atomically increments an integer key and returns the new value.
    fn incr(&self, key: &str) -> BusResult<u64>;

    fn get(&self, key: &str) -> BusResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> BusResult<()>;
}
