//! Redis-backed bus for the split-process deployment.
//!
//! Queues are Redis lists of JSON-encoded [`BusMessage`]s; the persistent
//! store maps directly onto Redis hashes and keys. `select` uses `BLPOP`
//! across the queue keys in one-second slices so wake events are observed
//! with bounded latency; a message consumed by the blocking pop is buffered
//! and handed back by the next `pop` on that queue.

use crate::{Bus, BusError, BusMessage, BusQueue, BusResult, Selected, WakeEvent};
use redis::Commands;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::info;

/// Maximum time one blocking pop holds the connection before the event
/// flag is re-checked.
const BLOCK_SLICE: Duration = Duration::from_secs(1);

/// The Redis-backed [`Bus`] implementation.
pub struct RedisBus {
    connection: Mutex<redis::Connection>,
    /// Messages consumed by `select`'s blocking pop, pending delivery.
    buffered: Mutex<HashMap<BusQueue, VecDeque<BusMessage>>>,
}

impl RedisBus {
    /// Connects to the Redis server at `url` (e.g. `redis://127.0.0.1:6379/1`).
    pub fn connect(url: &str) -> BusResult<Self> {
        let client = redis::Client::open(url).map_err(|e| BusError::Backend(e.to_string()))?;
        let connection = client
            .get_connection()
            .map_err(|e| BusError::Backend(e.to_string()))?;
        info!(url, "connected to redis bus");
        Ok(RedisBus {
            connection: Mutex::new(connection),
            buffered: Mutex::new(HashMap::new()),
        })
    }

    fn queue_for_key(key: &str) -> Option<BusQueue> {
        BusQueue::ALL.iter().copied().find(|q| q.name() == key)
    }

    fn decode(text: &str) -> BusResult<BusMessage> {
        serde_json::from_str(text).map_err(|e| BusError::Encoding(e.to_string()))
    }
}

impl Bus for RedisBus {
    fn push(&self, queue: BusQueue, message: BusMessage) -> BusResult<()> {
        let text = serde_json::to_string(&message).map_err(|e| BusError::Encoding(e.to_string()))?;
        let mut conn = self.connection.lock().unwrap();
        conn.rpush::<_, _, ()>(queue.name(), text)
            .map_err(|e| BusError::Backend(e.to_string()))
    }

    fn pop(&self, queue: BusQueue) -> BusResult<Option<BusMessage>> {
        if let Some(message) = self
            .buffered
            .lock()
            .unwrap()
            .get_mut(&queue)
            .and_then(|q| q.pop_front())
        {
            return Ok(Some(message));
        }
        let mut conn = self.connection.lock().unwrap();
        let text: Option<String> = conn
            .lpop(queue.name(), None)
            .map_err(|e| BusError::Backend(e.to_string()))?;
        text.map(|t| Self::decode(&t)).transpose()
    }

    fn select(
        &self,
        queues: &[BusQueue],
        event: Option<&WakeEvent>,
        timeout: Option<Duration>,
    ) -> BusResult<Selected> {
        let deadline = timeout.map(|t| Instant::now() + t);
        let keys: Vec<&str> = queues.iter().map(|q| q.name()).collect();
        loop {
            if let Some(event) = event {
                if event.is_set() {
                    return Ok(Selected::Event);
                }
            }
            {
                let buffered = self.buffered.lock().unwrap();
                if let Some(queue) = queues
                    .iter()
                    .copied()
                    .find(|q| buffered.get(q).is_some_and(|b| !b.is_empty()))
                {
                    return Ok(Selected::Queue(queue));
                }
            }

            let slice = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Ok(Selected::Timeout);
                    }
                    (deadline - now).min(BLOCK_SLICE)
                }
                None => BLOCK_SLICE,
            };

            let popped: Option<(String, String)> = {
                let mut conn = self.connection.lock().unwrap();
                conn.blpop(&keys, slice.as_secs_f64())
                    .map_err(|e| BusError::Backend(e.to_string()))?
            };
            if let Some((key, text)) = popped {
                let queue = Self::queue_for_key(&key)
                    .ok_or_else(|| BusError::Backend(format!("unexpected queue key {key}")))?;
                let message = Self::decode(&text)?;
                self.buffered
                    .lock()
                    .unwrap()
                    .entry(queue)
                    .or_default()
                    .push_back(message);
                return Ok(Selected::Queue(queue));
            }
        }
    }

    fn hset(&self, hash: &str, field: &str, value: &str) -> BusResult<()> {
        let mut conn = self.connection.lock().unwrap();
        conn.hset::<_, _, _, ()>(hash, field, value)
            .map_err(|e| BusError::Backend(e.to_string()))
    }

    fn hget(&self, hash: &str, field: &str) -> BusResult<Option<String>> {
        let mut conn = self.connection.lock().unwrap();
        conn.hget(hash, field)
            .map_err(|e| BusError::Backend(e.to_string()))
    }

    fn hdel(&self, hash: &str, field: &str) -> BusResult<()> {
        let mut conn = self.connection.lock().unwrap();
        conn.hdel::<_, _, ()>(hash, field)
            .map_err(|e| BusError::Backend(e.to_string()))
    }

    fn hgetall(&self, hash: &str) -> BusResult<Vec<(String, String)>> {
        let mut conn = self.connection.lock().unwrap();
        conn.hgetall(hash)
            .map_err(|e| BusError::Backend(e.to_string()))
    }

    fn incr(&self, key: &str) -> BusResult<u64> {
        let mut conn = self.connection.lock().unwrap();
        conn.incr(key, 1u64)
            .map_err(|e| BusError::Backend(e.to_string()))
    }

    fn get(&self, key: &str) -> BusResult<Option<String>> {
        let mut conn = self.connection.lock().unwrap();
        conn.get(key).map_err(|e| BusError::Backend(e.to_string()))
    }

    fn set(&self, key: &str, value: &str) -> BusResult<()> {
        let mut conn = self.connection.lock().unwrap();
        conn.set::<_, _, ()>(key, value)
            .map_err(|e| BusError::Backend(e.to_string()))
    }
}
