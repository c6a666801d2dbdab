//! In-process bus backed by mutex-guarded queues and maps.
//!
//! Used by tests and by single-process deployments where the library and
//! the daemon loop share an address space. Pushes wake selectors through a
//! condvar; wake events are observed with bounded latency (one poll slice).

use crate::{Bus, BusMessage, BusQueue, BusResult, Selected, WakeEvent};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

/// Maximum time a selector waits before re-checking its wake event.
const EVENT_POLL_SLICE: Duration = Duration::from_millis(50);

#[derive(Default)]
struct Inner {
    queues: [VecDeque<BusMessage>; 6],
    hashes: HashMap<String, BTreeMap<String, String>>,
    keys: HashMap<String, String>,
}

/// The in-memory [`Bus`] implementation.
#[derive(Default)]
pub struct MemoryBus {
    inner: Mutex<Inner>,
    readable: Condvar,
}

impl MemoryBus {
    pub fn new() -> Self {
        MemoryBus::default()
    }
}

impl Bus for MemoryBus {
    fn push(&self, queue: BusQueue, message: BusMessage) -> BusResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.queues[queue.index()].push_back(message);
        drop(inner);
        self.readable.notify_all();
        Ok(())
    }

    fn pop(&self, queue: BusQueue) -> BusResult<Option<BusMessage>> {
        let mut inner = self.inner.lock().unwrap();
        Ok(inner.queues[queue.index()].pop_front())
    }

    fn select(
        &self,
        queues: &[BusQueue],
        event: Option<&WakeEvent>,
        timeout: Option<Duration>,
    ) -> BusResult<Selected> {
        let deadline = timeout.map(|t| Instant::now() + t);
        let mut inner = self.inner.lock().unwrap();
        loop {
            if let Some(event) = event {
                if event.is_set() {
                    return Ok(Selected::Event);
                }
            }
            if let Some(queue) = queues
                .iter()
                .copied()
                .find(|q| !inner.queues[q.index()].is_empty())
            {
                return Ok(Selected::Queue(queue));
            }

            let remaining = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Ok(Selected::Timeout);
                    }
                    Some(deadline - now)
                }
                None => None,
            };
            // cap the wait so a fired wake event is noticed promptly
            let slice = match (remaining, event.is_some()) {
                (Some(r), true) => r.min(EVENT_POLL_SLICE),
                (Some(r), false) => r,
                (None, true) => EVENT_POLL_SLICE,
                (None, false) => Duration::from_secs(3600),
            };
            let (guard, _timed_out) = self.readable.wait_timeout(inner, slice).unwrap();
            inner = guard;
        }
    }

    fn hset(&self, hash: &str, field: &str, value: &str) -> BusResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .hashes
            .entry(hash.to_string())
            .or_default()
            .insert(field.to_string(), value.to_string());
        Ok(())
    }

    fn hget(&self, hash: &str, field: &str) -> BusResult<Option<String>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .hashes
            .get(hash)
            .and_then(|h| h.get(field))
            .cloned())
    }

    fn hdel(&self, hash: &str, field: &str) -> BusResult<()> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(h) = inner.hashes.get_mut(hash) {
            h.remove(field);
        }
        Ok(())
    }

    fn hgetall(&self, hash: &str) -> BusResult<Vec<(String, String)>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .hashes
            .get(hash)
            .map(|h| h.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default())
    }

    fn incr(&self, key: &str) -> BusResult<u64> {
        let mut inner = self.inner.lock().unwrap();
        let entry = inner.keys.entry(key.to_string()).or_insert_with(|| "0".to_string());
        let next = entry
            .parse::<u64>()
            .map_err(|e| crate::BusError::Backend(e.to_string()))?
            + 1;
        *entry = next.to_string();
        Ok(next)
    }

    fn get(&self, key: &str) -> BusResult<Option<String>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.keys.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> BusResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.keys.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn msg(op: &str) -> BusMessage {
        BusMessage::new("k", op, vec![])
    }

    #[test]
    fn test_queue_fifo() {
        let bus = MemoryBus::new();
        bus.push(BusQueue::AsicState, msg("a")).unwrap();
        bus.push(BusQueue::AsicState, msg("b")).unwrap();
        assert_eq!(bus.pop(BusQueue::AsicState).unwrap().unwrap().op, "a");
        assert_eq!(bus.pop(BusQueue::AsicState).unwrap().unwrap().op, "b");
        assert_eq!(bus.pop(BusQueue::AsicState).unwrap(), None);
    }

    #[test]
    fn test_queues_are_independent() {
        let bus = MemoryBus::new();
        bus.push(BusQueue::GetRequest, msg("g")).unwrap();
        assert_eq!(bus.pop(BusQueue::AsicState).unwrap(), None);
        assert_eq!(bus.pop(BusQueue::GetRequest).unwrap().unwrap().op, "g");
    }

    #[test]
    fn test_select_ready_queue() {
        let bus = MemoryBus::new();
        bus.push(BusQueue::GetResponse, msg("r")).unwrap();
        let selected = bus
            .select(&[BusQueue::AsicState, BusQueue::GetResponse], None, None)
            .unwrap();
        assert_eq!(selected, Selected::Queue(BusQueue::GetResponse));
    }

    #[test]
    fn test_select_timeout() {
        let bus = MemoryBus::new();
        let selected = bus
            .select(
                &[BusQueue::AsicState],
                None,
                Some(Duration::from_millis(20)),
            )
            .unwrap();
        assert_eq!(selected, Selected::Timeout);
    }

    #[test]
    fn test_select_wakes_on_push() {
        let bus = Arc::new(MemoryBus::new());
        let pusher = {
            let bus = Arc::clone(&bus);
            std::thread::spawn(move || {
                std::thread::sleep(Duration::from_millis(10));
                bus.push(BusQueue::AsicState, msg("x")).unwrap();
            })
        };
        let selected = bus
            .select(&[BusQueue::AsicState], None, Some(Duration::from_secs(5)))
            .unwrap();
        assert_eq!(selected, Selected::Queue(BusQueue::AsicState));
        pusher.join().unwrap();
    }

    #[test]
    fn test_select_observes_wake_event() {
        let bus = Arc::new(MemoryBus::new());
        let event = WakeEvent::new();
        let notifier = {
            let event = event.clone();
            std::thread::spawn(move || {
                std::thread::sleep(Duration::from_millis(10));
                event.notify();
            })
        };
        let selected = bus
            .select(
                &[BusQueue::Notifications],
                Some(&event),
                Some(Duration::from_secs(5)),
            )
            .unwrap();
        assert_eq!(selected, Selected::Event);
        notifier.join().unwrap();
    }

    #[test]
    fn test_store_operations() {
        let bus = MemoryBus::new();
        bus.hset("H", "f", "v").unwrap();
        assert_eq!(bus.hget("H", "f").unwrap(), Some("v".to_string()));
        assert_eq!(bus.hget("H", "missing").unwrap(), None);
        assert_eq!(bus.hgetall("H").unwrap(), vec![("f".to_string(), "v".to_string())]);
        bus.hdel("H", "f").unwrap();
        assert_eq!(bus.hget("H", "f").unwrap(), None);

        assert_eq!(bus.incr("C").unwrap(), 1);
        assert_eq!(bus.incr("C").unwrap(), 2);

        bus.set("K", "x").unwrap();
        assert_eq!(bus.get("K").unwrap(), Some("x".to_string()));
    }
}
