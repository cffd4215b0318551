/// Timestamped TTL cache with an injectable clock

use std::hash::Hash;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

pub struct TtlCache<K, V> {
    entries: DashMap<K, (V, DateTime<Utc>)>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            clock,
        }
    }

    /// Returns the cached value while it is fresh. Stale entries are evicted.
    pub fn get(&self, key: &K) -> Option<V> {
        let now = self.clock.now();
        if let Some(entry) = self.entries.get(key) {
            let (value, inserted_at) = entry.value();
            if is_fresh(*inserted_at, self.ttl, now) {
                return Some(value.clone());
            }
        } else {
            return None;
        }

        // another caller may have refreshed the entry in between
        let ttl = self.ttl;
        self.entries
            .remove_if(key, |_, (_, inserted_at)| !is_fresh(*inserted_at, ttl, now));
        None
    }

    pub fn insert(&self, key: K, value: V) {
        self.entries.insert(key, (value, self.clock.now()));
    }

    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries
            .retain(|_, (_, inserted_at)| is_fresh(*inserted_at, self.ttl, now));
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// An expiry past the representable range never arrives
fn is_fresh(inserted_at: DateTime<Utc>, ttl: Duration, now: DateTime<Utc>) -> bool {
    inserted_at
        .checked_add_signed(ttl)
        .map_or(true, |expires_at| expires_at > now)
}
