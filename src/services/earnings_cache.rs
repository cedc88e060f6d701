//! Time-boxed memoization for earnings breakdowns.
//!
//! Keyed by (user, period start). Entries computed while an interval was
//! still running expire in 30 seconds (those figures move every second);
//! settled entries live 5 minutes. Overflow evicts in insertion order, and a
//! background sweep drops expired entries even for users who never return.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::NaiveDate;
use tokio::time::{Instant, MissedTickBehavior};
use uuid::Uuid;

use crate::database::models::EarningsBreakdown;

pub const OPEN_INTERVAL_TTL: Duration = Duration::from_secs(30);
pub const SETTLED_TTL: Duration = Duration::from_secs(300);

type CacheKey = (Uuid, NaiveDate);

struct CacheEntry {
    breakdown: EarningsBreakdown,
    expires_at: Instant,
}

#[derive(Default)]
struct CacheInner {
    entries: HashMap<CacheKey, CacheEntry>,
    // Insertion order for eviction. Not an LRU: entries are cheap to
    // recompute, so plain arrival order keeps this simple.
    insertion_order: VecDeque<CacheKey>,
}

pub struct EarningsCache {
    inner: Arc<Mutex<CacheInner>>,
    capacity: usize,
    sweeper: tokio::task::JoinHandle<()>,
}

impl EarningsCache {
    /// Must be called from within a tokio runtime; the sweep task starts
    /// immediately and runs until `shutdown` (or drop).
    pub fn new(capacity: usize, sweep_every: Duration) -> Self {
        let inner = Arc::new(Mutex::new(CacheInner::default()));
        let sweep_target = Arc::clone(&inner);
        let sweeper = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(sweep_every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let now = Instant::now();
                let mut inner = sweep_target.lock().unwrap();
                let before = inner.entries.len();
                let CacheInner {
                    entries,
                    insertion_order,
                } = &mut *inner;
                entries.retain(|_, entry| entry.expires_at > now);
                insertion_order.retain(|key| entries.contains_key(key));
                let swept = before - entries.len();
                if swept > 0 {
                    log::debug!("earnings cache sweep removed {} expired entries", swept);
                }
            }
        });
        Self {
            inner,
            capacity: capacity.max(1),
            sweeper,
        }
    }

    pub fn get(&self, user_id: Uuid, period_start: NaiveDate) -> Option<EarningsBreakdown> {
        let key = (user_id, period_start);
        let mut inner = self.inner.lock().unwrap();
        let fresh = match inner.entries.get(&key) {
            Some(entry) => entry.expires_at > Instant::now(),
            None => return None,
        };
        if !fresh {
            inner.entries.remove(&key);
            inner.insertion_order.retain(|k| k != &key);
            return None;
        }
        inner.entries.get(&key).map(|e| e.breakdown.clone())
    }

    pub fn put(&self, breakdown: &EarningsBreakdown) {
        let ttl = if breakdown.has_open_interval {
            OPEN_INTERVAL_TTL
        } else {
            SETTLED_TTL
        };
        let key = (breakdown.user_id, breakdown.period_start);
        let entry = CacheEntry {
            breakdown: breakdown.clone(),
            expires_at: Instant::now() + ttl,
        };
        let mut inner = self.inner.lock().unwrap();
        if inner.entries.insert(key, entry).is_some() {
            inner.insertion_order.retain(|k| k != &key);
        }
        inner.insertion_order.push_back(key);
        while inner.entries.len() > self.capacity {
            let Some(oldest) = inner.insertion_order.pop_front() else {
                break;
            };
            inner.entries.remove(&oldest);
        }
    }

    /// Drop every entry for one user, or the whole cache when `None`.
    pub fn invalidate(&self, user_id: Option<Uuid>) {
        let mut inner = self.inner.lock().unwrap();
        match user_id {
            Some(user_id) => {
                let CacheInner {
                    entries,
                    insertion_order,
                } = &mut *inner;
                entries.retain(|(owner, _), _| *owner != user_id);
                insertion_order.retain(|key| entries.contains_key(key));
            }
            None => {
                inner.entries.clear();
                inner.insertion_order.clear();
            }
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn shutdown(&self) {
        self.sweeper.abort();
    }
}

impl Drop for EarningsCache {
    fn drop(&mut self) {
        self.sweeper.abort();
    }
}
