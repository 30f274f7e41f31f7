//! In-memory read-through cache with a fixed expiration window.
//!
//! Entries older than the TTL are treated as absent and evicted on the next
//! lookup. The map sits behind a [`Mutex`]; no lock is ever held across an
//! `.await`.
//!
//! Every [`TtlCache::clear`] bumps a generation counter. A read-through fill
//! takes the generation before reading the store and hands it back to
//! [`TtlCache::set_if_current`], which drops the value if a clear happened in
//! between.

use std::{
  collections::HashMap,
  sync::{Mutex, MutexGuard, PoisonError},
  time::{Duration, Instant},
};

use uuid::Uuid;

pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Cache key for a single project's details.
pub fn details_key(id: Uuid) -> String { format!("project_details:{id}") }

struct Entry<V> {
  value:     V,
  stored_at: Instant,
}

struct Inner<V> {
  entries:    HashMap<String, Entry<V>>,
  generation: u64,
}

impl<V> Inner<V> {
  fn insert(&mut self, key: String, value: V) {
    self.entries.insert(key, Entry {
      value,
      stored_at: Instant::now(),
    });
  }
}

pub struct TtlCache<V> {
  inner: Mutex<Inner<V>>,
  ttl:   Duration,
}

impl<V: Clone> TtlCache<V> {
  pub fn new(ttl: Duration) -> Self {
    Self {
      inner: Mutex::new(Inner {
        entries:    HashMap::new(),
        generation: 0,
      }),
      ttl,
    }
  }

  /// Return a clone of the live entry for `key`, evicting it if expired.
  pub fn get(&self, key: &str) -> Option<V> {
    let mut inner = self.lock();
    if let Some(entry) = inner.entries.get(key)
      && entry.stored_at.elapsed() < self.ttl
    {
      return Some(entry.value.clone());
    }
    inner.entries.remove(key);
    None
  }

  pub fn set(&self, key: impl Into<String>, value: V) {
    self.lock().insert(key.into(), value);
  }

  /// Current generation, to be passed to [`TtlCache::set_if_current`].
  pub fn generation(&self) -> u64 { self.lock().generation }

  /// Store `value` only if nothing was cleared since `generation` was read.
  /// Returns whether the value was stored.
  pub fn set_if_current(
    &self,
    key: impl Into<String>,
    value: V,
    generation: u64,
  ) -> bool {
    let mut inner = self.lock();
    if inner.generation != generation {
      return false;
    }
    inner.insert(key.into(), value);
    true
  }

  /// Drop one key, or everything when `key` is `None`.
  pub fn clear(&self, key: Option<&str>) {
    let mut inner = self.lock();
    inner.generation = inner.generation.wrapping_add(1);
    match key {
      Some(key) => {
        inner.entries.remove(key);
      }
      None => inner.entries.clear(),
    }
  }

  // Poisoning is ignored: every critical section leaves the map consistent.
  fn lock(&self) -> MutexGuard<'_, Inner<V>> {
    self.inner.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

impl<V: Clone> Default for TtlCache<V> {
  fn default() -> Self { Self::new(DEFAULT_TTL) }
}
