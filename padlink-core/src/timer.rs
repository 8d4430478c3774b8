//! Keyed one-shot timers.
//!
//! A thin wrapper over [`DelayQueue`] where each logical timer is named
//! by a key. Arming a key that is already armed restarts it, so at most
//! one deadline per key is ever pending. Cancelling a key that is not
//! armed is a no-op.
//!
//! All operations must run inside a tokio runtime with the time driver
//! enabled.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use futures::StreamExt;
use tokio_util::time::DelayQueue;
use tokio_util::time::delay_queue::Key;

/// Longest delay a timer is armed for; longer requests are shortened.
pub const MAX_DELAY: Duration = Duration::from_secs(30 * 24 * 60 * 60);

pub struct TimerQueue<K> {
    queue: DelayQueue<K>,
    keys: HashMap<K, Key>,
}

impl<K> TimerQueue<K>
where
    K: Clone + Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            queue: DelayQueue::new(),
            keys: HashMap::new(),
        }
    }

    /// Fire `timer` after `delay`, replacing any pending deadline for it.
    pub fn arm(&mut self, timer: K, delay: Duration) {
        let delay = delay.min(MAX_DELAY);
        match self.keys.get(&timer) {
            Some(key) => self.queue.reset(key, delay),
            None => {
                let key = self.queue.insert(timer.clone(), delay);
                self.keys.insert(timer, key);
            }
        }
    }

    /// Drop the pending deadline for `timer`. Returns `true` if one existed.
    pub fn cancel(&mut self, timer: &K) -> bool {
        match self.keys.remove(timer) {
            Some(key) => {
                self.queue.remove(&key);
                true
            }
            None => false,
        }
    }

    pub fn is_armed(&self, timer: &K) -> bool {
        self.keys.contains_key(timer)
    }

    /// Cancel everything.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.keys.clear();
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Wait for the next deadline. Returns `None` immediately when
    /// nothing is armed.
    pub async fn next_expired(&mut self) -> Option<K> {
        if self.keys.is_empty() {
            return None;
        }
        let expired = self.queue.next().await?;
        let timer = expired.into_inner();
        self.keys.remove(&timer);
        Some(timer)
    }
}

impl<K> Default for TimerQueue<K>
where
    K: Clone + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K: std::fmt::Debug> std::fmt::Debug for TimerQueue<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerQueue")
            .field("armed", &self.keys.keys().collect::<Vec<_>>())
            .finish()
    }
}
