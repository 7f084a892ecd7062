use std::sync::atomic::{AtomicU64, Ordering};

use super::domain::CounterDelta;

/// Per-verb request counts since the last successful flush.
///
/// Every operation is a single atomic instruction per counter: `drain` swaps each
/// counter with zero, so an increment racing a drain is either part of the drained
/// value or stays in the buffer, never both and never neither.
#[derive(Debug, Default)]
pub struct CounterBuffer {
    get: AtomicU64,
    post: AtomicU64,
}

impl CounterBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one request. Verbs other than GET and POST are ignored; returns whether it counted.
    pub fn increment(&self, method: &str) -> bool {
        let counter = match method {
            "GET" => &self.get,
            "POST" => &self.post,
            _ => return false,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        true
    }

    /// Take the current counts and reset them to zero.
    pub fn drain(&self) -> CounterDelta {
        CounterDelta {
            get: self.get.swap(0, Ordering::AcqRel),
            post: self.post.swap(0, Ordering::AcqRel),
        }
    }

    /// Current counts without resetting.
    pub fn snapshot(&self) -> CounterDelta {
        CounterDelta {
            get: self.get.load(Ordering::Acquire),
            post: self.post.load(Ordering::Acquire),
        }
    }

    /// Add a previously drained delta back.
    pub fn restore(&self, delta: CounterDelta) {
        self.get.fetch_add(delta.get, Ordering::AcqRel);
        self.post.fetch_add(delta.post, Ordering::AcqRel);
    }
}
