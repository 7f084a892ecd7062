//! Request counters: a lock-free in-memory buffer merged periodically into a durable
//! singleton document, plus a live reader combining both.

pub mod buffer;
pub mod domain;
pub mod repository;
pub mod repo;
pub mod service;

pub use buffer::CounterBuffer;
pub use domain::{CounterDelta, FormattedStats, GlobalStats};
pub use service::{FlushOutcome, StatsService};
