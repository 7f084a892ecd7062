//! Self-expiring key → payload store.
//!
//! Three layers as elsewhere in this crate: domain types, a repository trait with
//! in-memory and SeaORM implementations, and the [`RecordStore`] service.

pub mod domain;
pub mod repository;
pub mod repo;
pub mod service;

pub use service::{RecordStore, RETENTION};
