use chrono::{DateTime, Utc};
use serde::Serialize;

/// A payload stored under a key. `created_at` is reset on every upsert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredRecord {
    pub key: String,
    pub payload: String,
    pub created_at: DateTime<Utc>,
}
