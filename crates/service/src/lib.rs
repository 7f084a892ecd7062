//! Service layer: the expiring record store and the request statistics pipeline.
//! - Business rules live here; persistence sits behind repository traits.
//! - `models` provides the SeaORM entities, `storage` picks a backend at startup.

pub mod errors;
pub mod clock;
pub mod records;
pub mod stats;
pub mod storage;
pub mod tasks;
#[cfg(test)]
pub mod test_support;
