pub mod errors;
pub mod db;
pub mod stored_record;
pub mod global_stats;

#[cfg(test)]
mod tests;
