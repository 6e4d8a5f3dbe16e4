//! Integration test harness: persistence and engine-over-store scenarios.

mod engine_test;
#[cfg(feature = "rocksdb-backend")]
mod persistence_test;
