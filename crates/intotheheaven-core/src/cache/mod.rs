//! Versioned named cache stores for offline access.
//!
//! This module provides `CacheStorage`, the set of named stores the offline
//! controller reads and writes, and `CacheStore`, a single store mapping
//! request URLs to responses. Storage can live purely in memory or be backed
//! by one JSON file per store so that cached pages survive restarts.

pub mod entry;
pub mod error;
pub mod storage;
pub mod store;

pub use entry::{CachedData, EntryInfo};
pub use error::CacheError;
pub use storage::CacheStorage;
pub use store::CacheStore;
