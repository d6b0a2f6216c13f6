//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the namespaced key/value contract that stands in for browser
//!   local storage.
//! - Isolate SQLite query details from the document store.

pub mod kv_repo;
