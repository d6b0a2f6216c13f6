//! Domain mutators.
//!
//! # Responsibility
//! - Apply user actions to an owned document passed in by the caller.
//! - Stay free of storage and logging; persistence is the service's job.
//!
//! # Invariants
//! - A mutator that returns an error leaves the document unchanged.

pub mod finance;
pub mod study;
