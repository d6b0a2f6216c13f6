//! Derived-view calculators.
//!
//! # Responsibility
//! - Compute read-only aggregates from a document for display.
//!
//! # Invariants
//! - Pure functions; nothing here is persisted.
//! - Sections without enough data are `None`, never NaN or infinity.

pub mod finance;
pub mod study;
