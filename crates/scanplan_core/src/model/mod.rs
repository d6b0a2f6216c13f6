//! Typed documents for the two local-first apps.
//!
//! # Responsibility
//! - Define the persisted JSON shape of each app document.
//! - Supply per-field defaults so a partial payload always yields a complete
//!   document.
//!
//! # Invariants
//! - Serialized keys are camelCase and match the stored browser layout.
//! - Every top-level field has a default; absence never reaches callers.

pub mod finance;
pub mod study;
