//! Core use-case services.
//!
//! # Responsibility
//! - Run every user action as load -> mutate -> save against the store.
//! - Keep callers decoupled from storage details.
//!
//! # Invariants
//! - A failed mutation is never persisted.

pub mod finance_service;
pub mod study_service;
