//! # tether-cases
//!
//! Lifecycle management for correlation cases: opening cases from
//! manual-review candidates, resolving them (confirm, reject, create
//! identity), and keeping the identity-link side effects consistent with the
//! resolution outcome.

pub mod manager;

pub use manager::CaseManager;
