//! Domain layer - pure business logic with no external dependencies.
//!
//! This layer contains the core concepts and invariants of action tallying:
//! - Action events and their normalization
//! - Validation policy (configuration)
//! - Overflow-safe running totals
//! - Report and snapshot records
//!
//! All types in this layer are pure and easily testable.

pub mod action;
pub mod config;
pub mod error;
pub mod report;
pub mod tally;
