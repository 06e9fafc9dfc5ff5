//! Application layer - orchestration of domain logic.
//!
//! This layer coordinates the domain logic over shared state:
//! - Action tally engine (ingest, report, export, import, clear)
//! - Ingestion metrics
//!
//! ## Ports
//!
//! The application layer defines ports (traits) that infrastructure
//! adapters must implement. This keeps the application layer independent
//! from infrastructure details.

pub mod aggregator;
pub mod metrics;
pub mod ports;
