//! # contract_state_api
//!
//! Read API and live event feed over an indexed relational copy of
//! blockchain contract state (atomicassets assets, atomicmarket sales).
//!
//! ## Architecture Layers
//!
//! - **Domain**: entities, value objects, domain errors
//! - **Application**: the query construction engine, ports, use cases and the
//!   notification fan-out subsystem
//! - **Infrastructure**: Postgres adapters for the ports and the change feeds
//! - **API**: axum routes, WebSocket namespaces and middleware
//!
//! ## Key Features
//!
//! - Filters, sorts and pagination composed into one parameterized statement
//! - Per-resource notification channels that re-read authoritative state
//!   before pushing it, in publish order, with fork notices on the same queue
//! - Per-namespace and per-address socket admission control

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

#[cfg(test)]
pub mod test_support;

pub use api::errors as api_errors;
pub use application::{dto, ports, use_cases};
pub use config::Config;
pub use domain::errors as domain_errors;
pub use domain::{entities, value_objects};
