pub mod cors;
pub mod metrics;
