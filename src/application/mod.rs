pub mod builder;
pub mod dto;
pub mod errors;
pub mod filler;
pub mod format;
pub mod notifications;
pub mod ports;
pub mod query;
pub mod use_cases;
pub mod validation;
