pub mod persistence;
pub mod pubsub;
