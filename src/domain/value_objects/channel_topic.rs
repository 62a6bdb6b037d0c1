use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Name of a pub/sub topic carrying change events for one channel.
///
/// Resource topics are `<reader>:<contract>:<resource>`, fork topics are
/// `<reader>:fork`. Postgres truncates channel identifiers past 63 bytes, so
/// longer names are rejected instead of silently colliding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelTopic(String);

impl ChannelTopic {
    const MAX_LENGTH: usize = 63;
    const FORK_SUFFIX: &'static str = "fork";

    pub fn resource(reader: &str, contract: &str, resource: &str) -> Result<Self, DomainError> {
        for part in [reader, contract, resource] {
            Self::validate_part(part)?;
        }

        Self::new(format!("{}:{}:{}", reader, contract, resource))
    }

    pub fn fork(reader: &str) -> Result<Self, DomainError> {
        Self::validate_part(reader)?;

        Self::new(format!("{}:{}", reader, Self::FORK_SUFFIX))
    }

    fn new(value: String) -> Result<Self, DomainError> {
        if value.len() > Self::MAX_LENGTH {
            return Err(DomainError::InvalidTopic(format!(
                "Topic too long: {} > {}",
                value.len(),
                Self::MAX_LENGTH
            )));
        }

        Ok(Self(value))
    }

    fn validate_part(part: &str) -> Result<(), DomainError> {
        if part.is_empty() {
            return Err(DomainError::InvalidTopic(
                "Topic segment cannot be empty".to_string(),
            ));
        }

        if !part
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-')
        {
            return Err(DomainError::InvalidTopic(format!(
                "Topic segment contains invalid characters: {}",
                part
            )));
        }

        Ok(())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ChannelTopic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
