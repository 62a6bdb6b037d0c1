use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Invalid channel topic: {0}")]
    InvalidTopic(String),

    #[error("Invalid sort order: {0}")]
    InvalidSortOrder(String),

    #[error("Invalid sale state: {0}")]
    InvalidSaleState(String),

    #[error("Invalid pagination: {0}")]
    InvalidPagination(String),
}
