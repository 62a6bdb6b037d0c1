//! Error type shared by the read use cases.

use thiserror::Error;

use crate::application::ports::RepositoryError;
use crate::application::query::ArgumentError;
use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum UseCaseError {
    #[error("{0}")]
    Arguments(#[from] ArgumentError),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("{0}")]
    NotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_argument_error() {
        let err: UseCaseError = ArgumentError::Invalid("symbol parameter is required".to_string()).into();

        assert!(matches!(err, UseCaseError::Arguments(_)));
        assert_eq!(err.to_string(), "symbol parameter is required");
    }

    #[test]
    fn test_from_repository_error() {
        let err: UseCaseError = RepositoryError::Internal("boom".to_string()).into();

        assert!(matches!(err, UseCaseError::Repository(_)));
        assert!(err.to_string().contains("Repository error"));
    }

    #[test]
    fn test_not_found_message() {
        let err = UseCaseError::NotFound("Asset not found".to_string());
        assert_eq!(err.to_string(), "Asset not found");
    }
}
