use thiserror::Error;

/// Errors that are safe to expose to other modules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArticlesError {
    #[error("Article not found: {id}")]
    NotFound { id: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Internal error")]
    Internal,
}

impl ArticlesError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    pub fn internal() -> Self {
        Self::Internal
    }
}

impl From<crate::domain::error::DomainError> for ArticlesError {
    fn from(domain_error: crate::domain::error::DomainError) -> Self {
        use crate::domain::error::DomainError::*;
        match domain_error {
            ArticleNotFound { id } => Self::not_found(id),
            e @ Forbidden { .. } => Self::forbidden(e.to_string()),
            Storage { .. } => Self::internal(),
        }
    }
}
