use thiserror::Error;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    /// The id is unknown to storage, or names an entity that is not an article.
    /// Keeps the raw id as received so callers can echo it back.
    #[error("Article with ID {id} not found.")]
    ArticleNotFound { id: String },

    #[error("Access denied: user {user} may not {operation} articles")]
    Forbidden { user: i64, operation: &'static str },

    #[error("Storage error: {message}")]
    Storage { message: String },
}

impl DomainError {
    pub fn article_not_found(id: impl Into<String>) -> Self {
        Self::ArticleNotFound { id: id.into() }
    }

    pub fn forbidden(user: i64, operation: &'static str) -> Self {
        Self::Forbidden { user, operation }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}
