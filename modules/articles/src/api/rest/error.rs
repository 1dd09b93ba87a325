use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, StatusCode, Uri},
};

use crate::api::rest::envelope::EnvelopeError;
use crate::api::rest::problem::{Problem, ProblemResponse};
use crate::domain::error::DomainError;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Where a problem occurred: the request path plus the request id, when the
/// ingress assigned one.
#[derive(Debug, Clone, Default)]
pub struct ProblemContext {
    pub instance: String,
    pub request_id: Option<String>,
}

impl ProblemContext {
    pub fn from_head(uri: &Uri, headers: &HeaderMap) -> Self {
        Self {
            instance: uri.path().to_owned(),
            request_id: headers
                .get(REQUEST_ID_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned),
        }
    }
}

impl<S> FromRequestParts<S> for ProblemContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_head(&parts.uri, &parts.headers))
    }
}

/// Helper to create a ProblemResponse with less boilerplate
pub fn from_parts(
    status: StatusCode,
    code: &str,
    title: &str,
    detail: impl Into<String>,
    ctx: &ProblemContext,
) -> ProblemResponse {
    let problem = Problem::new(status, title, detail)
        .with_type(format!("https://errors.example.com/{}", code))
        .with_code(code)
        .with_instance(ctx.instance.as_str())
        .with_request_id(ctx.request_id.as_deref());

    let problem = if let Some(id) = tracing::Span::current().id() {
        problem.with_span_id(id.into_u64().to_string())
    } else {
        problem
    };

    ProblemResponse(problem)
}

/// Map domain error to RFC9457 ProblemResponse
pub fn map_domain_error(e: &DomainError, ctx: &ProblemContext) -> ProblemResponse {
    match e {
        DomainError::ArticleNotFound { .. } => from_parts(
            StatusCode::NOT_FOUND,
            "ARTICLES_NOT_FOUND",
            "Not found",
            e.to_string(),
            ctx,
        ),
        DomainError::Forbidden { .. } => from_parts(
            StatusCode::FORBIDDEN,
            "ARTICLES_FORBIDDEN",
            "Forbidden",
            e.to_string(),
            ctx,
        ),
        DomainError::Storage { .. } => {
            // Log the internal error details but don't expose them to the client
            tracing::error!(error = ?e, "Storage error occurred");
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "ARTICLES_INTERNAL",
                "Internal error",
                "An internal storage error occurred",
                ctx,
            )
        }
    }
}

/// Read-side variant: a missing article gets a generic detail without the id.
pub fn map_read_error(e: &DomainError, ctx: &ProblemContext) -> ProblemResponse {
    match e {
        DomainError::ArticleNotFound { .. } => from_parts(
            StatusCode::NOT_FOUND,
            "ARTICLES_NOT_FOUND",
            "Not found",
            "Article not found",
            ctx,
        ),
        other => map_domain_error(other, ctx),
    }
}

pub fn map_envelope_error(e: &EnvelopeError, ctx: &ProblemContext) -> ProblemResponse {
    tracing::debug!(error = %e, "Rejected request body");
    let detail = match e {
        EnvelopeError::MalformedJson(_) | EnvelopeError::MissingData => {
            EnvelopeError::MissingData.to_string()
        }
        // The envelope is there; say what is wrong inside it.
        EnvelopeError::InvalidData(_) => e.to_string(),
    };
    from_parts(
        StatusCode::BAD_REQUEST,
        "ARTICLES_BAD_REQUEST",
        "Bad request",
        detail,
        ctx,
    )
}
