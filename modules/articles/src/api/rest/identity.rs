use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, HeaderName},
};

use crate::contract::model::UserId;

/// Resolves the acting user of a request.
pub trait IdentityProvider: Send + Sync {
    fn current_user_id(&self, headers: &HeaderMap) -> UserId;
}

/// Reads a numeric user id from a fixed request header.
#[derive(Debug, Clone)]
pub struct HeaderIdentity {
    header: HeaderName,
    anonymous: UserId,
}

impl HeaderIdentity {
    pub fn new(header: &str, anonymous: UserId) -> anyhow::Result<Self> {
        let header = HeaderName::try_from(header)
            .map_err(|e| anyhow::anyhow!("invalid identity header '{header}': {e}"))?;
        Ok(Self { header, anonymous })
    }
}

impl IdentityProvider for HeaderIdentity {
    fn current_user_id(&self, headers: &HeaderMap) -> UserId {
        headers
            .get(&self.header)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<i64>().ok())
            .map(UserId)
            .unwrap_or(self.anonymous)
    }
}

/// Extractor for the acting user. Falls back to anonymous when no
/// `Arc<dyn IdentityProvider>` extension is installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub UserId);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<Arc<dyn IdentityProvider>>()
            .map(|provider| provider.current_user_id(&parts.headers))
            .unwrap_or(UserId::ANONYMOUS);
        Ok(Self(user))
    }
}
