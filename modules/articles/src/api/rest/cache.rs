//! Cache metadata attached to read responses.

use std::convert::Infallible;

use axum::{
    http::{header, HeaderName, HeaderValue},
    response::{IntoResponseParts, ResponseParts},
};

use crate::contract::model::EntityId;
use crate::domain::ports::cache::{node_tag, NODE_LIST_TAG};

pub const CACHE_CONTEXTS_HEADER: HeaderName = HeaderName::from_static("x-cache-contexts");
pub const CACHE_TAGS_HEADER: HeaderName = HeaderName::from_static("x-cache-tags");

/// Responses vary by query string.
pub const QUERY_ARGS_CONTEXT: &str = "url.query_args";

/// `max-age` advertised on read responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadCachePolicy {
    pub max_age_secs: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheMetadata {
    contexts: Vec<String>,
    tags: Vec<String>,
    max_age_secs: Option<u32>,
}

impl CacheMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_article(id: EntityId, policy: ReadCachePolicy) -> Self {
        Self::new()
            .with_context(QUERY_ARGS_CONTEXT)
            .with_tag(node_tag(id))
            .with_max_age(policy.max_age_secs)
    }

    pub fn for_article_list(policy: ReadCachePolicy) -> Self {
        Self::new()
            .with_context(QUERY_ARGS_CONTEXT)
            .with_tag(NODE_LIST_TAG)
            .with_max_age(policy.max_age_secs)
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.contexts.push(context.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
        self
    }

    pub fn with_max_age(mut self, secs: u32) -> Self {
        self.max_age_secs = Some(secs);
        self
    }

    pub fn contexts(&self) -> &[String] {
        &self.contexts
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }
}

fn joined(values: &[String]) -> Option<HeaderValue> {
    if values.is_empty() {
        return None;
    }
    HeaderValue::from_str(&values.join(" ")).ok()
}

impl IntoResponseParts for CacheMetadata {
    type Error = Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        let headers = res.headers_mut();
        if let Some(v) = joined(&self.contexts) {
            headers.insert(CACHE_CONTEXTS_HEADER, v);
        }
        if let Some(v) = joined(&self.tags) {
            headers.insert(CACHE_TAGS_HEADER, v);
        }
        if let Some(secs) = self.max_age_secs {
            if let Ok(v) = HeaderValue::from_str(&format!("public, max-age={secs}")) {
                headers.insert(header::CACHE_CONTROL, v);
            }
        }
        Ok(res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    const POLICY: ReadCachePolicy = ReadCachePolicy { max_age_secs: 30 };

    #[test]
    fn single_article_metadata_is_tagged_by_id() {
        let meta = CacheMetadata::for_article(EntityId(5), POLICY);
        assert_eq!(meta.tags(), ["node:5"]);
        assert_eq!(meta.contexts(), ["url.query_args"]);
    }

    #[test]
    fn tags_are_deduplicated() {
        let meta = CacheMetadata::new().with_tag("a").with_tag("a").with_tag("b");
        assert_eq!(meta.tags(), ["a", "b"]);
    }

    #[test]
    fn metadata_renders_as_headers() {
        let resp = (CacheMetadata::for_article_list(POLICY), "ok").into_response();
        let h = resp.headers();
        assert_eq!(h.get("x-cache-tags").unwrap(), "node_list");
        assert_eq!(h.get("x-cache-contexts").unwrap(), "url.query_args");
        assert_eq!(h.get("cache-control").unwrap(), "public, max-age=30");
    }

    #[test]
    fn empty_metadata_adds_nothing() {
        let resp = (CacheMetadata::new(), "ok").into_response();
        assert!(resp.headers().get("x-cache-tags").is_none());
        assert!(resp.headers().get("cache-control").is_none());
    }
}
