use dashmap::DashMap;
use tracing::debug;

use crate::domain::ports::CacheInvalidator;

/// Invalidator that only records the tags in the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingInvalidator;

impl CacheInvalidator for LoggingInvalidator {
    fn invalidate_tags(&self, tags: &[String]) {
        debug!(?tags, "Invalidating cache tags");
    }
}

/// Monotonic per-tag version counters. A cached response stays valid while
/// every tag it carries still has the version seen when it was stored.
///
/// Entries are never evicted: every article ever written keeps its
/// `node:<id>` counter. Meant for tests and short-lived runs, not for a
/// long-running server.
#[derive(Debug, Default)]
pub struct TagVersionRegistry {
    versions: DashMap<String, u64>,
}

impl TagVersionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current version of `tag`; 0 if it was never invalidated.
    pub fn version(&self, tag: &str) -> u64 {
        self.versions.get(tag).map(|v| *v).unwrap_or(0)
    }
}

impl CacheInvalidator for TagVersionRegistry {
    fn invalidate_tags(&self, tags: &[String]) {
        for tag in tags {
            *self.versions.entry(tag.clone()).or_insert(0) += 1;
        }
        debug!(?tags, "Bumped cache tag versions");
    }
}
