use serde::{Deserialize, Serialize};

/// Configuration for the articles module
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArticlesConfig {
    /// Request header carrying the acting user's numeric id.
    #[serde(default = "default_identity_header")]
    pub identity_header: String,
    /// Id used when the identity header is missing or unparsable.
    #[serde(default)]
    pub anonymous_user_id: i64,
    #[serde(default = "default_allow_anonymous_writes")]
    pub allow_anonymous_writes: bool,
    /// `max-age` advertised on read responses.
    #[serde(default = "default_cache_max_age_secs")]
    pub cache_max_age_secs: u32,
}

impl Default for ArticlesConfig {
    fn default() -> Self {
        Self {
            identity_header: default_identity_header(),
            anonymous_user_id: 0,
            allow_anonymous_writes: default_allow_anonymous_writes(),
            cache_max_age_secs: default_cache_max_age_secs(),
        }
    }
}

fn default_identity_header() -> String {
    "x-user-id".to_string()
}

fn default_allow_anonymous_writes() -> bool {
    true
}

fn default_cache_max_age_secs() -> u32 {
    60
}
