use crate::contract::model::UserId;
use crate::domain::ports::{AccessPolicy, Operation};

/// Every user may mutate articles.
#[derive(Debug, Default, Clone, Copy)]
pub struct AllowAll;

impl AccessPolicy for AllowAll {
    fn allows(&self, _user: UserId, _operation: Operation) -> bool {
        true
    }
}

/// Anonymous callers are read-only.
#[derive(Debug, Clone, Copy)]
pub struct DenyAnonymousWrites {
    anonymous: UserId,
}

impl DenyAnonymousWrites {
    pub fn new(anonymous: UserId) -> Self {
        Self { anonymous }
    }
}

impl Default for DenyAnonymousWrites {
    fn default() -> Self {
        Self::new(UserId::ANONYMOUS)
    }
}

impl AccessPolicy for DenyAnonymousWrites {
    fn allows(&self, user: UserId, _operation: Operation) -> bool {
        user != self.anonymous
    }
}
