use std::fmt;

use crate::contract::model::UserId;

/// Mutating operations guarded by the access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Port consulted once before every mutation.
pub trait AccessPolicy: Send + Sync {
    fn allows(&self, user: UserId, operation: Operation) -> bool;
}
