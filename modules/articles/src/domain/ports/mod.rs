pub mod access;
pub mod cache;

pub use access::{AccessPolicy, Operation};
pub use cache::CacheInvalidator;
