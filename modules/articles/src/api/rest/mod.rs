pub mod cache;
pub mod dto;
pub mod envelope;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod problem;
pub mod routes;
