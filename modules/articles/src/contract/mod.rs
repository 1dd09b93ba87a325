pub mod client;
pub mod error;
pub mod model;

pub use client::ArticlesApi;
pub use error::ArticlesError;
pub use model::*;
