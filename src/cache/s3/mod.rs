//! Memory + S3 backend

mod cache;
mod config;
#[cfg(test)]
pub(crate) mod mock_store;
mod store;

pub use cache::S3Cache;
pub use config::S3CacheConfig;
pub use store::{ObjectStore, S3ObjectStore};
