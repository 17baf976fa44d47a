//! Infrastructure adapters for config, storage, and logging.

pub mod config;
pub mod kv;
pub mod logging;
