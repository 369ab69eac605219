//! Infrastructure layer: configuration, logging and file storage.

pub mod config;
pub mod logger;
pub mod storage;

#[cfg(feature = "database")]
pub mod database;
