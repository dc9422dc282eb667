//! Core building blocks for shipway
//!
//! - **config**: shipway configuration (shipway.toml) parsing and validation
//! - **env**: one-shot snapshot of CI metadata, credentials and test mode
//! - **error**: comprehensive error types with contextual help messages
//! - **state**: release flavor and the state threaded through a pipeline run
//! - **version**: the version model with ordering, bumping and validation

pub mod config;
pub mod env;
pub mod error;
pub mod state;
pub mod version;
