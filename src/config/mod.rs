//! Configuration modules for the Flagstone API.
//!
//! Each submodule handles one aspect of configuration, loaded from
//! environment variables with sensible defaults.
//!
//! # Modules
//!
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`database`]: PostgreSQL connection pool initialization
//! - [`jwt`]: JWT key-file paths and token lifetime

pub mod cors;
pub mod database;
pub mod jwt;
