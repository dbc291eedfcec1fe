//! dbterd Core
//!
//! Shared domain types: the error taxonomy, the catalog-to-DBML type map
//! and the `dbterd.toml` configuration.

pub mod error;
pub mod types;
pub mod config;

pub use error::{DbterdError, Result};
pub use types::TypeMap;
pub use config::{Config, ConfigError};
