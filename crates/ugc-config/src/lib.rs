//! # UGC Config
//!
//! Configuration management for the UGC site core.
//!
//! Settings are read from a TOML file, overridden from `UGC_*` environment
//! variables and validated before anything is constructed from them.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod defaults;
pub mod loader;
pub mod schema;
pub mod validator;

pub use loader::{ConfigError, ConfigLoader};
pub use schema::*;
