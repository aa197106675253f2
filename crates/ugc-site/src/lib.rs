//! # UGC site
//!
//! Application layer of the UGC workwear website core.
//!
//! [`SiteContext`] wires configuration, the content API fetcher, language
//! persistence and the host locale into one translation resolver and one
//! request cache that page code receives explicitly.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod context;
pub mod error;
pub mod preload;
pub mod resources;

pub use context::{SiteContext, SiteStats};
pub use error::{SiteError, SiteResult};
pub use preload::{preload_critical_data, PreloadReport};
pub use resources::Resource;
