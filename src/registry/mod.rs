//! Identifier normalization: ecosystem ↔ registry mapping and purl parsing.
//!
//! # Example
//!
//! ```ignore
//! use crate::registry::{ecosystem_to_registry, parse_purl};
//!
//! let purl = parse_purl("pkg:npm/lodash@4.17.21").unwrap();
//! assert_eq!(ecosystem_to_registry(&purl.ecosystem), Some("npmjs.org"));
//! ```

mod mapping;
mod purl;

pub use mapping::{ecosystem_to_registry, registry_to_ecosystem, supported_ecosystems};
pub use purl::parse_purl;
