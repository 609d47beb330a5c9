//! Client for the packages.ecosyste.ms aggregation API.

mod client;
mod payload;

pub use client::{API_BASE, ApiClient, DEFAULT_TIMEOUT, Fetch, HEALTH_TIMEOUT, encode_component};
pub use payload::{PackagePayload, decode};
