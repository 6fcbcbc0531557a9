//! Renderers for compliance results.
//!
//! - [`json`] — compact JSON with the four result buckets.
//! - [`terminal`] — colored summary followed by one table per non-empty bucket.

pub mod json;
pub mod terminal;
