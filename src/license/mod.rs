//! Licence identification helpers used by the filesystem detector.
//!
//! - [`spdx`] — normalizes declared licence strings and splits SPDX `OR` expressions.
//! - [`text`] — scores licence file contents against known licence texts.

pub mod spdx;
pub mod text;
