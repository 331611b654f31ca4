//! Output artifacts.
pub mod json;
