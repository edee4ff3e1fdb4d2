//! Input validation for request payloads.
//!
//! Field rules live in [`rules`] and are wired into payload structs through
//! `#[validate(custom(...))]`.

pub mod rules;

pub use validator::Validate;
