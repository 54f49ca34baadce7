//! Validation rules shared by request payloads.

pub mod rules;

pub use validator::Validate;
