pub mod ability;
pub mod alignment;
pub mod core_api;
pub mod envelope;
pub mod source;
