//! Viewbridge API Library
//!
//! This crate provides the HTTP handlers, middleware, and application setup.

// Module declarations
mod api_doc;
mod handlers;
mod telemetry;

// Public modules
pub mod error;
pub mod middleware;
pub mod platform;
pub mod setup;
pub mod state;
pub mod viewer;

// Re-exports
pub use error::ErrorResponse;
pub use telemetry::init_tracing;
pub use viewbridge_worker::{ConversionPipeline, ConversionQueue};
