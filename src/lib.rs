//! PDF Converter Server Library
//!
//! A stateless HTTP gateway that renders arbitrary documents to PDF by
//! running headless LibreOffice against a staged copy of the request body.
//!
//! # Modules
//!
//! - `config`: Environment-driven configuration
//! - `convert`: Staging, converter invocation, cleanup and scratch sweeping
//! - `error`: HTTP error responses
//! - `routes`: Liveness check and the conversion endpoint
//! - `state`: Shared application state

pub mod config;
pub mod convert;
pub mod error;
pub mod routes;
pub mod state;

pub use config::Config;
pub use routes::build_router;
pub use state::AppState;
