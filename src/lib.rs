//! The `taskvault` library crate.
//!
//! This crate contains the domain models, authentication layer, routing
//! configuration, and error handling for the TaskVault API. It is used by the
//! main binary (`main.rs`) to construct and run the application, and by the
//! integration tests to assemble an identical in-process application.

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;

pub use crate::error::{json_config, path_config, AppError};
