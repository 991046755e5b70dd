//! Shared configuration and error types for Tripcover.
//!
//! This crate provides the pieces every other crate agrees on:
//! - Application-wide error types
//! - Configuration management (server and tariff settings)

pub mod config;
pub mod error;


pub use config::{AppConfig, ServerConfig, TariffConfig};
pub use error::{AppError, AppResult};
