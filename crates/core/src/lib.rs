//! Core business logic for Tripcover.
//!
//! This crate contains pure business logic with ZERO web dependencies.
//! The tariff tables, request validation rules and premium arithmetic live here.
//!
//! # Modules
//!
//! - `pricing` - Rate table, calculation engine and their error types

pub mod pricing;
