//! Obramap Core - Domain models, error taxonomy, and configuration
//!
//! This crate contains the shared domain types for the obramap system:
//! the obra (public-works project) record, geometry and coordinate types,
//! position samples, and the layered configuration loader.

pub mod config;
pub mod error;
pub mod models;

pub use error::{ObramapError, Result};
