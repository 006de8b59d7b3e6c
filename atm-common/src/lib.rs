//! # All Time Music Common Library
//!
//! Shared code for the catalog site including:
//! - Database initialization and schema
//! - Entity models and their enumerations
//! - Configuration loading
//! - Validators (password policy, rating parsing)
//! - Password hashing

pub mod config;
pub mod db;
pub mod error;
pub mod password;
pub mod validators;

pub use error::{Error, Result};
