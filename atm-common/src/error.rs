//! Error type for atm-common
//!
//! Missing records and bad input are handled in atm-site, where they turn
//! into 404 pages and field messages; nothing here produces them.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Creating the database folder or reading the config file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Argon2 rejected the salt or parameters
    #[error("Password hashing failed: {0}")]
    PasswordHash(String),
}
