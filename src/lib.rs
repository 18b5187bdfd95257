//! Credential Service - account registration and login.
//!
//! Two operations over a relational user store: register an account
//! (username, unique email, Argon2id-hashed password) and verify a login.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: User record and password hashing
//! - **services**: Register and login use cases
//! - **infra**: Database connection, migrations, credential store
//! - **api**: HTTP handlers, extractors and routes
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{HashCost, Password, User};
pub use errors::{AppError, AppResult};
