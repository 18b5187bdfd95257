//! Domain layer - Core business entities and logic
//!
//! Contains the user record and the password value object,
//! independent of HTTP and persistence concerns.

pub mod password;
pub mod user;

pub use password::{HashCost, Password};
pub use user::User;
