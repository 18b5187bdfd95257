//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on the repository trait, so the
//! store can be swapped for a fake in tests.

mod auth_service;

pub use auth_service::{AuthService, Authenticator};
