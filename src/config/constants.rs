//! Application-wide constants
//!
//! Centralized location for magic values to improve maintainability.

// =============================================================================
// Server Configuration
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 3000;

// =============================================================================
// Database
// =============================================================================

/// Default database backend
pub const DEFAULT_DB_BACKEND: &str = "postgres";

/// Default database host
pub const DEFAULT_DB_HOST: &str = "localhost";

/// Default PostgreSQL port
pub const DEFAULT_POSTGRES_PORT: u16 = 5432;

/// Default MySQL port
pub const DEFAULT_MYSQL_PORT: u16 = 3306;

/// Default database user (for development)
pub const DEFAULT_DB_USER: &str = "postgres";

/// Default database name
pub const DEFAULT_DB_NAME: &str = "user_auth";

/// Default upper bound for a single store call, in seconds
pub const DEFAULT_STORE_TIMEOUT_SECONDS: u64 = 5;

// =============================================================================
// Password Hashing (Argon2id)
// =============================================================================

/// Default Argon2 memory cost in KiB (OWASP baseline)
pub const DEFAULT_ARGON2_MEMORY_KIB: u32 = 19_456;

/// Default Argon2 iteration count
pub const DEFAULT_ARGON2_ITERATIONS: u32 = 2;

/// Default Argon2 lane count
pub const DEFAULT_ARGON2_PARALLELISM: u32 = 1;

// =============================================================================
// Response Messages
// =============================================================================

/// Returned when a register request lacks a field
pub const MSG_REGISTER_FIELDS_REQUIRED: &str = "All fields are required";

/// Returned when a login request lacks a field
pub const MSG_LOGIN_FIELDS_REQUIRED: &str = "Email and password are required";

/// Returned after a successful registration
pub const MSG_REGISTERED: &str = "User registered successfully";

/// Returned after a successful login
pub const MSG_LOGIN_SUCCESSFUL: &str = "Login successful";
