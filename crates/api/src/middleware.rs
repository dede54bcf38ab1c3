/// Password hashing, session tokens and identity extractors
pub mod auth;
/// Domain error to HTTP response mapping
pub mod error_handling;
/// Role checks applied by protected handlers
pub mod guard;
