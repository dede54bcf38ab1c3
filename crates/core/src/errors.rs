use thiserror::Error;

/// Failure codes surfaced by the identity gateway.
///
/// Each code maps to a fixed user-facing message so clients never see raw
/// storage or hashing errors for sign-in problems.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityErrorCode {
    EmailAlreadyInUse,
    InvalidEmail,
    WeakPassword,
    UserNotFound,
    WrongPassword,
    InvalidCredential,
    MissingSession,
}

impl IdentityErrorCode {
    /// Stable machine-readable code, returned alongside the message.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmailAlreadyInUse => "auth/email-already-in-use",
            Self::InvalidEmail => "auth/invalid-email",
            Self::WeakPassword => "auth/weak-password",
            Self::UserNotFound => "auth/user-not-found",
            Self::WrongPassword => "auth/wrong-password",
            Self::InvalidCredential => "auth/invalid-credential",
            Self::MissingSession => "auth/missing-session",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::EmailAlreadyInUse => "This email is already registered",
            Self::InvalidEmail => "Invalid email",
            Self::WeakPassword => "The password must be at least 6 characters long",
            Self::UserNotFound => "User not found",
            Self::WrongPassword => "Wrong password",
            Self::InvalidCredential => "Invalid credentials",
            Self::MissingSession => "You must be signed in",
        }
    }
}

#[derive(Error, Debug)]
pub enum DeskError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("{}", .0.message())]
    Identity(IdentityErrorCode),

    #[error("Database error: {0}")]
    Database(eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

// `eyre::Report` is not a `std::error::Error`, so it cannot be a `#[from]` source.
impl From<eyre::Report> for DeskError {
    fn from(report: eyre::Report) -> Self {
        DeskError::Database(report)
    }
}

impl From<IdentityErrorCode> for DeskError {
    fn from(code: IdentityErrorCode) -> Self {
        DeskError::Identity(code)
    }
}

pub type DeskResult<T> = Result<T, DeskError>;
