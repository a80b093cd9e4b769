//! Unified error types for the points ledger.
//!
//! Every fallible operation in the crate returns [`Result`], whose error side is
//! the single [`Error`] enum below. [`Error::kind`] groups the variants into the
//! coarse categories callers branch on when rendering a failure.

use thiserror::Error;

/// All errors produced by the ledger, the directory and the bot layer.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or malformed input (empty field, non-positive amount)
    #[error("Invalid input: {message}")]
    Validation {
        /// What was wrong with the input
        message: String,
    },

    /// Referenced user does not exist
    #[error("User not found: {id}")]
    UserNotFound {
        /// The identifier that was looked up (id, name or Discord id)
        id: String,
    },

    /// Referenced team does not exist
    #[error("Team not found: {id}")]
    TeamNotFound {
        /// The identifier that was looked up
        id: String,
    },

    /// Referenced product does not exist or is inactive
    #[error("Product not found: {name}")]
    ProductNotFound {
        /// The product name or id that was looked up
        name: String,
    },

    /// Referenced points award does not exist
    #[error("Points award not found: {id}")]
    AwardNotFound {
        /// The award id that was looked up
        id: i64,
    },

    /// The target user is not a student
    #[error("User {user_id} is not a student")]
    NotAStudent {
        /// The offending user
        user_id: i64,
    },

    /// The target student does not belong to the stated team
    #[error("User {user_id} is not a member of team {team_id}")]
    TeamMismatch {
        /// The student
        user_id: i64,
        /// The team named in the request
        team_id: i64,
    },

    /// Requested quantity exceeds the stock for that size
    #[error("Insufficient stock for size {size}: requested {requested}, available {available}")]
    InsufficientStock {
        /// Inventory size label
        size: String,
        /// Quantity requested by the sale
        requested: i32,
        /// Quantity on hand when the check ran
        available: i32,
    },

    /// The caller is unknown or lacks the role for the operation
    #[error("Permission denied: {message}")]
    PermissionDenied {
        /// Why the caller was rejected
        message: String,
    },

    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
    },

    /// Underlying persistence or transaction failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Environment variable could not be read
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Serenity/Poise framework error
    #[error("Serenity/Poise framework error: {0}")]
    #[allow(clippy::enum_variant_names)]
    FrameworkError(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::FrameworkError(Box::new(value))
    }
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or malformed input
    Validation,
    /// Referenced record does not exist (or product inactive)
    NotFound,
    /// Referenced user is not a student of the stated team
    InvalidOperand,
    /// Sale exceeds available inventory
    InsufficientStock,
    /// Caller is not allowed to perform the operation
    PermissionDenied,
    /// Persistence failure not otherwise classified
    Storage,
    /// Broken configuration or environment
    Configuration,
}

impl ErrorKind {
    /// HTTP status an HTTP front-end should answer with for this kind.
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::Validation | Self::InvalidOperand => 400,
            Self::PermissionDenied => 403,
            Self::NotFound => 404,
            Self::InsufficientStock => 409,
            Self::Storage | Self::Configuration => 500,
        }
    }

    /// Whether the failure was caused by the request and can be fixed by the caller.
    #[must_use]
    pub const fn is_client_error(self) -> bool {
        self.http_status() < 500
    }
}

impl Error {
    /// Classifies this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::UserNotFound { .. }
            | Self::TeamNotFound { .. }
            | Self::ProductNotFound { .. }
            | Self::AwardNotFound { .. } => ErrorKind::NotFound,
            Self::NotAStudent { .. } | Self::TeamMismatch { .. } => ErrorKind::InvalidOperand,
            Self::InsufficientStock { .. } => ErrorKind::InsufficientStock,
            Self::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            Self::Database(_) | Self::FrameworkError(_) => ErrorKind::Storage,
            Self::Config { .. } | Self::EnvVar(_) => ErrorKind::Configuration,
        }
    }

    /// Shorthand for a [`Error::Validation`] with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
