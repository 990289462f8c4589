//! Error types for bizplan Core
//!
//! Provides error handling for:
//! - Missing records
//! - Malformed input (rejected before any collection access)
//! - Empty backing collections
//! - Request timeouts
//! - Failures of the background task running an operation

use bizplan_model::{ModelError, RecordKind};
use std::time::Duration;

/// Operation performed by a service call, used in user-facing messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Read a whole collection
    LoadAll,
    /// Read one record
    Load,
    /// Insert a record
    Create,
    /// Modify a record
    Update,
    /// Remove a record
    Delete,
}

impl Action {
    /// Verb used in messages
    #[inline]
    #[must_use]
    pub fn verb(self) -> &'static str {
        match self {
            Action::LoadAll | Action::Load => "load",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.verb())
    }
}

/// Main service error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// Requested identity absent from the collection
    #[error("{kind} with ID {id} not found")]
    NotFound { kind: RecordKind, id: u64 },

    /// Malformed input
    #[error("{0}")]
    Validation(String),

    /// Backing collection holds no records
    #[error("No {} data available", .kind.noun(true))]
    EmptyCollection { kind: RecordKind },

    /// Operation did not finish in time
    #[error("request to {action} {} timed out after {}ms", .kind.noun(false), .after.as_millis())]
    Timeout {
        kind: RecordKind,
        action: Action,
        after: Duration,
    },

    /// Background task running the operation failed
    #[error("failed to {action} {}: {reason}", .kind.noun(false))]
    Internal {
        kind: RecordKind,
        action: Action,
        reason: String,
    },
}

impl ServiceError {
    /// Not-found error for a record id
    #[inline]
    #[must_use]
    pub fn not_found(kind: RecordKind, id: impl bizplan_model::Identity) -> Self {
        Self::NotFound { kind, id: id.raw() }
    }

    /// Check if error is retryable
    ///
    /// Missing records and bad input are permanent: retrying cannot change
    /// the outcome, so they surface on the first attempt.
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::EmptyCollection { .. } | Self::Internal { .. })
    }

    /// Check if error is a not-found error
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if error is a timeout
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Message suitable for showing to the person using the application
    ///
    /// Not-found and validation messages pass through verbatim so callers can
    /// branch on them; everything else is rewritten into a retry prompt.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound { .. } | Self::Validation(_) => self.to_string(),
            Self::Timeout { kind, action, .. } => format!(
                "Failed to {action} {}: Request timed out. Please check your connection and try again.",
                kind.noun(*action == Action::LoadAll)
            ),
            Self::EmptyCollection { kind } => {
                format!("Failed to load {}. Please try again later.", kind.noun(true))
            }
            Self::Internal { kind, action, .. } => format!(
                "Failed to {action} {}. Please try again later.",
                kind.noun(*action == Action::LoadAll)
            ),
        }
    }
}

impl From<ModelError> for ServiceError {
    fn from(err: ModelError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Errors raised while loading bundled or external fixture data
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    /// Fixture JSON did not match the model
    #[error("invalid {collection} fixture: {source}")]
    Parse {
        collection: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Two records share an identity
    #[error("duplicate id {id} in {collection} fixture")]
    DuplicateId { collection: &'static str, id: u64 },

    /// Two records belong to the same project
    #[error("project {project_id} owns more than one record in {collection} fixture")]
    DuplicateProject {
        collection: &'static str,
        project_id: u64,
    },

    /// A record carries the reserved id 0
    #[error("record with id 0 in {collection} fixture")]
    ZeroId { collection: &'static str },

    /// Fixture file could not be read
    #[error("failed to read fixture {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML did not match the config schema
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Value outside its allowed range
    #[error("invalid configuration value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}
