//! Record identifiers
//!
//! Every collection numbers its records with positive integers. Each
//! collection gets its own newtype so a project id can never be used to look
//! up a template.

use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Common behaviour of all record identifiers
pub trait Identity:
    Copy + Eq + Ord + Hash + Debug + Display + Send + Sync + 'static
{
    /// Wrap a raw integer
    fn from_raw(raw: u64) -> Self;

    /// Raw integer value
    fn raw(self) -> u64;

    /// Identity that follows `self` when allocating sequentially, or `None`
    /// once the id space is used up
    #[inline]
    #[must_use]
    fn next(self) -> Option<Self> {
        self.raw().checked_add(1).map(Self::from_raw)
    }

    /// Whether this is a usable identity (zero is never assigned)
    #[inline]
    #[must_use]
    fn is_valid(self) -> bool {
        self.raw() > 0
    }

    /// Parse an identity from untrusted text
    ///
    /// # Errors
    /// Returns `ModelError::InvalidId` for empty, non-numeric or zero input.
    fn parse(raw: &str) -> Result<Self, ModelError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ModelError::InvalidId(raw.to_string()));
        }
        match trimmed.parse::<u64>() {
            Ok(0) | Err(_) => Err(ModelError::InvalidId(raw.to_string())),
            Ok(value) => Ok(Self::from_raw(value)),
        }
    }
}

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl Identity for $name {
            #[inline]
            fn from_raw(raw: u64) -> Self {
                Self(raw)
            }

            #[inline]
            fn raw(self) -> u64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }
    };
}

record_id!(
    /// Business-plan project identifier
    ProjectId
);
record_id!(
    /// Financial model identifier
    FinancialModelId
);
record_id!(
    /// Plan template identifier
    TemplateId
);
record_id!(
    /// Validation record identifier
    ValidationId
);
