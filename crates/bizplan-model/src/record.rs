//! Record and patch traits shared by every stored entity

use crate::error::ModelError;
use crate::ids::Identity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of record held by a collection, used in messages and logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordKind {
    /// Business-plan project
    Project,
    /// Financial model
    FinancialModel,
    /// Plan template
    Template,
    /// Validation record
    Validation,
    /// Analytics snapshot
    Analytics,
}

impl RecordKind {
    /// Singular, human-readable label
    #[inline]
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            RecordKind::Project => "Project",
            RecordKind::FinancialModel => "Financial model",
            RecordKind::Template => "Template",
            RecordKind::Validation => "Validation data",
            RecordKind::Analytics => "Analytics",
        }
    }

    /// Lowercase noun used in "Failed to load ..." messages
    #[inline]
    #[must_use]
    pub fn noun(self, plural: bool) -> &'static str {
        match (self, plural) {
            (RecordKind::Project, false) => "project",
            (RecordKind::Project, true) => "projects",
            (RecordKind::FinancialModel, false) => "financial model",
            (RecordKind::FinancialModel, true) => "financial models",
            (RecordKind::Template, false) => "template",
            (RecordKind::Template, true) => "templates",
            (RecordKind::Validation, _) => "validation data",
            (RecordKind::Analytics, _) => "analytics",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// An entity stored in an in-memory collection
pub trait Record: Clone + Send + Sync + 'static {
    /// Identifier type
    type Id: Identity;

    /// Kind of record
    const KIND: RecordKind;

    /// Current identity
    fn id(&self) -> Self::Id;

    /// Overwrite the identity field
    fn set_id(&mut self, id: Self::Id);

    /// Stamp the modification time
    fn touch(&mut self, now: DateTime<Utc>);

    /// Restore fields fixed at creation, other than the identity, from
    /// `original` after an edit
    #[inline]
    fn pin(&mut self, _original: &Self) {}
}

/// A change applied to an existing record
///
/// Patches are shallow: each present field replaces the record's field
/// wholesale. The store restores the identity and every [`Record::pin`]ned
/// field after `apply`, so a patch can never move a record to another id or
/// another owner.
pub trait Patch<R>: Send + 'static {
    /// Check the patch before it touches the collection
    ///
    /// # Errors
    /// Returns `ModelError` when the patch is empty or carries invalid values.
    fn validate(&self) -> Result<(), ModelError> {
        Ok(())
    }

    /// Merge into `record`
    fn apply(self, record: &mut R);
}
