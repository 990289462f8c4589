//! Error types for the entity model
//!
//! These cover input that cannot be represented by the model types: bad
//! identifiers, blank names, unknown sections and out-of-range scores.

/// Model-level input errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Identifier was empty, non-numeric or zero
    #[error("invalid ID provided: {0:?}")]
    InvalidId(String),

    /// A required text field was blank
    #[error("{field} cannot be empty")]
    BlankField { field: &'static str },

    /// Patch carried no changes
    #[error("update data is empty")]
    EmptyPatch,

    /// Section key is not part of the plan or framework
    #[error("unknown section {section:?} for {scope}")]
    UnknownSection { scope: String, section: String },

    /// Score outside 0..=100
    #[error("score {0} is out of range (0-100)")]
    ScoreOutOfRange(u32),

    /// Enum text did not match any variant
    #[error("unknown {what}: {value:?}")]
    UnknownVariant { what: &'static str, value: String },
}
