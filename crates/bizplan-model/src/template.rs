//! Plan templates (read-only gallery entries)

use crate::error::ModelError;
use crate::ids::TemplateId;
use crate::record::{Record, RecordKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Industry category of a template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateCategory {
    /// Technology
    Tech,
    /// Retail
    Retail,
    /// Services
    Service,
    /// Manufacturing
    Manufacturing,
}

impl TemplateCategory {
    /// All categories in gallery order
    pub const ALL: [TemplateCategory; 4] = [
        TemplateCategory::Tech,
        TemplateCategory::Retail,
        TemplateCategory::Service,
        TemplateCategory::Manufacturing,
    ];

    /// Wire name
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TemplateCategory::Tech => "tech",
            TemplateCategory::Retail => "retail",
            TemplateCategory::Service => "service",
            TemplateCategory::Manufacturing => "manufacturing",
        }
    }

    /// Gallery label
    #[inline]
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            TemplateCategory::Tech => "Technology",
            TemplateCategory::Retail => "Retail",
            TemplateCategory::Service => "Service",
            TemplateCategory::Manufacturing => "Manufacturing",
        }
    }
}

impl std::fmt::Display for TemplateCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateCategory {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ModelError::UnknownVariant {
                what: "template category",
                value: s.to_string(),
            })
    }
}

/// How demanding a template is to complete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Few sections, little jargon
    Beginner,
    /// Typical plan
    Intermediate,
    /// Investor-grade plan
    Advanced,
}

/// Template gallery entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    /// Identity
    pub id: TemplateId,
    /// Name
    pub name: String,
    /// Description
    pub description: String,
    /// Industry category
    pub category: TemplateCategory,
    /// Difficulty
    pub difficulty: Difficulty,
    /// Number of plan sections
    pub sections: u32,
    /// Human-readable estimate, e.g. "2-3 hours"
    pub estimated_time: String,
    /// Times used to seed a project
    pub usage_count: u64,
    /// Shown in the featured strip
    #[serde(default)]
    pub featured: bool,
}

impl Template {
    /// Case-insensitive match on name, description or category
    #[must_use]
    pub fn matches(&self, term: &str) -> bool {
        let needle = term.to_lowercase();
        self.name.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
            || self.category.as_str().contains(&needle)
    }
}

impl Record for Template {
    type Id = TemplateId;
    const KIND: RecordKind = RecordKind::Template;

    #[inline]
    fn id(&self) -> TemplateId {
        self.id
    }

    #[inline]
    fn set_id(&mut self, id: TemplateId) {
        self.id = id;
    }

    // Templates carry no timestamps
    #[inline]
    fn touch(&mut self, _now: DateTime<Utc>) {}
}
