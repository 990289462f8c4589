//! Business-plan projects
//!
//! A project is the unit a user edits in the plan editor. Its `sections`
//! map holds free-form content per plan section; the counters next to it are
//! kept in step by section saves.

use crate::error::ModelError;
use crate::ids::{ProjectId, TemplateId};
use crate::record::{Patch, Record, RecordKind};
use crate::template::Template;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::str::FromStr;

/// A named content slot in the plan editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanSection {
    /// Key used in `Project::sections`
    pub id: &'static str,
    /// Display title
    pub title: &'static str,
    /// Short description
    pub description: &'static str,
}

/// The sections every business plan is made of, in editor order
pub const PLAN_SECTIONS: [PlanSection; 8] = [
    PlanSection {
        id: "executive-summary",
        title: "Executive Summary",
        description: "Brief overview of your business",
    },
    PlanSection {
        id: "company-description",
        title: "Company Description",
        description: "Detailed company information",
    },
    PlanSection {
        id: "market-analysis",
        title: "Market Analysis",
        description: "Industry and market research",
    },
    PlanSection {
        id: "organization",
        title: "Organization & Management",
        description: "Company structure and team",
    },
    PlanSection {
        id: "products-services",
        title: "Products & Services",
        description: "What you offer to customers",
    },
    PlanSection {
        id: "marketing-sales",
        title: "Marketing & Sales",
        description: "How you will reach customers",
    },
    PlanSection {
        id: "financial-projections",
        title: "Financial Projections",
        description: "Revenue and expense forecasts",
    },
    PlanSection {
        id: "funding-request",
        title: "Funding Request",
        description: "Capital requirements",
    },
];

/// Look up a plan section by key
#[must_use]
pub fn plan_section(id: &str) -> Option<&'static PlanSection> {
    PLAN_SECTIONS.iter().find(|s| s.id == id)
}

/// Reject keys outside the plan-section catalog
///
/// # Errors
/// Returns `ModelError::UnknownSection` for an unknown key.
pub fn check_plan_section(key: &str) -> Result<(), ModelError> {
    match plan_section(key) {
        Some(_) => Ok(()),
        None => Err(ModelError::UnknownSection {
            scope: "business plan".to_string(),
            section: key.to_string(),
        }),
    }
}

/// Lifecycle status of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    /// Just created
    #[default]
    Draft,
    /// Being worked on
    InProgress,
    /// Finished
    Completed,
}

impl ProjectStatus {
    /// Wire name
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectStatus::Draft => "draft",
            ProjectStatus::InProgress => "in-progress",
            ProjectStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(ProjectStatus::Draft),
            "in-progress" => Ok(ProjectStatus::InProgress),
            "completed" => Ok(ProjectStatus::Completed),
            other => Err(ModelError::UnknownVariant {
                what: "project status",
                value: other.to_string(),
            }),
        }
    }
}

/// Business-plan project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Identity
    pub id: ProjectId,
    /// Project name
    pub name: String,
    /// Free-text description
    pub description: String,
    /// Lifecycle status
    pub status: ProjectStatus,
    /// Completion (0-100)
    pub completion_percentage: u8,
    /// Number of sections with content
    pub completed_sections: u32,
    /// Number of sections in the plan
    pub total_sections: u32,
    /// Validation score (0-100)
    pub validation_score: u8,
    /// Projected revenue, in thousands
    pub projected_revenue: f64,
    /// Section key to free-form content
    #[serde(default)]
    pub sections: BTreeMap<String, JsonValue>,
    /// Template the project was seeded from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<TemplateId>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Build a stored project from a draft
    #[must_use]
    pub fn from_draft(id: ProjectId, draft: NewProject, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            status: draft.status,
            completion_percentage: draft.completion_percentage,
            completed_sections: draft.completed_sections,
            total_sections: draft.total_sections,
            validation_score: draft.validation_score,
            projected_revenue: draft.projected_revenue,
            sections: draft.sections,
            template_id: draft.template_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Completion derived from the populated section keys
    #[must_use]
    pub fn section_completion(&self) -> u8 {
        section_completion(self.sections.len())
    }

    /// Store `content` under `key` and refresh the completion counters
    pub fn put_section(&mut self, key: impl Into<String>, content: JsonValue) {
        self.sections.insert(key.into(), content);
        self.completed_sections = u32::try_from(self.sections.len()).unwrap_or(u32::MAX);
        self.completion_percentage = self.section_completion();
    }
}

/// Percentage of plan sections covered by `populated` keys
#[must_use]
pub fn section_completion(populated: usize) -> u8 {
    let pct = (populated as f64 / PLAN_SECTIONS.len() as f64 * 100.0).round();
    // Saturate: extra keys beyond the catalog never push past 100
    pct.min(100.0) as u8
}

impl Record for Project {
    type Id = ProjectId;
    const KIND: RecordKind = RecordKind::Project;

    #[inline]
    fn id(&self) -> ProjectId {
        self.id
    }

    #[inline]
    fn set_id(&mut self, id: ProjectId) {
        self.id = id;
    }

    #[inline]
    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

/// Input for creating a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    /// Project name
    pub name: String,
    /// Free-text description
    pub description: String,
    /// Initial status
    #[serde(default)]
    pub status: ProjectStatus,
    /// Initial completion
    #[serde(default)]
    pub completion_percentage: u8,
    /// Initial completed-section count
    #[serde(default)]
    pub completed_sections: u32,
    /// Section count
    #[serde(default = "default_total_sections")]
    pub total_sections: u32,
    /// Initial validation score
    #[serde(default)]
    pub validation_score: u8,
    /// Projected revenue, in thousands
    #[serde(default)]
    pub projected_revenue: f64,
    /// Initial sections
    #[serde(default)]
    pub sections: BTreeMap<String, JsonValue>,
    /// Template the project is seeded from
    #[serde(default)]
    pub template_id: Option<TemplateId>,
}

fn default_total_sections() -> u32 {
    PLAN_SECTIONS.len() as u32
}

impl NewProject {
    /// Blank draft project
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            status: ProjectStatus::Draft,
            completion_percentage: 0,
            completed_sections: 0,
            total_sections: default_total_sections(),
            validation_score: 0,
            projected_revenue: 0.0,
            sections: BTreeMap::new(),
            template_id: None,
        }
    }

    /// Draft seeded from a template
    #[must_use]
    pub fn from_template(template: &Template, name: impl Into<String>) -> Self {
        let mut draft = Self::new(name, template.description.clone());
        draft.total_sections = template.sections;
        draft.template_id = Some(template.id);
        draft
    }

    /// With status
    #[inline]
    #[must_use]
    pub fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = status;
        self
    }

    /// With projected revenue
    #[inline]
    #[must_use]
    pub fn with_projected_revenue(mut self, revenue: f64) -> Self {
        self.projected_revenue = revenue;
        self
    }

    /// With completion percentage
    #[inline]
    #[must_use]
    pub fn with_completion(mut self, pct: u8) -> Self {
        self.completion_percentage = pct.min(100);
        self
    }

    /// Check required fields
    ///
    /// # Errors
    /// Returns `ModelError::BlankField` when the name is blank.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.name.trim().is_empty() {
            return Err(ModelError::BlankField {
                field: "Project name",
            });
        }
        Ok(())
    }
}

/// Partial update of a project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
    /// New name
    pub name: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New status
    pub status: Option<ProjectStatus>,
    /// New completion
    pub completion_percentage: Option<u8>,
    /// New completed-section count
    pub completed_sections: Option<u32>,
    /// New validation score
    pub validation_score: Option<u8>,
    /// New projected revenue
    pub projected_revenue: Option<f64>,
    /// Replacement sections map
    pub sections: Option<BTreeMap<String, JsonValue>>,
}

impl ProjectPatch {
    /// Whether the patch carries no change
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl Patch<Project> for ProjectPatch {
    fn validate(&self) -> Result<(), ModelError> {
        if self.is_empty() {
            return Err(ModelError::EmptyPatch);
        }
        if matches!(&self.name, Some(name) if name.trim().is_empty()) {
            return Err(ModelError::BlankField {
                field: "Project name",
            });
        }
        Ok(())
    }

    fn apply(self, record: &mut Project) {
        if let Some(name) = self.name {
            record.name = name;
        }
        if let Some(description) = self.description {
            record.description = description;
        }
        if let Some(status) = self.status {
            record.status = status;
        }
        if let Some(pct) = self.completion_percentage {
            record.completion_percentage = pct.min(100);
        }
        if let Some(count) = self.completed_sections {
            record.completed_sections = count;
        }
        if let Some(score) = self.validation_score {
            record.validation_score = score.min(100);
        }
        if let Some(revenue) = self.projected_revenue {
            record.projected_revenue = revenue;
        }
        if let Some(sections) = self.sections {
            record.sections = sections;
        }
    }
}

/// Whole-record save, as the plan editor does
impl Patch<Project> for Project {
    fn validate(&self) -> Result<(), ModelError> {
        if self.name.trim().is_empty() {
            return Err(ModelError::BlankField {
                field: "Project name",
            });
        }
        Ok(())
    }

    fn apply(self, record: &mut Project) {
        *record = self;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn project() -> Project {
        Project::from_draft(ProjectId(1), NewProject::new("Cafe", "Coffee"), Utc::now())
    }

    #[test]
    fn status_round_trips_through_text() {
        for status in [
            ProjectStatus::Draft,
            ProjectStatus::InProgress,
            ProjectStatus::Completed,
        ] {
            assert_eq!(status.as_str().parse::<ProjectStatus>().unwrap(), status);
        }
        assert!("archived".parse::<ProjectStatus>().is_err());
    }

    #[test]
    fn completion_counts_section_keys() {
        assert_eq!(section_completion(0), 0);
        assert_eq!(section_completion(3), 38);
        assert_eq!(section_completion(8), 100);
        assert_eq!(section_completion(11), 100);
    }

    #[test]
    fn put_section_refreshes_counters() {
        let mut p = project();
        p.put_section("executive-summary", json!({"text": "We sell coffee"}));
        p.put_section("market-analysis", json!({"text": "Big market"}));
        assert_eq!(p.completed_sections, 2);
        assert_eq!(p.completion_percentage, 25);
        assert!(p.sections.contains_key("market-analysis"));
    }

    #[test]
    fn empty_section_object_still_counts() {
        let mut p = project();
        p.put_section("organization", json!({}));
        assert_eq!(p.completed_sections, 1);
        assert_eq!(p.completion_percentage, 13);
    }

    #[test]
    fn patch_rejects_blank_name_and_empty_patch() {
        assert_eq!(
            Patch::<Project>::validate(&ProjectPatch::default()),
            Err(ModelError::EmptyPatch)
        );
        let blank = ProjectPatch {
            name: Some("  ".into()),
            ..ProjectPatch::default()
        };
        assert!(Patch::<Project>::validate(&blank).is_err());
    }

    #[test]
    fn patch_merges_present_fields_only() {
        let mut p = project();
        ProjectPatch {
            status: Some(ProjectStatus::InProgress),
            ..ProjectPatch::default()
        }
        .apply(&mut p);
        assert_eq!(p.status, ProjectStatus::InProgress);
        assert_eq!(p.name, "Cafe");
    }

    #[test]
    fn camel_case_wire_shape() {
        let value = serde_json::to_value(project()).unwrap();
        assert!(value.get("completionPercentage").is_some());
        assert_eq!(value["status"], "draft");
    }
}
