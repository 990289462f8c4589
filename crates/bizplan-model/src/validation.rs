//! Idea-validation records
//!
//! Scores are kept per framework and per section. A record is created the
//! first time a project opens the validation center and then edited one score
//! at a time.

use crate::error::ModelError;
use crate::ids::{ProjectId, ValidationId};
use crate::record::{Patch, Record, RecordKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Scoring rubric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FrameworkId {
    /// Lean Canvas
    LeanCanvas,
    /// SWOT analysis
    Swot,
    /// Customer validation
    CustomerValidation,
}

impl FrameworkId {
    /// All frameworks in display order
    pub const ALL: [FrameworkId; 3] = [
        FrameworkId::LeanCanvas,
        FrameworkId::Swot,
        FrameworkId::CustomerValidation,
    ];

    /// Wire name
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FrameworkId::LeanCanvas => "lean-canvas",
            FrameworkId::Swot => "swot",
            FrameworkId::CustomerValidation => "customer-validation",
        }
    }

    /// Catalog entry
    #[must_use]
    pub fn framework(self) -> &'static Framework {
        match self {
            FrameworkId::LeanCanvas => &FRAMEWORKS[0],
            FrameworkId::Swot => &FRAMEWORKS[1],
            FrameworkId::CustomerValidation => &FRAMEWORKS[2],
        }
    }
}

impl std::fmt::Display for FrameworkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FrameworkId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| ModelError::UnknownVariant {
                what: "framework",
                value: s.to_string(),
            })
    }
}

/// A scoring slot inside a framework
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameworkSection {
    /// Key in `ValidationRecord::scores`
    pub id: &'static str,
    /// Display title
    pub title: &'static str,
    /// Prompt shown to the user
    pub description: &'static str,
}

/// Framework catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Framework {
    /// Identity
    pub id: FrameworkId,
    /// Display name
    pub name: &'static str,
    /// Summary
    pub description: &'static str,
    /// Sections in display order
    pub sections: &'static [FrameworkSection],
}

impl Framework {
    /// Whether `section` belongs to this framework
    #[must_use]
    pub fn has_section(&self, section: &str) -> bool {
        self.sections.iter().any(|s| s.id == section)
    }
}

const fn section(
    id: &'static str,
    title: &'static str,
    description: &'static str,
) -> FrameworkSection {
    FrameworkSection {
        id,
        title,
        description,
    }
}

const LEAN_CANVAS_SECTIONS: &[FrameworkSection] = &[
    section("problem", "Problem", "What problem are you solving?"),
    section("solution", "Solution", "How do you solve the problem?"),
    section("key-metrics", "Key Metrics", "How do you measure success?"),
    section(
        "value-proposition",
        "Unique Value Proposition",
        "What makes you different?",
    ),
    section("unfair-advantage", "Unfair Advantage", "What can't be copied?"),
    section("channels", "Channels", "How do you reach customers?"),
    section(
        "customer-segments",
        "Customer Segments",
        "Who are your customers?",
    ),
    section("cost-structure", "Cost Structure", "What are your costs?"),
    section("revenue-streams", "Revenue Streams", "How do you make money?"),
];

const SWOT_SECTIONS: &[FrameworkSection] = &[
    section("strengths", "Strengths", "Internal positive factors"),
    section("weaknesses", "Weaknesses", "Internal negative factors"),
    section("opportunities", "Opportunities", "External positive factors"),
    section("threats", "Threats", "External negative factors"),
];

const CUSTOMER_VALIDATION_SECTIONS: &[FrameworkSection] = &[
    section(
        "customer-interviews",
        "Customer Interviews",
        "Interview results and insights",
    ),
    section("surveys", "Surveys", "Survey data and analysis"),
    section("mvp-feedback", "MVP Feedback", "Minimum viable product testing"),
    section(
        "market-research",
        "Market Research",
        "Industry and competitor analysis",
    ),
];

/// The three validation frameworks
pub const FRAMEWORKS: [Framework; 3] = [
    Framework {
        id: FrameworkId::LeanCanvas,
        name: "Lean Canvas",
        description: "Validate your business model with 9 key building blocks",
        sections: LEAN_CANVAS_SECTIONS,
    },
    Framework {
        id: FrameworkId::Swot,
        name: "SWOT Analysis",
        description: "Analyze Strengths, Weaknesses, Opportunities, and Threats",
        sections: SWOT_SECTIONS,
    },
    Framework {
        id: FrameworkId::CustomerValidation,
        name: "Customer Validation",
        description: "Validate your assumptions with real customer feedback",
        sections: CUSTOMER_VALIDATION_SECTIONS,
    },
];

/// Recommendation urgency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Nice to have
    Low,
    /// Should address
    Medium,
    /// Address first
    High,
}

/// Suggested next step for a framework
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// Framework the advice applies to
    pub framework: FrameworkId,
    /// Headline
    pub title: String,
    /// Body
    pub description: String,
    /// Urgency
    pub priority: Priority,
    /// Call-to-action label
    pub action_text: String,
    /// Call-to-action target
    pub action_url: String,
}

/// Section scores of one framework
pub type SectionScores = BTreeMap<String, u8>;

/// Validation record of one project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRecord {
    /// Identity
    pub id: ValidationId,
    /// Owning project
    pub project_id: ProjectId,
    /// Framework last worked on
    pub framework: FrameworkId,
    /// Framework to section scores
    #[serde(default)]
    pub scores: BTreeMap<FrameworkId, SectionScores>,
    /// Advice entries
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
    /// Last modification time
    pub timestamp: DateTime<Utc>,
}

impl ValidationRecord {
    /// Build a stored record from a draft
    #[must_use]
    pub fn from_draft(id: ValidationId, draft: NewValidationRecord, now: DateTime<Utc>) -> Self {
        Self {
            id,
            project_id: draft.project_id,
            framework: draft.framework,
            scores: draft.scores,
            recommendations: draft.recommendations,
            timestamp: now,
        }
    }

    /// Starter record synthesized for a project that has none
    #[must_use]
    pub fn starter(id: ValidationId, project_id: ProjectId, now: DateTime<Utc>) -> Self {
        Self::from_draft(id, NewValidationRecord::starter(project_id), now)
    }

    /// Merge one section score
    ///
    /// # Errors
    /// Returns `ModelError` when the section is not part of `framework` or the
    /// score exceeds 100.
    pub fn set_score(
        &mut self,
        framework: FrameworkId,
        section: &str,
        score: u32,
    ) -> Result<(), ModelError> {
        check_score(framework, section, score)?;
        self.scores
            .entry(framework)
            .or_default()
            .insert(section.to_string(), score as u8);
        self.framework = framework;
        Ok(())
    }

    /// Scores recorded for a framework
    #[must_use]
    pub fn framework_scores(&self, framework: FrameworkId) -> Option<&SectionScores> {
        self.scores.get(&framework)
    }

    /// Recommendations for one framework
    pub fn recommendations_for(
        &self,
        framework: FrameworkId,
    ) -> impl Iterator<Item = &Recommendation> {
        self.recommendations
            .iter()
            .filter(move |r| r.framework == framework)
    }
}

/// Check a score before it is merged
///
/// # Errors
/// Returns `ModelError::UnknownSection` or `ModelError::ScoreOutOfRange`.
pub fn check_score(framework: FrameworkId, section: &str, score: u32) -> Result<(), ModelError> {
    if !framework.framework().has_section(section) {
        return Err(ModelError::UnknownSection {
            scope: framework.to_string(),
            section: section.to_string(),
        });
    }
    if score > 100 {
        return Err(ModelError::ScoreOutOfRange(score));
    }
    Ok(())
}

/// Check every score of a score table
///
/// # Errors
/// Returns the first failure of [`check_score`].
pub fn check_scores(scores: &BTreeMap<FrameworkId, SectionScores>) -> Result<(), ModelError> {
    for (framework, sections) in scores {
        for (section, score) in sections {
            check_score(*framework, section, u32::from(*score))?;
        }
    }
    Ok(())
}

impl Record for ValidationRecord {
    type Id = ValidationId;
    const KIND: RecordKind = RecordKind::Validation;

    #[inline]
    fn id(&self) -> ValidationId {
        self.id
    }

    #[inline]
    fn set_id(&mut self, id: ValidationId) {
        self.id = id;
    }

    #[inline]
    fn touch(&mut self, now: DateTime<Utc>) {
        self.timestamp = now;
    }

    #[inline]
    fn pin(&mut self, original: &Self) {
        self.project_id = original.project_id;
    }
}

/// Input for creating a validation record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewValidationRecord {
    /// Owning project
    pub project_id: ProjectId,
    /// Active framework
    pub framework: FrameworkId,
    /// Initial scores
    #[serde(default)]
    pub scores: BTreeMap<FrameworkId, SectionScores>,
    /// Initial recommendations
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
}

fn scores(entries: &[(&str, u8)]) -> SectionScores {
    entries.iter().map(|(k, v)| ((*k).to_string(), *v)).collect()
}

impl NewValidationRecord {
    /// Record with no scores
    #[must_use]
    pub fn new(project_id: ProjectId) -> Self {
        Self {
            project_id,
            framework: FrameworkId::LeanCanvas,
            scores: BTreeMap::new(),
            recommendations: Vec::new(),
        }
    }

    /// Default scores and advice for a project opening the validation center
    #[must_use]
    pub fn starter(project_id: ProjectId) -> Self {
        let mut all = BTreeMap::new();
        all.insert(
            FrameworkId::LeanCanvas,
            scores(&[
                ("problem", 75),
                ("solution", 80),
                ("key-metrics", 60),
                ("value-proposition", 85),
                ("unfair-advantage", 50),
                ("channels", 70),
                ("customer-segments", 75),
                ("cost-structure", 65),
                ("revenue-streams", 80),
            ]),
        );
        all.insert(
            FrameworkId::Swot,
            scores(&[
                ("strengths", 80),
                ("weaknesses", 60),
                ("opportunities", 75),
                ("threats", 55),
            ]),
        );
        all.insert(
            FrameworkId::CustomerValidation,
            scores(&[
                ("customer-interviews", 70),
                ("surveys", 65),
                ("mvp-feedback", 60),
                ("market-research", 75),
            ]),
        );

        Self {
            project_id,
            framework: FrameworkId::LeanCanvas,
            scores: all,
            recommendations: vec![
                Recommendation {
                    framework: FrameworkId::LeanCanvas,
                    title: "Strengthen Unfair Advantage".into(),
                    description: "Your unfair advantage score is low. Consider what unique \
                                  assets or capabilities give you a competitive edge."
                        .into(),
                    priority: Priority::High,
                    action_text: "Improve Score".into(),
                    action_url: "/validation".into(),
                },
                Recommendation {
                    framework: FrameworkId::Swot,
                    title: "Address Key Weaknesses".into(),
                    description: "Identify and create plans to address your most critical \
                                  weaknesses."
                        .into(),
                    priority: Priority::Medium,
                    action_text: "View Details".into(),
                    action_url: "/validation".into(),
                },
            ],
        }
    }
}

/// Partial update of a validation record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationPatch {
    /// New active framework
    pub framework: Option<FrameworkId>,
    /// Replacement scores
    pub scores: Option<BTreeMap<FrameworkId, SectionScores>>,
    /// Replacement recommendations
    pub recommendations: Option<Vec<Recommendation>>,
}

impl Patch<ValidationRecord> for ValidationPatch {
    fn validate(&self) -> Result<(), ModelError> {
        if self == &Self::default() {
            return Err(ModelError::EmptyPatch);
        }
        self.scores.as_ref().map_or(Ok(()), check_scores)
    }

    fn apply(self, record: &mut ValidationRecord) {
        if let Some(framework) = self.framework {
            record.framework = framework;
        }
        if let Some(scores) = self.scores {
            record.scores = scores;
        }
        if let Some(recommendations) = self.recommendations {
            record.recommendations = recommendations;
        }
    }
}

/// Wholesale save from the validation center
///
/// The owning project stays that of the stored record.
impl Patch<ValidationRecord> for ValidationRecord {
    fn validate(&self) -> Result<(), ModelError> {
        check_scores(&self.scores)
    }

    fn apply(self, record: &mut ValidationRecord) {
        *record = self;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_section_counts() {
        assert_eq!(FrameworkId::LeanCanvas.framework().sections.len(), 9);
        assert_eq!(FrameworkId::Swot.framework().sections.len(), 4);
        assert_eq!(FrameworkId::CustomerValidation.framework().sections.len(), 4);
    }

    #[test]
    fn starter_scores_cover_every_section() {
        let draft = NewValidationRecord::starter(ProjectId(1));
        for fw in FrameworkId::ALL {
            let recorded = &draft.scores[&fw];
            assert_eq!(recorded.len(), fw.framework().sections.len());
            assert!(recorded.keys().all(|k| fw.framework().has_section(k)));
        }
    }

    #[test]
    fn set_score_validates_section_and_range() {
        let mut record =
            ValidationRecord::from_draft(ValidationId(1), NewValidationRecord::new(ProjectId(2)), Utc::now());
        assert!(record.set_score(FrameworkId::Swot, "strengths", 90).is_ok());
        assert_eq!(record.framework, FrameworkId::Swot);
        assert!(matches!(
            record.set_score(FrameworkId::Swot, "problem", 50),
            Err(ModelError::UnknownSection { .. })
        ));
        assert_eq!(
            record.set_score(FrameworkId::LeanCanvas, "problem", 101),
            Err(ModelError::ScoreOutOfRange(101))
        );
    }

    #[test]
    fn framework_keys_serialize_kebab_case() {
        let draft = NewValidationRecord::starter(ProjectId(1));
        let value = serde_json::to_value(&draft).unwrap();
        assert!(value["scores"].get("customer-validation").is_some());
        assert_eq!(value["recommendations"][0]["priority"], "high");
    }

    #[test]
    fn recommendations_grouped_by_framework() {
        let record = ValidationRecord::starter(ValidationId(1), ProjectId(1), Utc::now());
        let lean: Vec<_> = record.recommendations_for(FrameworkId::LeanCanvas).collect();
        assert_eq!(lean.len(), 1);
        assert_eq!(lean[0].priority, Priority::High);
        assert_eq!(record.recommendations_for(FrameworkId::Swot).count(), 1);
        assert_eq!(record.recommendations_for(FrameworkId::CustomerValidation).count(), 0);
    }

    #[test]
    fn wholesale_save_checks_every_score() {
        let mut record = ValidationRecord::starter(ValidationId(1), ProjectId(1), Utc::now());
        assert!(Patch::<ValidationRecord>::validate(&record).is_ok());

        record
            .scores
            .entry(FrameworkId::Swot)
            .or_default()
            .insert("threats".into(), 200);
        assert_eq!(
            Patch::<ValidationRecord>::validate(&record),
            Err(ModelError::ScoreOutOfRange(200))
        );

        let mut record = ValidationRecord::starter(ValidationId(1), ProjectId(1), Utc::now());
        record
            .scores
            .entry(FrameworkId::Swot)
            .or_default()
            .insert("problem".into(), 50);
        assert!(matches!(
            Patch::<ValidationRecord>::validate(&record),
            Err(ModelError::UnknownSection { .. })
        ));
    }

    #[test]
    fn pin_keeps_owning_project() {
        let stored = ValidationRecord::starter(ValidationId(1), ProjectId(1), Utc::now());
        let mut moved = ValidationRecord::starter(ValidationId(1), ProjectId(2), Utc::now());
        moved.pin(&stored);
        assert_eq!(moved.project_id, ProjectId(1));
    }
}
