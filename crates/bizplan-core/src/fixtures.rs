//! Fixture data the services start from
//!
//! The bundled set is compiled into the crate. A directory holding files
//! with the same names can replace it at runtime.

use crate::error::FixtureError;
use bizplan_model::{
    AnalyticsSnapshot, FinancialModel, Identity, Project, ProjectId, Record, Template,
    ValidationRecord,
};
use serde::de::DeserializeOwned;
use std::collections::BTreeSet;
use std::path::Path;

const PROJECTS: &str = include_str!("../fixtures/projects.json");
const FINANCIAL_MODELS: &str = include_str!("../fixtures/financial_models.json");
const TEMPLATES: &str = include_str!("../fixtures/templates.json");
const VALIDATION: &str = include_str!("../fixtures/validation.json");
const ANALYTICS: &str = include_str!("../fixtures/analytics.json");

/// Initial contents of every collection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fixtures {
    /// Projects
    pub projects: Vec<Project>,
    /// Financial models
    pub financial_models: Vec<FinancialModel>,
    /// Template gallery
    pub templates: Vec<Template>,
    /// Validation records
    pub validation: Vec<ValidationRecord>,
    /// Analytics snapshot
    pub analytics: AnalyticsSnapshot,
}

impl Fixtures {
    /// Data bundled with the crate
    ///
    /// # Errors
    /// Returns `FixtureError` if the bundled JSON is malformed.
    pub fn bundled() -> Result<Self, FixtureError> {
        Self::from_json(&FixtureSources {
            projects: PROJECTS,
            financial_models: FINANCIAL_MODELS,
            templates: TEMPLATES,
            validation: VALIDATION,
            analytics: ANALYTICS,
        })
    }

    /// Load `projects.json`, `financial_models.json`, `templates.json`,
    /// `validation.json` and `analytics.json` from `dir`
    ///
    /// # Errors
    /// Returns `FixtureError` when a file is missing or malformed.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let dir = dir.as_ref();
        let read = |name: &str| {
            let path = dir.join(name);
            std::fs::read_to_string(&path).map_err(|source| FixtureError::Io {
                path: path.display().to_string(),
                source,
            })
        };
        let projects = read("projects.json")?;
        let financial_models = read("financial_models.json")?;
        let templates = read("templates.json")?;
        let validation = read("validation.json")?;
        let analytics = read("analytics.json")?;

        tracing::debug!(dir = %dir.display(), "loading fixtures");
        Self::from_json(&FixtureSources {
            projects: &projects,
            financial_models: &financial_models,
            templates: &templates,
            validation: &validation,
            analytics: &analytics,
        })
    }

    /// Parse every collection from JSON text
    ///
    /// # Errors
    /// Returns `FixtureError` on malformed JSON, a repeated or zero id, or a
    /// project owning two financial models or validation records.
    pub fn from_json(sources: &FixtureSources<'_>) -> Result<Self, FixtureError> {
        let financial_models: Vec<FinancialModel> =
            parse_collection("financial models", sources.financial_models)?;
        check_one_per_project("financial models", &financial_models, |m| m.project_id)?;
        let validation: Vec<ValidationRecord> =
            parse_collection("validation", sources.validation)?;
        check_one_per_project("validation", &validation, |r| r.project_id)?;

        Ok(Self {
            projects: parse_collection("projects", sources.projects)?,
            financial_models,
            templates: parse_collection("templates", sources.templates)?,
            validation,
            analytics: serde_json::from_str(sources.analytics).map_err(|source| {
                FixtureError::Parse {
                    collection: "analytics",
                    source,
                }
            })?,
        })
    }
}

/// JSON text of each collection
#[derive(Debug, Clone, Copy)]
pub struct FixtureSources<'a> {
    /// Array of projects
    pub projects: &'a str,
    /// Array of financial models
    pub financial_models: &'a str,
    /// Array of templates
    pub templates: &'a str,
    /// Array of validation records
    pub validation: &'a str,
    /// Analytics snapshot object
    pub analytics: &'a str,
}

/// Parse a JSON array of records, rejecting zero and repeated ids
///
/// # Errors
/// Returns `FixtureError` when the JSON does not match `R` or ids clash.
pub fn parse_collection<R>(collection: &'static str, json: &str) -> Result<Vec<R>, FixtureError>
where
    R: Record + DeserializeOwned,
{
    let records: Vec<R> = serde_json::from_str(json)
        .map_err(|source| FixtureError::Parse { collection, source })?;

    let mut seen = BTreeSet::new();
    for record in &records {
        let id = record.id();
        if !id.is_valid() {
            return Err(FixtureError::ZeroId { collection });
        }
        if !seen.insert(id) {
            return Err(FixtureError::DuplicateId {
                collection,
                id: id.raw(),
            });
        }
    }
    Ok(records)
}

/// Reject a collection in which two records share an owning project
///
/// # Errors
/// Returns `FixtureError::DuplicateProject` naming the first repeated project.
pub fn check_one_per_project<R>(
    collection: &'static str,
    records: &[R],
    owner: impl Fn(&R) -> ProjectId,
) -> Result<(), FixtureError> {
    let mut seen = BTreeSet::new();
    for record in records {
        let project_id = owner(record);
        if !seen.insert(project_id) {
            return Err(FixtureError::DuplicateProject {
                collection,
                project_id: project_id.raw(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizplan_model::{ProjectId, ProjectStatus, TemplateCategory};

    #[test]
    fn bundled_fixtures_parse() {
        let fixtures = Fixtures::bundled().unwrap();
        assert_eq!(fixtures.projects.len(), 4);
        assert_eq!(fixtures.projects[0].id, ProjectId(1));
        assert_eq!(fixtures.projects[0].status, ProjectStatus::InProgress);
        assert_eq!(fixtures.financial_models.len(), 2);
        assert!(fixtures
            .templates
            .iter()
            .any(|t| t.category == TemplateCategory::Manufacturing));
        assert_eq!(fixtures.validation.len(), 2);
        assert_eq!(fixtures.analytics.total_projects, 12.0);
    }

    #[test]
    fn bundled_section_counts_are_consistent() {
        let fixtures = Fixtures::bundled().unwrap();
        for project in &fixtures.projects {
            assert_eq!(project.completed_sections as usize, project.sections.len());
            assert_eq!(project.completion_percentage, project.section_completion());
        }
    }

    #[test]
    fn duplicate_ids_rejected() {
        let json = r#"[
            {"id": 1, "name": "A", "description": "", "category": "tech", "difficulty": "beginner",
             "sections": 8, "estimatedTime": "1h", "usageCount": 0},
            {"id": 1, "name": "B", "description": "", "category": "tech", "difficulty": "beginner",
             "sections": 8, "estimatedTime": "1h", "usageCount": 0}
        ]"#;
        let err = parse_collection::<Template>("templates", json).unwrap_err();
        assert!(matches!(err, FixtureError::DuplicateId { id: 1, .. }));
    }

    #[test]
    fn zero_id_rejected() {
        let json = r#"[{"id": 0, "name": "A", "description": "", "category": "tech",
            "difficulty": "beginner", "sections": 8, "estimatedTime": "1h", "usageCount": 0}]"#;
        let err = parse_collection::<Template>("templates", json).unwrap_err();
        assert!(matches!(err, FixtureError::ZeroId { .. }));
    }

    #[test]
    fn second_validation_record_for_project_rejected() {
        let record = |id: u64| {
            format!(
                r#"{{"id": {id}, "projectId": 3, "framework": "swot", "scores": {{}},
                    "recommendations": [], "timestamp": "2024-01-01T00:00:00Z"}}"#
            )
        };
        let json = format!("[{}, {}]", record(1), record(2));
        let sources = FixtureSources {
            projects: PROJECTS,
            financial_models: FINANCIAL_MODELS,
            templates: TEMPLATES,
            validation: &json,
            analytics: ANALYTICS,
        };
        let err = Fixtures::from_json(&sources).unwrap_err();
        assert!(matches!(
            err,
            FixtureError::DuplicateProject {
                collection: "validation",
                project_id: 3
            }
        ));
    }

    #[test]
    fn malformed_json_names_collection() {
        let err = parse_collection::<Project>("projects", "{").unwrap_err();
        assert!(err.to_string().starts_with("invalid projects fixture"));
    }

    #[test]
    fn missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Fixtures::from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, FixtureError::Io { .. }));
    }

    #[test]
    fn directory_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        for (name, body) in [
            ("projects.json", PROJECTS),
            ("financial_models.json", FINANCIAL_MODELS),
            ("templates.json", TEMPLATES),
            ("validation.json", VALIDATION),
            ("analytics.json", ANALYTICS),
        ] {
            std::fs::write(dir.path().join(name), body).unwrap();
        }
        assert_eq!(Fixtures::from_dir(dir.path()).unwrap(), Fixtures::bundled().unwrap());
    }
}
