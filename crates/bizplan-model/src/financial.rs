//! Financial models
//!
//! One model per project, holding revenue and expense line items. Totals are
//! never stored; see the financial metrics in `bizplan-core`.

use crate::error::ModelError;
use crate::ids::{FinancialModelId, ProjectId};
use crate::record::{Patch, Record, RecordKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Revenue or expense line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Position-stable id within its list
    pub id: u32,
    /// Label
    pub name: String,
    /// Amount in currency units
    #[serde(default)]
    pub amount: f64,
}

impl LineItem {
    /// Create line item
    #[inline]
    #[must_use]
    pub fn new(id: u32, name: impl Into<String>, amount: f64) -> Self {
        Self {
            id,
            name: name.into(),
            amount,
        }
    }
}

/// Projection series attached to a model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Projections {
    /// Monthly values
    #[serde(default)]
    pub monthly: Vec<f64>,
    /// Quarterly values
    #[serde(default)]
    pub quarterly: Vec<f64>,
    /// Yearly values
    #[serde(default)]
    pub yearly: Vec<f64>,
}

/// Revenue sensitivity scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    /// 80% of revenue
    Conservative,
    /// Revenue as modelled
    Realistic,
    /// 130% of revenue
    Optimistic,
}

impl Scenario {
    /// All scenarios, low to high
    pub const ALL: [Scenario; 3] = [
        Scenario::Conservative,
        Scenario::Realistic,
        Scenario::Optimistic,
    ];

    /// Revenue multiplier
    #[inline]
    #[must_use]
    pub fn multiplier(self) -> f64 {
        match self {
            Scenario::Conservative => 0.8,
            Scenario::Realistic => 1.0,
            Scenario::Optimistic => 1.3,
        }
    }

    /// Wire name
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Scenario::Conservative => "conservative",
            Scenario::Realistic => "realistic",
            Scenario::Optimistic => "optimistic",
        }
    }
}

impl FromStr for Scenario {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|sc| sc.as_str() == s)
            .ok_or_else(|| ModelError::UnknownVariant {
                what: "scenario",
                value: s.to_string(),
            })
    }
}

/// Financial model of one project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialModel {
    /// Identity
    pub id: FinancialModelId,
    /// Owning project
    pub project_id: ProjectId,
    /// Revenue lines, in entry order
    pub revenue: Vec<LineItem>,
    /// Expense lines, in entry order
    pub expenses: Vec<LineItem>,
    /// Projection series
    #[serde(default)]
    pub projections: Projections,
    /// Scenarios offered for sensitivity display
    #[serde(default = "default_scenarios")]
    pub scenarios: Vec<Scenario>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

fn default_scenarios() -> Vec<Scenario> {
    Scenario::ALL.to_vec()
}

impl FinancialModel {
    /// Build a stored model from a draft
    #[must_use]
    pub fn from_draft(id: FinancialModelId, draft: NewFinancialModel, now: DateTime<Utc>) -> Self {
        Self {
            id,
            project_id: draft.project_id,
            revenue: draft.revenue,
            expenses: draft.expenses,
            projections: draft.projections,
            scenarios: draft.scenarios,
            created_at: now,
            updated_at: now,
        }
    }

    /// Starter model synthesized for a project that has none
    #[must_use]
    pub fn starter(id: FinancialModelId, project_id: ProjectId, now: DateTime<Utc>) -> Self {
        Self::from_draft(id, NewFinancialModel::starter(project_id), now)
    }
}

impl Record for FinancialModel {
    type Id = FinancialModelId;
    const KIND: RecordKind = RecordKind::FinancialModel;

    #[inline]
    fn id(&self) -> FinancialModelId {
        self.id
    }

    #[inline]
    fn set_id(&mut self, id: FinancialModelId) {
        self.id = id;
    }

    #[inline]
    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    #[inline]
    fn pin(&mut self, original: &Self) {
        self.project_id = original.project_id;
        self.created_at = original.created_at;
    }
}

/// Input for creating a financial model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFinancialModel {
    /// Owning project
    pub project_id: ProjectId,
    /// Revenue lines
    #[serde(default)]
    pub revenue: Vec<LineItem>,
    /// Expense lines
    #[serde(default)]
    pub expenses: Vec<LineItem>,
    /// Projection series
    #[serde(default)]
    pub projections: Projections,
    /// Scenarios
    #[serde(default = "default_scenarios")]
    pub scenarios: Vec<Scenario>,
}

impl NewFinancialModel {
    /// Empty model for a project
    #[must_use]
    pub fn new(project_id: ProjectId) -> Self {
        Self {
            project_id,
            revenue: Vec::new(),
            expenses: Vec::new(),
            projections: Projections::default(),
            scenarios: default_scenarios(),
        }
    }

    /// Default line items used when a project opens the modeler first
    #[must_use]
    pub fn starter(project_id: ProjectId) -> Self {
        Self {
            revenue: vec![
                LineItem::new(1, "Product Sales", 50_000.0),
                LineItem::new(2, "Service Revenue", 30_000.0),
            ],
            expenses: vec![
                LineItem::new(1, "Marketing", 10_000.0),
                LineItem::new(2, "Operations", 15_000.0),
                LineItem::new(3, "Salaries", 25_000.0),
            ],
            ..Self::new(project_id)
        }
    }

    /// With a revenue line appended
    #[must_use]
    pub fn with_revenue(mut self, name: impl Into<String>, amount: f64) -> Self {
        let id = next_line_id(&self.revenue);
        self.revenue.push(LineItem::new(id, name, amount));
        self
    }

    /// With an expense line appended
    #[must_use]
    pub fn with_expense(mut self, name: impl Into<String>, amount: f64) -> Self {
        let id = next_line_id(&self.expenses);
        self.expenses.push(LineItem::new(id, name, amount));
        self
    }
}

fn next_line_id(items: &[LineItem]) -> u32 {
    items.iter().map(|i| i.id).max().unwrap_or(0) + 1
}

/// Partial update of a financial model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialModelPatch {
    /// Replacement revenue lines
    pub revenue: Option<Vec<LineItem>>,
    /// Replacement expense lines
    pub expenses: Option<Vec<LineItem>>,
    /// Replacement projections
    pub projections: Option<Projections>,
    /// Replacement scenarios
    pub scenarios: Option<Vec<Scenario>>,
}

impl Patch<FinancialModel> for FinancialModelPatch {
    fn validate(&self) -> Result<(), ModelError> {
        if self == &Self::default() {
            return Err(ModelError::EmptyPatch);
        }
        check_line_names(self.revenue.iter().chain(self.expenses.iter()).flatten())
    }

    fn apply(self, record: &mut FinancialModel) {
        if let Some(revenue) = self.revenue {
            record.revenue = revenue;
        }
        if let Some(expenses) = self.expenses {
            record.expenses = expenses;
        }
        if let Some(projections) = self.projections {
            record.projections = projections;
        }
        if let Some(scenarios) = self.scenarios {
            record.scenarios = scenarios;
        }
    }
}

fn check_line_names<'a>(lines: impl IntoIterator<Item = &'a LineItem>) -> Result<(), ModelError> {
    if lines.into_iter().any(|line| line.name.trim().is_empty()) {
        return Err(ModelError::BlankField {
            field: "Line item name",
        });
    }
    Ok(())
}

/// Wholesale save from the modeler
///
/// The owning project and creation time stay those of the stored model.
impl Patch<FinancialModel> for FinancialModel {
    fn validate(&self) -> Result<(), ModelError> {
        check_line_names(self.revenue.iter().chain(&self.expenses))
    }

    fn apply(self, record: &mut FinancialModel) {
        *record = self;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starter_has_default_lines() {
        let m = FinancialModel::starter(FinancialModelId(3), ProjectId(9), Utc::now());
        assert_eq!(m.project_id, ProjectId(9));
        assert_eq!(m.revenue.len(), 2);
        assert_eq!(m.expenses.len(), 3);
        assert_eq!(m.scenarios, Scenario::ALL.to_vec());
    }

    #[test]
    fn builder_assigns_line_ids() {
        let draft = NewFinancialModel::new(ProjectId(1))
            .with_revenue("Subscriptions", 1000.0)
            .with_revenue("Consulting", 500.0);
        assert_eq!(draft.revenue[1].id, 2);
    }

    #[test]
    fn patch_rejects_blank_line_names() {
        let patch = FinancialModelPatch {
            expenses: Some(vec![LineItem::new(1, " ", 10.0)]),
            ..FinancialModelPatch::default()
        };
        assert!(Patch::<FinancialModel>::validate(&patch).is_err());
        assert_eq!(
            Patch::<FinancialModel>::validate(&FinancialModelPatch::default()),
            Err(ModelError::EmptyPatch)
        );
    }

    #[test]
    fn wholesale_save_rejects_blank_line_names() {
        let mut model = FinancialModel::starter(FinancialModelId(1), ProjectId(1), Utc::now());
        assert!(Patch::<FinancialModel>::validate(&model).is_ok());
        model.expenses[0].name = "   ".into();
        assert_eq!(
            Patch::<FinancialModel>::validate(&model),
            Err(ModelError::BlankField {
                field: "Line item name"
            })
        );
    }

    #[test]
    fn pin_keeps_owner_and_creation_time() {
        let stored = FinancialModel::starter(FinancialModelId(1), ProjectId(1), Utc::now());
        let mut moved = stored.clone();
        moved.project_id = ProjectId(7);
        moved.created_at = Utc::now() + chrono::Duration::days(1);
        moved.pin(&stored);
        assert_eq!(moved.project_id, ProjectId(1));
        assert_eq!(moved.created_at, stored.created_at);
    }

    #[test]
    fn scenario_multipliers() {
        assert_eq!(Scenario::Conservative.multiplier(), 0.8);
        assert_eq!("optimistic".parse::<Scenario>().unwrap().multiplier(), 1.3);
    }
}
