//! Project domain model and its owned child records.
//!
//! # Responsibility
//! - Define the canonical `Project` record and its category/step/material
//!   children.
//! - Provide the human-readable rendering used by console callers.
//!
//! # Invariants
//! - `project_id` is `None` until the store assigns it on insert.
//! - Child collections are empty unless filled by a single detail fetch, and
//!   are then either all populated or all empty.

use super::decimal::Decimal2;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Store-assigned project identity.
pub type ProjectId = i64;

/// Store-assigned category identity.
pub type CategoryId = i64;

/// Store-assigned step identity.
pub type StepId = i64;

/// Store-assigned material identity.
pub type MaterialId = i64;

/// Canonical project record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Project {
    /// `None` until inserted; never rewritten afterwards.
    pub project_id: Option<ProjectId>,
    pub project_name: String,
    pub estimated_hours: Option<Decimal2>,
    pub actual_hours: Option<Decimal2>,
    /// 1-5 when set. Range is enforced by the storage schema.
    pub difficulty: Option<u8>,
    pub notes: Option<String>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(default)]
    pub materials: Vec<Material>,
}

/// Category shared across projects through the association table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub category_id: CategoryId,
    pub category_name: String,
}

/// One ordered instruction owned by a single project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub step_id: StepId,
    pub project_id: ProjectId,
    pub step_text: String,
    pub step_order: i32,
}

/// One material line owned by a single project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    pub material_id: MaterialId,
    pub project_id: ProjectId,
    pub material_name: String,
    pub num_required: Option<i32>,
    pub cost: Option<Decimal2>,
}

impl Project {
    /// Creates an unsaved project with only the required name set.
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            ..Self::default()
        }
    }

    /// Returns whether any child collection has been populated.
    pub fn has_details(&self) -> bool {
        !(self.categories.is_empty() && self.steps.is_empty() && self.materials.is_empty())
    }
}

struct OptionalField<'a, T>(&'a Option<T>);

impl<T: Display> Display for OptionalField<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{value}"),
            None => f.write_str("-"),
        }
    }
}

impl Display for Project {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ID={} name={} estimated_hours={} actual_hours={} difficulty={} notes={}",
            OptionalField(&self.project_id),
            self.project_name,
            OptionalField(&self.estimated_hours),
            OptionalField(&self.actual_hours),
            OptionalField(&self.difficulty),
            OptionalField(&self.notes),
        )?;

        if !self.categories.is_empty() {
            f.write_str("\n  Categories:")?;
            for category in &self.categories {
                write!(f, "\n    {category}")?;
            }
        }
        if !self.steps.is_empty() {
            f.write_str("\n  Steps:")?;
            for step in &self.steps {
                write!(f, "\n    {step}")?;
            }
        }
        if !self.materials.is_empty() {
            f.write_str("\n  Materials:")?;
            for material in &self.materials {
                write!(f, "\n    {material}")?;
            }
        }

        Ok(())
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ID={} name={}", self.category_id, self.category_name)
    }
}

impl Display for Step {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}. {}", self.step_order, self.step_text)
    }
}

impl Display for Material {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ID={} name={} num_required={} cost={}",
            self.material_id,
            self.material_name,
            OptionalField(&self.num_required),
            OptionalField(&self.cost),
        )
    }
}
