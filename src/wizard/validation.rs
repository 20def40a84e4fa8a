//! Step-validity rules for the billing wizard
//!
//! Every rule reports all of its problems at once as a list of
//! `ValidationIssue`s so a front end can show them together.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::allocation::AllocationEngine;
use crate::models::{DistributionKey, UnitId};

use super::draft::BillingDraft;

/// Wizard steps, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WizardStep {
    /// Building and billing period
    Setup,
    Costs,
    Units,
    /// Review of computed results before commit
    Confirm,
}

impl WizardStep {
    pub fn all() -> &'static [WizardStep] {
        &[
            WizardStep::Setup,
            WizardStep::Costs,
            WizardStep::Units,
            WizardStep::Confirm,
        ]
    }

    /// The steps that must be valid before allocation may run
    pub fn before_allocation() -> &'static [WizardStep] {
        &[WizardStep::Setup, WizardStep::Costs, WizardStep::Units]
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "setup" | "period" | "building" => Some(Self::Setup),
            "costs" | "cost" => Some(Self::Costs),
            "units" | "unit" => Some(Self::Units),
            "confirm" | "results" => Some(Self::Confirm),
            _ => None,
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Setup => write!(f, "Building & period"),
            Self::Costs => write!(f, "Cost items"),
            Self::Units => write!(f, "Unit data"),
            Self::Confirm => write!(f, "Confirm"),
        }
    }
}

/// A reason the draft cannot move on
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationIssue {
    #[error("No building selected")]
    NoBuilding,

    #[error("Billing period: {message}")]
    IncompletePeriod { message: String },

    #[error("No active cost item with an amount above zero")]
    NoActiveCosts,

    #[error("No unit takes part in the allocation under the current vacancy policy")]
    NoEligibleUnits,

    #[error("Unit {unit_number} has no {distribution_key} value, required by an active cost item")]
    MissingDimension {
        unit_id: UnitId,
        unit_number: String,
        distribution_key: DistributionKey,
    },

    #[error("No results have been calculated")]
    NoResults,
}

impl ValidationIssue {
    /// The wizard step this issue belongs to
    pub fn step(&self) -> WizardStep {
        match self {
            Self::NoBuilding | Self::IncompletePeriod { .. } => WizardStep::Setup,
            Self::NoActiveCosts => WizardStep::Costs,
            Self::NoEligibleUnits | Self::MissingDimension { .. } => WizardStep::Units,
            Self::NoResults => WizardStep::Confirm,
        }
    }
}

/// Issues blocking a single step
pub fn issues_for(draft: &BillingDraft, step: WizardStep) -> Vec<ValidationIssue> {
    match step {
        WizardStep::Setup => setup_issues(draft),
        WizardStep::Costs => cost_issues(draft),
        WizardStep::Units => unit_issues(draft),
        WizardStep::Confirm => confirm_issues(draft),
    }
}

/// Issues blocking allocation, across all steps before it
pub fn readiness(draft: &BillingDraft) -> Vec<ValidationIssue> {
    WizardStep::before_allocation()
        .iter()
        .flat_map(|&step| issues_for(draft, step))
        .collect()
}

fn setup_issues(draft: &BillingDraft) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if draft.building().is_none() {
        issues.push(ValidationIssue::NoBuilding);
    }

    match draft.period() {
        None => issues.push(ValidationIssue::IncompletePeriod {
            message: "no billing period selected".to_string(),
        }),
        Some(period) => {
            if let Err(e) = period.check(draft.options().max_period_days) {
                issues.push(ValidationIssue::IncompletePeriod {
                    message: e.to_string(),
                });
            }
        }
    }

    issues
}

fn cost_issues(draft: &BillingDraft) -> Vec<ValidationIssue> {
    if draft.cost_items().iter().any(|item| item.is_allocatable()) {
        Vec::new()
    } else {
        vec![ValidationIssue::NoActiveCosts]
    }
}

fn unit_issues(draft: &BillingDraft) -> Vec<ValidationIssue> {
    let engine = AllocationEngine::new(draft.vacancy_costs_to_landlord());
    let eligible = engine.eligible_units(draft.units());

    if eligible.is_empty() {
        return vec![ValidationIssue::NoEligibleUnits];
    }

    let mut issues = Vec::new();
    for &key in DistributionKey::all().iter().filter(|key| key.requires_dimension()) {
        let key_in_use = draft
            .cost_items()
            .iter()
            .any(|item| item.is_allocatable() && item.distribution_key == key);
        if !key_in_use {
            continue;
        }

        for unit in &eligible {
            let missing = match key {
                DistributionKey::Area => unit.area.is_zero(),
                DistributionKey::Persons => unit.persons == 0,
                DistributionKey::Units | DistributionKey::Consumption => false,
            };
            if missing {
                issues.push(ValidationIssue::MissingDimension {
                    unit_id: unit.unit_id,
                    unit_number: unit.unit_number.clone(),
                    distribution_key: key,
                });
            }
        }
    }

    issues
}

fn confirm_issues(draft: &BillingDraft) -> Vec<ValidationIssue> {
    match draft.outcome() {
        Some(outcome) if !outcome.results.is_empty() => Vec::new(),
        _ => vec![ValidationIssue::NoResults],
    }
}
