//! Draft display formatting
//!
//! Overview, cost item table, unit table and validation issues.

use crate::models::{BillingPeriod, CostItem, UnitDistributionData};
use crate::wizard::{BillingDraft, ValidationIssue, WizardStep};

pub(crate) fn width<'a, I>(values: I, min: usize) -> usize
where
    I: IntoIterator<Item = &'a str>,
{
    values
        .into_iter()
        .map(|s| s.chars().count())
        .max()
        .unwrap_or(min)
        .max(min)
}

/// A period in the user's date format, e.g. "01.01.2025 - 31.12.2025"
pub fn format_period(period: &BillingPeriod, date_format: &str) -> String {
    format!(
        "{} - {}",
        period.start.format(date_format),
        period.end.format(date_format)
    )
}

/// Overview of the draft, one block per wizard step
pub fn format_draft_summary(draft: &BillingDraft, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str("Draft statement\n");
    output.push_str(&format!(
        "  Building:       {}\n",
        draft
            .building()
            .map(|b| b.name.as_str())
            .unwrap_or("(none selected)")
    ));
    output.push_str(&format!(
        "  Period:         {}\n",
        draft
            .period()
            .map(|p| format!("{} ({} days)", p, p.days()))
            .unwrap_or_else(|| "(none)".to_string())
    ));
    output.push_str(&format!(
        "  Vacancy:        {}\n",
        if draft.vacancy_costs_to_landlord() {
            "landlord bears vacant units' costs"
        } else {
            "vacant units share costs"
        }
    ));
    output.push_str(&format!("  Rounding:       {}\n", draft.options().rounding));

    let active = draft
        .cost_items()
        .iter()
        .filter(|item| item.is_allocatable())
        .count();
    output.push_str(&format!(
        "  Cost items:     {} of {} allocating, total {}\n",
        active,
        draft.cost_items().len(),
        draft.total_costs().format_with_symbol(symbol)
    ));

    let vacant = draft.units().iter().filter(|u| u.is_vacant).count();
    output.push_str(&format!(
        "  Units:          {} ({} vacant)\n",
        draft.units().len(),
        vacant
    ));
    output.push_str(&format!(
        "  Results:        {}\n",
        match draft.outcome() {
            Some(outcome) => format!(
                "calculated {}",
                outcome.computed_at.format("%Y-%m-%d %H:%M UTC")
            ),
            None => "not calculated".to_string(),
        }
    ));

    output.push('\n');
    for &step in WizardStep::all() {
        let mark = if draft.is_step_valid(step) { "ok" } else { "--" };
        output.push_str(&format!("  [{}] {}\n", mark, step));
    }

    output
}

/// Issues grouped under their wizard step
pub fn format_issues(issues: &[ValidationIssue]) -> String {
    if issues.is_empty() {
        return "Ready: no blocking issues.".to_string();
    }

    let mut output = String::new();
    for &step in WizardStep::all() {
        let in_step: Vec<_> = issues.iter().filter(|i| i.step() == step).collect();
        if in_step.is_empty() {
            continue;
        }
        output.push_str(&format!("{}:\n", step));
        for issue in in_step {
            output.push_str(&format!("  - {}\n", issue));
        }
    }
    output
}

pub fn format_cost_item_list(items: &[CostItem], symbol: &str, show_all: bool) -> String {
    let shown: Vec<&CostItem> = items
        .iter()
        .filter(|item| show_all || item.is_allocatable())
        .collect();

    if shown.is_empty() {
        return if show_all {
            "No cost items.".to_string()
        } else {
            "No cost items with an amount yet. Use --all to see every item.".to_string()
        };
    }

    let name_width = width(shown.iter().map(|i| i.name.as_str()), 4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:>12}  {:<11}  {}\n",
        "Name",
        "Amount",
        "Key",
        "Flags",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:->12}  {:-<11}  {:-<14}\n",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for item in &shown {
        let mut flags = Vec::new();
        if !item.is_active {
            flags.push("inactive");
        }
        if item.is_custom {
            flags.push("custom");
        }
        output.push_str(&format!(
            "{:<name_width$}  {:>12}  {:<11}  {}\n",
            item.name,
            item.amount.format_with_symbol(symbol),
            item.distribution_key.to_string(),
            flags.join(", "),
            name_width = name_width,
        ));
    }

    let total: crate::models::Money = shown
        .iter()
        .filter(|i| i.is_allocatable())
        .map(|i| i.amount)
        .sum();
    output.push_str(&format!(
        "{:<name_width$}  {:>12}\n",
        "TOTAL",
        total.format_with_symbol(symbol),
        name_width = name_width,
    ));

    output
}

pub fn format_unit_list(units: &[UnitDistributionData], symbol: &str) -> String {
    if units.is_empty() {
        return "No units. Import them with `costshare unit import <file>`.".to_string();
    }

    let number_width = width(units.iter().map(|u| u.unit_number.as_str()), 4);
    let tenant_width = width(units.iter().map(|u| u.tenant_name.as_str()), 6);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<nw$}  {:<tw$}  {:>9}  {:>7}  {:>8}  {:>12}  {}\n",
        "Unit",
        "Tenant",
        "Area m²",
        "Persons",
        "Heating%",
        "Prepaid",
        "Status",
        nw = number_width,
        tw = tenant_width,
    ));
    output.push_str(&format!(
        "{:-<nw$}  {:-<tw$}  {:->9}  {:->7}  {:->8}  {:->12}  {:-<6}\n",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        nw = number_width,
        tw = tenant_width,
    ));

    for unit in units {
        output.push_str(&format!(
            "{:<nw$}  {:<tw$}  {:>9}  {:>7}  {:>8}  {:>12}  {}\n",
            unit.unit_number,
            unit.tenant_name,
            unit.area.to_string(),
            unit.persons,
            unit.heating_share.to_string(),
            unit.prepayments.format_with_symbol(symbol),
            if unit.is_vacant { "vacant" } else { "" },
            nw = number_width,
            tw = tenant_width,
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BuildingRef, DistributionKey, Measure, Money};
    use chrono::NaiveDate;

    fn draft() -> BillingDraft {
        BillingDraft::new(NaiveDate::from_ymd_opt(2026, 1, 10).unwrap())
    }

    #[test]
    fn test_summary_of_fresh_draft() {
        let summary = format_draft_summary(&draft(), "€");
        assert!(summary.contains("(none selected)"));
        assert!(summary.contains("2025-01-01 to 2025-12-31 (365 days)"));
        assert!(summary.contains("0 of 15 allocating"));
        assert!(summary.contains("[--] Building & period"));
        assert!(summary.contains("not calculated"));
    }

    #[test]
    fn test_period_in_user_format() {
        let period = BillingPeriod::calendar_year(2025).unwrap();
        assert_eq!(format_period(&period, "%d.%m.%Y"), "01.01.2025 - 31.12.2025");
    }

    #[test]
    fn test_issue_grouping() {
        let mut d = draft();
        d.select_building(BuildingRef::new("Hof 1"));
        let text = format_issues(&d.readiness());

        assert!(!text.contains("Building & period"));
        assert!(text.contains("Cost items:\n  - No active cost item"));
        assert_eq!(format_issues(&[]), "Ready: no blocking issues.");
    }

    #[test]
    fn test_cost_item_list_hides_idle_items() {
        let mut d = draft();
        d.add_custom_cost_item("Winterdienst", Money::from_cents(30000), DistributionKey::Units)
            .unwrap();

        let short = format_cost_item_list(d.cost_items(), "€", false);
        assert!(short.contains("Winterdienst"));
        assert!(!short.contains("Grundsteuer"));
        assert!(short.contains("€300.00"));

        let full = format_cost_item_list(d.cost_items(), "EUR ", true);
        assert!(full.contains("Grundsteuer"));
        assert!(full.contains("EUR 300.00"));
    }

    #[test]
    fn test_unit_list() {
        let units = vec![
            UnitDistributionData::new("1. OG", "Jörg")
                .with_area(Measure::from_hundredths(7250))
                .with_persons(3),
            UnitDistributionData::vacant("2. OG"),
        ];
        let table = format_unit_list(&units, "€");

        assert!(table.contains("72.50"));
        assert!(table.contains("vacant"));
        assert_eq!(table.lines().count(), 4);
    }
}
