//! Stokvel display formatting
//!
//! Formats stokvels for terminal output in table and detail views.

use crate::models::{Contribution, Money, RecordStyle};
use crate::services::StokvelSummary;

/// Format a list of stokvels as a table
pub fn format_stokvel_list(summaries: &[StokvelSummary], style: &RecordStyle) -> String {
    if summaries.is_empty() {
        return "No stokvels found.\n".to_string();
    }

    let name_width = summaries
        .iter()
        .map(|s| s.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:>7}  {:>13}  {:>14}  {}\n",
        "Name",
        "Members",
        "Contributions",
        "Balance",
        "Created By",
        name_width = name_width,
    ));

    output.push_str(&format!(
        "{:-<name_width$}  {:->7}  {:->13}  {:->14}  {:-<10}\n",
        "",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for summary in summaries {
        output.push_str(&format!(
            "{:<name_width$}  {:>7}  {:>13}  {:>14}  {}\n",
            summary.name,
            summary.member_count,
            summary.contribution_count,
            style.amount(summary.balance),
            summary.created_by,
            name_width = name_width,
        ));
    }

    let total = summaries
        .iter()
        .try_fold(Money::zero(), |sum, s| sum.checked_add(s.balance))
        .map(|total| style.amount(total))
        .unwrap_or_else(|| "overflow".to_string());
    output.push_str(&format!(
        "{:<name_width$}  {:>7}  {:>13}  {:>14}\n",
        "TOTAL",
        "",
        "",
        total,
        name_width = name_width,
    ));

    output
}

/// Format a single stokvel's details, optionally with a member's own history
pub fn format_stokvel_details(
    summary: &StokvelSummary,
    own_contributions: &[Contribution],
    style: &RecordStyle,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Stokvel: {}\n", summary.name));
    output.push_str(&format!("  Balance:        {}\n", style.amount(summary.balance)));
    output.push_str(&format!(
        "  Contributions:  {} totalling {}\n",
        summary.contribution_count,
        style.amount(summary.total_contributions)
    ));
    output.push_str(&format!(
        "  Members ({}):    {}\n",
        summary.member_count,
        summary.members.join(", ")
    ));
    output.push_str(&format!(
        "  Created:        {} by {}\n",
        style.date(summary.created_date),
        summary.created_by
    ));

    if !own_contributions.is_empty() {
        output.push_str("\n  Your contributions:\n");
        for contribution in own_contributions {
            output.push_str(&format!(
                "    {}  {:>12}  {}\n",
                style.date(contribution.date),
                style.amount(contribution.amount),
                contribution.id
            ));
        }
    }

    output
}
