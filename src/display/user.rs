//! User display formatting

use crate::ledger::Dashboard;
use crate::models::RecordStyle;

/// Format a user's dashboard: wallet balance, recent history, stokvels
pub fn format_dashboard(dashboard: &Dashboard, style: &RecordStyle) -> String {
    let mut output = String::new();

    output.push_str(&format!("--- Dashboard for {} ---\n", dashboard.username));
    output.push_str(&format!("Balance: {}\n", style.amount(dashboard.balance)));

    output.push_str("\nRecent Transactions:\n");
    if dashboard.recent_transactions.is_empty() {
        output.push_str("  No transactions yet.\n");
    } else {
        for (i, record) in dashboard.recent_transactions.iter().enumerate() {
            output.push_str(&format!("  {}. {}\n", i + 1, record));
        }
    }

    output.push_str("\nYour Stokvels:\n");
    if dashboard.stokvels.is_empty() {
        output.push_str("  You haven't joined any stokvels yet.\n");
    } else {
        for stokvel in &dashboard.stokvels {
            output.push_str(&format!("  * {}\n", stokvel.name));
            output.push_str(&format!("    Balance: {}\n", style.amount(stokvel.balance)));
            output.push_str(&format!("    Members: {}\n", stokvel.members.join(", ")));
            output.push_str(&format!(
                "    Total Contributions: {}\n",
                stokvel.contribution_count
            ));
        }
    }

    output.push_str(&format!("{:-<40}\n", ""));
    output
}
