//! CSV Export functionality
//!
//! Exports contributions and member balances in a spreadsheet-compatible
//! format.

use std::io::Write;

use crate::error::{StokwellError, StokwellResult};
use crate::models::{LedgerState, Money};

fn export_err(e: csv::Error) -> StokwellError {
    StokwellError::Export(e.to_string())
}

/// Export every contribution, grouped by stokvel and in recorded order
///
/// Columns: `Stokvel,Member,Amount,Date`. Amounts are plain decimals and
/// dates are UTC.
pub fn export_contributions_csv<W: Write>(
    state: &LedgerState,
    writer: &mut W,
) -> StokwellResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["Stokvel", "Member", "Amount", "Date"])
        .map_err(export_err)?;

    for stokvel in state.stokvels.values() {
        for contribution in &stokvel.contributions {
            csv.write_record([
                stokvel.name.as_str(),
                contribution.user.as_str(),
                contribution.amount.to_decimal_string().as_str(),
                contribution.date.format("%Y-%m-%d %H:%M:%S").to_string().as_str(),
            ])
            .map_err(export_err)?;
        }
    }

    csv.flush()
        .map_err(|e| StokwellError::Export(e.to_string()))?;
    Ok(())
}

/// Export one row per stokvel member with their running total
///
/// Columns: `Stokvel,Member,Contributions,Total`.
pub fn export_members_csv<W: Write>(state: &LedgerState, writer: &mut W) -> StokwellResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["Stokvel", "Member", "Contributions", "Total"])
        .map_err(export_err)?;

    for stokvel in state.stokvels.values() {
        for member in &stokvel.members {
            let (count, total) = stokvel
                .contributions_by(member)
                .fold((0usize, Money::zero()), |(n, sum), c| {
                    (n + 1, sum + c.amount)
                });
            csv.write_record([
                stokvel.name.as_str(),
                member.as_str(),
                count.to_string().as_str(),
                total.to_decimal_string().as_str(),
            ])
            .map_err(export_err)?;
        }
    }

    csv.flush()
        .map_err(|e| StokwellError::Export(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecordStyle;
    use crate::services::{stokvel, user};

    fn sample_state() -> LedgerState {
        let mut state = LedgerState::new();
        let style = RecordStyle::default();
        user::register(&mut state, "alice", "pw1").unwrap();
        user::register(&mut state, "bob", "pw2").unwrap();
        stokvel::create(&mut state, "Savings, Inc", "alice").unwrap();
        stokvel::join(&mut state, "Savings, Inc", "bob").unwrap();
        stokvel::contribute(&mut state, "Savings, Inc", Money::from_cents(10000), "alice", &style)
            .unwrap();
        stokvel::contribute(&mut state, "Savings, Inc", Money::from_cents(2550), "alice", &style)
            .unwrap();
        state
    }

    #[test]
    fn test_export_contributions() {
        let mut output = Vec::new();
        export_contributions_csv(&sample_state(), &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Stokvel,Member,Amount,Date");
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("\"Savings, Inc\",alice,100.00,"));
        assert!(lines[2].starts_with("\"Savings, Inc\",alice,25.50,"));
    }

    #[test]
    fn test_export_contributions_empty() {
        let mut output = Vec::new();
        export_contributions_csv(&LedgerState::new(), &mut output).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "Stokvel,Member,Amount,Date\n");
    }

    #[test]
    fn test_export_members() {
        let mut output = Vec::new();
        export_members_csv(&sample_state(), &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Stokvel,Member,Contributions,Total");
        assert_eq!(lines[1], "\"Savings, Inc\",alice,2,125.50");
        assert_eq!(lines[2], "\"Savings, Inc\",bob,0,0.00");
    }
}
