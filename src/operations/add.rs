use crate::db::snapshot;
use crate::ledger::Ledger;
use crate::models::expense::ExpenseRecord;
use rusqlite::Connection;

/// Parses raw input of the form `description, amount, category[, date]`
/// and adds the expense. The date is optional and defaults to today. On
/// success the new snapshot is persisted best-effort.
pub fn add_expense(
    conn: &Connection,
    ledger: &mut Ledger,
    input: &str,
) -> Result<ExpenseRecord, String> {
    let parts: Vec<&str> = input.split(',').map(|s| s.trim()).collect();
    let (description, amount, category, date) = match parts.len() {
        3 => (parts[0], parts[1], parts[2], ""),
        4 => (parts[0], parts[1], parts[2], parts[3]),
        n => {
            return Err(format!(
                "Expected 3 or 4 details separated by commas but got {}",
                n
            ));
        }
    };

    let record = ledger
        .add(description, amount, category, date)
        .map_err(|e| e.to_string())?;
    snapshot::save_best_effort(conn, ledger.list());
    Ok(record)
}
