use crate::db::snapshot;
use crate::ledger::Ledger;
use crate::models::expense::ExpenseRecord;
use rusqlite::Connection;

/// Parses raw input of the form `id, description, amount, category[, date]`
/// and replaces the matching expense in place. On success the new snapshot
/// is persisted best-effort.
pub fn update_expense(
    conn: &Connection,
    ledger: &mut Ledger,
    input: &str,
) -> Result<ExpenseRecord, String> {
    let parts: Vec<&str> = input.split(',').map(|s| s.trim()).collect();
    let (id, description, amount, category, date) = match parts.len() {
        4 => (parts[0], parts[1], parts[2], parts[3], ""),
        5 => (parts[0], parts[1], parts[2], parts[3], parts[4]),
        n => {
            return Err(format!(
                "Expected 4 or 5 details separated by commas but got {}",
                n
            ));
        }
    };

    if id.is_empty() {
        return Err("Expense ID cannot be empty".to_string());
    }

    let record = ledger
        .update(id, description, amount, category, date)
        .map_err(|e| e.to_string())?;
    snapshot::save_best_effort(conn, ledger.list());
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::establish_test_connection;
    use crate::models::expense::Category;
    use rust_decimal::Decimal;

    fn seeded(conn: &Connection) -> (Ledger, String) {
        let mut ledger = Ledger::new();
        crate::operations::add::add_expense(conn, &mut ledger, "Lunch, 10, Food, 2024-01-01")
            .unwrap();
        let id = ledger.list()[0].id.clone();
        (ledger, id)
    }

    #[test]
    fn test_update_expense_success() {
        let conn = establish_test_connection().unwrap();
        let (mut ledger, id) = seeded(&conn);

        let input = format!("{}, Dinner, 22.5, Shopping, 2024-02-02", id);
        let record = update_expense(&conn, &mut ledger, &input).unwrap();

        assert_eq!(record.id, id);
        assert_eq!(record.description, "Dinner");
        assert_eq!(record.amount, Decimal::new(2250, 2));
        assert_eq!(record.category, Category::Shopping);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_update_expense_unknown_id() {
        let conn = establish_test_connection().unwrap();
        let (mut ledger, _) = seeded(&conn);

        let result = update_expense(&conn, &mut ledger, "missing, Dinner, 22.5, Food");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("No expense with id"));
        assert_eq!(ledger.list()[0].description, "Lunch");
    }

    #[test]
    fn test_update_expense_wrong_field_count() {
        let conn = establish_test_connection().unwrap();
        let (mut ledger, id) = seeded(&conn);

        let result = update_expense(&conn, &mut ledger, &format!("{}, Dinner", id));
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Expected 4 or 5 details"));
    }

    #[test]
    fn test_update_expense_persists_snapshot() {
        let conn = establish_test_connection().unwrap();
        let (mut ledger, id) = seeded(&conn);

        update_expense(&conn, &mut ledger, &format!("{}, Dinner, 22.5, Food", id)).unwrap();

        let stored = snapshot::load(&conn);
        assert_eq!(stored, ledger.list());
        assert_eq!(stored[0].description, "Dinner");
    }
}
