use crate::db::snapshot;
use crate::ledger::Ledger;
use rusqlite::Connection;

/// Removes the expense with the given id. Returns whether a removal
/// occurred; removing an id that does not exist is a no-op, not an error.
/// The snapshot is only rewritten when something actually changed.
pub fn remove_expense(
    conn: &Connection,
    ledger: &mut Ledger,
    input: &str,
) -> Result<bool, String> {
    let id = input.trim();
    if id.is_empty() {
        return Err("Expense ID cannot be empty".to_string());
    }

    let removed = ledger.remove(id);
    if removed {
        snapshot::save_best_effort(conn, ledger.list());
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::establish_test_connection;

    #[test]
    fn test_remove_expense_success() {
        let conn = establish_test_connection().unwrap();
        let mut ledger = Ledger::new();
        crate::operations::add::add_expense(&conn, &mut ledger, "Lunch, 10, Food").unwrap();
        let id = ledger.list()[0].id.clone();

        assert_eq!(remove_expense(&conn, &mut ledger, &id), Ok(true));
        assert!(ledger.is_empty());
        assert!(snapshot::load(&conn).is_empty());
    }

    #[test]
    fn test_remove_expense_twice_second_is_noop() {
        let conn = establish_test_connection().unwrap();
        let mut ledger = Ledger::new();
        crate::operations::add::add_expense(&conn, &mut ledger, "Lunch, 10, Food").unwrap();
        let id = ledger.list()[0].id.clone();

        assert_eq!(remove_expense(&conn, &mut ledger, &id), Ok(true));
        assert_eq!(remove_expense(&conn, &mut ledger, &id), Ok(false));
    }

    #[test]
    fn test_remove_expense_empty_id() {
        let conn = establish_test_connection().unwrap();
        let mut ledger = Ledger::new();

        let result = remove_expense(&conn, &mut ledger, "   ");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("cannot be empty"));
    }
}
