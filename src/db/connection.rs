use rusqlite::{Connection, Result};

pub fn establish_connection() -> Result<Connection> {
    let conn = Connection::open("expense_tracker.db")?;
    conn.execute(
        "CREATE TABLE IF NOT EXISTS snapshots (
            slot TEXT PRIMARY KEY,
            body TEXT NOT NULL
        )",
        [],
    )?;
    Ok(conn)
}

#[cfg(test)]
pub fn establish_test_connection() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    conn.execute(
        "CREATE TABLE snapshots (
            slot TEXT PRIMARY KEY,
            body TEXT NOT NULL
        )",
        [],
    )?;
    Ok(conn)
}
