use crate::models::expense::ExpenseRecord;
use rusqlite::Connection;

/// The slot name the ledger snapshot is stored under. Matches the storage
/// key the data originally lived under, so the layout stays recognizable.
pub const SLOT_KEY: &str = "expenses_v1";

/// Reads the snapshot slot back into a record sequence.
///
/// Load never fails the caller: a missing slot, an unreadable row, or a
/// snapshot that no longer parses all degrade to an empty ledger. The
/// degradation is logged so silent data loss at least leaves a trace.
pub fn load(conn: &Connection) -> Vec<ExpenseRecord> {
    let body: String = match conn.query_row(
        "SELECT body FROM snapshots WHERE slot = ?1",
        [SLOT_KEY],
        |row| row.get(0),
    ) {
        Ok(body) => body,
        Err(rusqlite::Error::QueryReturnedNoRows) => return Vec::new(),
        Err(e) => {
            log::warn!("Failed to read snapshot slot '{}': {}", SLOT_KEY, e);
            return Vec::new();
        }
    };

    match serde_json::from_str(&body) {
        Ok(records) => records,
        Err(e) => {
            log::warn!(
                "Discarding corrupt snapshot in slot '{}': {}",
                SLOT_KEY,
                e
            );
            Vec::new()
        }
    }
}

/// Serializes the full record sequence and writes it into the slot,
/// replacing any prior snapshot wholesale.
pub fn save(conn: &Connection, records: &[ExpenseRecord]) -> Result<(), String> {
    let body = serde_json::to_string(records)
        .map_err(|e| format!("Failed to serialize snapshot: {}", e))?;

    conn.execute(
        "INSERT INTO snapshots (slot, body) VALUES (?1, ?2)\n         ON CONFLICT(slot) DO UPDATE SET body = excluded.body",
        [SLOT_KEY, &body],
    )
    .map_err(|e| format!("Failed to write snapshot: {}", e))?;
    Ok(())
}

/// Fire-and-forget persistence after a successful mutation. A failed write
/// is logged rather than surfaced; the in-memory ledger stays the source of
/// truth for the rest of the session.
pub fn save_best_effort(conn: &Connection, records: &[ExpenseRecord]) {
    if let Err(e) = save(conn, records) {
        log::warn!("Failed to persist expense snapshot: {}", e);
    }
}
