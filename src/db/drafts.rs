// src/db/drafts.rs
//
// Transient incident-form drafts, keyed by (session, incident). Saved
// after a failed submit so the operator's entered values survive the
// round trip; cleared once the incident saves cleanly.

use crate::errors::ServerError;
use rusqlite::{params, Connection, OptionalExtension};

pub fn save_draft(
    conn: &Connection,
    session_id: i64,
    incident_id: i64,
    form_json: &str,
    now: i64,
) -> Result<(), ServerError> {
    conn.execute(
        r#"
        insert into drafts (session_id, incident_id, form_json, updated_at)
        values (?1, ?2, ?3, ?4)
        on conflict(session_id, incident_id) do update set
            form_json = excluded.form_json,
            updated_at = excluded.updated_at
        "#,
        params![session_id, incident_id, form_json, now],
    )
    .map_err(|e| ServerError::DbError(format!("save draft failed: {e}")))?;
    Ok(())
}

pub fn load_draft(
    conn: &Connection,
    session_id: i64,
    incident_id: i64,
) -> Result<Option<String>, ServerError> {
    conn.query_row(
        "select form_json from drafts where session_id = ? and incident_id = ?",
        params![session_id, incident_id],
        |row| row.get(0),
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("load draft failed: {e}")))
}

pub fn clear_draft(
    conn: &Connection,
    session_id: i64,
    incident_id: i64,
) -> Result<(), ServerError> {
    conn.execute(
        "delete from drafts where session_id = ? and incident_id = ?",
        params![session_id, incident_id],
    )
    .map_err(|e| ServerError::DbError(format!("clear draft failed: {e}")))?;
    Ok(())
}
