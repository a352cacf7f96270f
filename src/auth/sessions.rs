// src/auth/sessions.rs
//
// Operator sessions. Login verifies the entered API token against the
// remote API, then stores it here keyed by a local session cookie. A
// 401 from the remote side revokes the session, which forces the
// operator back through /login.

use crate::auth::token::{generate_session_token, hash_token};
use crate::errors::ServerError;
use rusqlite::{params, Connection, OptionalExtension};

/// One working day; stale tokens get re-verified at next login anyway.
pub const SESSION_TTL_SECS: i64 = 60 * 60 * 12;

#[derive(Debug, Clone)]
pub struct OperatorSession {
    pub id: i64,
    /// Remote API token this session was opened with.
    pub api_token: String,
    /// Remote user id of the operator (uploads, audit records).
    pub user_id: i64,
    pub display_name: String,
}

/// Create a session row and return the raw cookie token.
pub fn create_session(
    conn: &Connection,
    api_token: &str,
    user_id: i64,
    display_name: &str,
    now: i64,
) -> Result<String, ServerError> {
    let raw_token = generate_session_token();
    let hash = hash_token(&raw_token);
    let expires_at = now + SESSION_TTL_SECS;

    conn.execute(
        r#"
        insert into sessions (token_hash, api_token, user_id, display_name, created_at, expires_at)
        values (?, ?, ?, ?, ?, ?)
        "#,
        params![
            hash.as_slice(),
            api_token,
            user_id,
            display_name,
            now,
            expires_at
        ],
    )
    .map_err(|e| ServerError::DbError(format!("create session failed: {e}")))?;

    Ok(raw_token)
}

/// Look up a live session by its raw cookie token.
pub fn load_session(
    conn: &Connection,
    raw_token: &str,
    now: i64,
) -> Result<Option<OperatorSession>, ServerError> {
    let hash = hash_token(raw_token);

    conn.query_row(
        r#"
        select id, api_token, user_id, display_name
        from sessions
        where token_hash = ?
          and expires_at > ?
          and revoked_at is null
        "#,
        params![hash.as_slice(), now],
        |row| {
            Ok(OperatorSession {
                id: row.get(0)?,
                api_token: row.get(1)?,
                user_id: row.get(2)?,
                display_name: row.get(3)?,
            })
        },
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("session lookup failed: {e}")))
}

/// Revoke one session (logout, or the remote API rejected its token).
pub fn revoke_session(conn: &Connection, session_id: i64, now: i64) -> Result<(), ServerError> {
    conn.execute(
        "update sessions set revoked_at = ? where id = ? and revoked_at is null",
        params![now, session_id],
    )
    .map_err(|e| ServerError::DbError(format!("revoke session failed: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply_schema(conn: &Connection) {
        conn.execute_batch(include_str!("../../sql/schema.sql")).unwrap();
    }

    #[test]
    fn create_then_load_round_trips() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn);

        let now = 1000;
        let raw = create_session(&conn, "api-token-xyz", 9, "C. Rojas", now).unwrap();

        let session = load_session(&conn, &raw, now + 1).unwrap().unwrap();
        assert_eq!(session.api_token, "api-token-xyz");
        assert_eq!(session.user_id, 9);
        assert_eq!(session.display_name, "C. Rojas");
    }

    #[test]
    fn expired_session_is_not_loaded() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn);

        let now = 1000;
        let raw = create_session(&conn, "t", 1, "x", now).unwrap();

        let res = load_session(&conn, &raw, now + SESSION_TTL_SECS + 1).unwrap();
        assert!(res.is_none());
    }

    #[test]
    fn revoked_session_is_not_loaded() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn);

        let now = 1000;
        let raw = create_session(&conn, "t", 1, "x", now).unwrap();
        let session = load_session(&conn, &raw, now + 1).unwrap().unwrap();

        revoke_session(&conn, session.id, now + 2).unwrap();
        assert!(load_session(&conn, &raw, now + 3).unwrap().is_none());
    }

    #[test]
    fn wrong_token_is_not_loaded() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn);

        create_session(&conn, "t", 1, "x", 1000).unwrap();
        assert!(load_session(&conn, "guessed-token", 1001).unwrap().is_none());
    }
}
