use rusqlite::{params, Connection, OptionalExtension};

use crate::errors::AppResult;
use crate::models::User;

// ── Session ──

pub fn save_session(conn: &Connection, user: &User) -> AppResult<()> {
    conn.execute(
        "INSERT INTO session (slot, user_id, name, email, token, saved_at)
         VALUES (1, ?1, ?2, ?3, ?4, datetime('now'))
         ON CONFLICT(slot) DO UPDATE SET
           user_id = excluded.user_id,
           name = excluded.name,
           email = excluded.email,
           token = excluded.token,
           saved_at = excluded.saved_at",
        params![user.id, user.name, user.email, user.token],
    )?;
    Ok(())
}

pub fn load_session(conn: &Connection) -> AppResult<Option<User>> {
    let user = conn
        .query_row(
            "SELECT user_id, name, email, token FROM session WHERE slot = 1",
            [],
            |row| {
                Ok(User {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    email: row.get(2)?,
                    token: row.get(3)?,
                })
            },
        )
        .optional()?;
    Ok(user)
}

pub fn clear_session(conn: &Connection) -> AppResult<bool> {
    let count = conn.execute("DELETE FROM session", [])?;
    Ok(count > 0)
}

/// The injected user wins; the stored session is the fallback.
pub fn resolve_token(conn: &Connection, injected: Option<&User>) -> AppResult<Option<String>> {
    if let Some(user) = injected.filter(|u| !u.token.is_empty()) {
        return Ok(Some(user.token.clone()));
    }
    Ok(load_session(conn)?
        .map(|u| u.token)
        .filter(|t| !t.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    #[test]
    fn test_session_round_trip() {
        let conn = setup_db();
        assert!(load_session(&conn).unwrap().is_none());

        let user = User {
            id: Some(12),
            name: Some("Linh".to_string()),
            email: None,
            token: "tok-1".to_string(),
        };
        save_session(&conn, &user).unwrap();
        assert_eq!(load_session(&conn).unwrap(), Some(user));
    }

    #[test]
    fn test_save_replaces_previous_session() {
        let conn = setup_db();
        save_session(&conn, &User::with_token("old")).unwrap();
        save_session(&conn, &User::with_token("new")).unwrap();
        assert_eq!(load_session(&conn).unwrap().unwrap().token, "new");
    }

    #[test]
    fn test_clear_session() {
        let conn = setup_db();
        save_session(&conn, &User::with_token("tok")).unwrap();
        assert!(clear_session(&conn).unwrap());
        assert!(!clear_session(&conn).unwrap());
        assert!(load_session(&conn).unwrap().is_none());
    }

    #[test]
    fn test_injected_user_overrides_stored() {
        let conn = setup_db();
        save_session(&conn, &User::with_token("stored")).unwrap();

        let injected = User::with_token("injected");
        assert_eq!(
            resolve_token(&conn, Some(&injected)).unwrap().as_deref(),
            Some("injected")
        );
        assert_eq!(resolve_token(&conn, None).unwrap().as_deref(), Some("stored"));
    }

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = setup_db();
        db::migrations::run_migrations(&conn).unwrap();
        save_session(&conn, &User::with_token("tok")).unwrap();
    }
}
