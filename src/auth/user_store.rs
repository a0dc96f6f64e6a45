//! Credential Store
//! Mission: Durable identities and role grants over SQLite

use crate::auth::models::Identity;
use anyhow::Result;
use rusqlite::{params, Connection};
use std::collections::HashSet;
use tracing::info;

/// SQLite-backed credential store.
///
/// Schema mirrors the classic users/authorities layout: the username is the
/// primary key, grants are (username, authority) pairs unique per pair.
pub struct UserStore {
    db_path: String,
}

impl UserStore {
    /// Open (or create) the store and initialize the schema.
    pub fn new(db_path: &str) -> Result<Self> {
        let store = Self {
            db_path: db_path.to_string(),
        };
        store.init_db()?;
        Ok(store)
    }

    fn init_db(&self) -> Result<()> {
        let conn = Connection::open(&self.db_path)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                username TEXT PRIMARY KEY,
                password_hash TEXT NOT NULL,
                enabled INTEGER NOT NULL DEFAULT 1
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS authorities (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL,
                authority TEXT NOT NULL,
                UNIQUE (username, authority),
                FOREIGN KEY (username) REFERENCES users(username)
            )",
            [],
        )?;

        Ok(())
    }

    /// Look up an identity by its username.
    pub fn find_by_username(&self, username: &str) -> Result<Option<Identity>> {
        let conn = Connection::open(&self.db_path)?;

        let mut stmt = conn
            .prepare("SELECT username, password_hash, enabled FROM users WHERE username = ?1")?;

        let identity = stmt.query_row(params![username], |row| {
            Ok(Identity {
                username: row.get(0)?,
                password_hash: row.get(1)?,
                enabled: row.get(2)?,
            })
        });

        match identity {
            Ok(identity) => Ok(Some(identity)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Create an identity with its initial role grant.
    ///
    /// Runs in a single transaction: either the user row and its grant both
    /// exist afterwards, or neither does. A duplicate username surfaces as
    /// the UNIQUE violation from SQLite.
    pub fn create_identity(&self, username: &str, password_hash: &str, role: &str) -> Result<()> {
        let mut conn = Connection::open(&self.db_path)?;
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO users (username, password_hash, enabled) VALUES (?1, ?2, 1)",
            params![username, password_hash],
        )?;
        tx.execute(
            "INSERT INTO authorities (username, authority) VALUES (?1, ?2)",
            params![username, role],
        )?;
        tx.commit()?;

        info!("✅ Registered identity: {} ({})", username, role);
        Ok(())
    }

    /// Current role grants for a username. Unknown usernames yield an
    /// empty set, not an error.
    pub fn roles_of(&self, username: &str) -> Result<HashSet<String>> {
        let conn = Connection::open(&self.db_path)?;

        let mut stmt = conn.prepare("SELECT authority FROM authorities WHERE username = ?1")?;
        let roles = stmt
            .query_map(params![username], |row| row.get::<_, String>(0))?
            .collect::<Result<HashSet<_>, _>>()?;

        Ok(roles)
    }

    /// Grant an additional role. The (username, authority) pair is unique;
    /// granting the same role twice is an error.
    pub fn grant_role(&self, username: &str, role: &str) -> Result<()> {
        let conn = Connection::open(&self.db_path)?;

        conn.execute(
            "INSERT INTO authorities (username, authority) VALUES (?1, ?2)",
            params![username, role],
        )?;

        info!("Granted role {} to {}", role, username);
        Ok(())
    }

    /// Enable or disable an identity. Disabled identities fail
    /// authentication; tokens already issued stay valid until expiry.
    pub fn set_enabled(&self, username: &str, enabled: bool) -> Result<()> {
        let conn = Connection::open(&self.db_path)?;

        let rows_affected = conn.execute(
            "UPDATE users SET enabled = ?2 WHERE username = ?1",
            params![username, enabled],
        )?;

        if rows_affected == 0 {
            anyhow::bail!("Identity not found");
        }
        Ok(())
    }
}
