//! Customer Storage
//! Mission: Durable customer records over SQLite

use crate::customers::models::{CustomerRecord, CustomerRequest};
use anyhow::Result;
use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::info;

/// SQLite-backed customer record store.
pub struct CustomerStore {
    db_path: String,
}

impl CustomerStore {
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
            "CREATE TABLE IF NOT EXISTS customer (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                firstname TEXT NOT NULL,
                lastname TEXT NOT NULL,
                email TEXT NOT NULL,
                phone TEXT NOT NULL,
                create_date TEXT NOT NULL,
                update_date TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    pub fn list(&self) -> Result<Vec<CustomerRecord>> {
        let conn = Connection::open(&self.db_path)?;

        let mut stmt = conn.prepare(
            "SELECT id, firstname, lastname, email, phone, create_date, update_date
             FROM customer ORDER BY id",
        )?;
        let records = stmt
            .query_map([], row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    pub fn find_by_id(&self, id: i64) -> Result<Option<CustomerRecord>> {
        let conn = Connection::open(&self.db_path)?;

        let mut stmt = conn.prepare(
            "SELECT id, firstname, lastname, email, phone, create_date, update_date
             FROM customer WHERE id = ?1",
        )?;

        match stmt.query_row(params![id], row_to_record) {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn insert(&self, request: &CustomerRequest) -> Result<CustomerRecord> {
        let conn = Connection::open(&self.db_path)?;
        let now = Utc::now().to_rfc3339();

        conn.execute(
            "INSERT INTO customer (firstname, lastname, email, phone, create_date, update_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            params![
                request.firstname,
                request.lastname,
                request.email,
                request.phone,
                now,
            ],
        )?;
        let id = conn.last_insert_rowid();

        info!("Created customer record {}", id);

        Ok(CustomerRecord {
            id,
            firstname: request.firstname.clone(),
            lastname: request.lastname.clone(),
            email: request.email.clone(),
            phone: request.phone.clone(),
            create_date: now.clone(),
            update_date: now,
        })
    }

    /// Update a record in place. `None` when the id does not exist.
    pub fn update(&self, id: i64, request: &CustomerRequest) -> Result<Option<CustomerRecord>> {
        let conn = Connection::open(&self.db_path)?;
        let now = Utc::now().to_rfc3339();

        let rows_affected = conn.execute(
            "UPDATE customer
             SET firstname = ?2, lastname = ?3, email = ?4, phone = ?5, update_date = ?6
             WHERE id = ?1",
            params![
                id,
                request.firstname,
                request.lastname,
                request.email,
                request.phone,
                now,
            ],
        )?;

        if rows_affected == 0 {
            return Ok(None);
        }
        self.find_by_id(id)
    }

    /// Delete by id; `false` when nothing was deleted.
    pub fn delete(&self, id: i64) -> Result<bool> {
        let conn = Connection::open(&self.db_path)?;

        let rows_affected = conn.execute("DELETE FROM customer WHERE id = ?1", params![id])?;
        if rows_affected > 0 {
            info!("🗑️  Deleted customer record {}", id);
        }
        Ok(rows_affected > 0)
    }
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<CustomerRecord> {
    Ok(CustomerRecord {
        id: row.get(0)?,
        firstname: row.get(1)?,
        lastname: row.get(2)?,
        email: row.get(3)?,
        phone: row.get(4)?,
        create_date: row.get(5)?,
        update_date: row.get(6)?,
    })
}
