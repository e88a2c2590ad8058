use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::{Map, Value};

use crate::models::{Party, Role};

// ── Collections ──

/// Document collections served by the embedded backend. Documents are stored
/// as JSON with their owner ids lifted into columns for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Bookings,
    Notifications,
    Reviews,
}

impl Collection {
    fn table(&self) -> &'static str {
        match self {
            Collection::Bookings => "bookings",
            Collection::Notifications => "notifications",
            Collection::Reviews => "reviews",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnerFilter {
    User(String),
    Partner(String),
}

fn owner_ids(doc: &Value) -> (Option<&str>, Option<&str>) {
    (
        doc.get("userId").and_then(Value::as_str),
        doc.get("partnerId").and_then(Value::as_str),
    )
}

fn parse_document(raw: &str, column: usize) -> rusqlite::Result<Value> {
    serde_json::from_str(raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

/// Inserts a document keyed by its `id` field. Returns false if the id is taken.
pub fn insert_document(
    conn: &Connection,
    collection: Collection,
    id: &str,
    doc: &Value,
) -> rusqlite::Result<bool> {
    let (user_id, partner_id) = owner_ids(doc);
    let sql = format!(
        "INSERT OR IGNORE INTO {} (id, user_id, partner_id, data) VALUES (?1, ?2, ?3, ?4)",
        collection.table()
    );
    let count = conn.execute(&sql, params![id, user_id, partner_id, doc.to_string()])?;
    Ok(count > 0)
}

/// Lists documents in insertion order.
pub fn list_documents(
    conn: &Connection,
    collection: Collection,
    filter: Option<&OwnerFilter>,
) -> rusqlite::Result<Vec<Value>> {
    let table = collection.table();
    let (sql, owner) = match filter {
        Some(OwnerFilter::User(id)) => (
            format!("SELECT data FROM {table} WHERE user_id = ?1 ORDER BY rowid ASC"),
            Some(id.as_str()),
        ),
        Some(OwnerFilter::Partner(id)) => (
            format!("SELECT data FROM {table} WHERE partner_id = ?1 ORDER BY rowid ASC"),
            Some(id.as_str()),
        ),
        None => (format!("SELECT data FROM {table} ORDER BY rowid ASC"), None),
    };

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = match owner {
        Some(owner) => stmt.query(params![owner])?,
        None => stmt.query([])?,
    };

    let mut docs = vec![];
    while let Some(row) = rows.next()? {
        let raw: String = row.get(0)?;
        docs.push(parse_document(&raw, 0)?);
    }
    Ok(docs)
}

pub fn get_document(
    conn: &Connection,
    collection: Collection,
    id: &str,
) -> rusqlite::Result<Option<Value>> {
    let sql = format!("SELECT data FROM {} WHERE id = ?1", collection.table());
    let raw: Option<String> = conn
        .query_row(&sql, params![id], |row| row.get(0))
        .optional()?;

    raw.map(|raw| parse_document(&raw, 0)).transpose()
}

/// Replaces a document wholesale. The stored `id` always wins over the body's.
pub fn replace_document(
    conn: &Connection,
    collection: Collection,
    id: &str,
    mut doc: Value,
) -> rusqlite::Result<Option<Value>> {
    if let Some(obj) = doc.as_object_mut() {
        obj.insert("id".to_string(), Value::String(id.to_string()));
    }

    let (user_id, partner_id) = owner_ids(&doc);
    let sql = format!(
        "UPDATE {} SET user_id = ?1, partner_id = ?2, data = ?3 WHERE id = ?4",
        collection.table()
    );
    let count = conn.execute(&sql, params![user_id, partner_id, doc.to_string(), id])?;
    Ok((count > 0).then_some(doc))
}

/// Shallow-merges `patch` into the stored document.
pub fn patch_document(
    conn: &Connection,
    collection: Collection,
    id: &str,
    patch: &Map<String, Value>,
) -> rusqlite::Result<Option<Value>> {
    let Some(mut doc) = get_document(conn, collection, id)? else {
        return Ok(None);
    };

    if let Some(obj) = doc.as_object_mut() {
        for (key, value) in patch {
            obj.insert(key.clone(), value.clone());
        }
    }

    replace_document(conn, collection, id, doc)
}

// ── Sessions ──

pub fn get_session(conn: &Connection, token: &str) -> rusqlite::Result<Option<Party>> {
    conn.query_row(
        "SELECT party_id, role, display_name FROM sessions WHERE token = ?1",
        params![token],
        |row| {
            let role: String = row.get(1)?;
            Ok(Party {
                id: row.get(0)?,
                role: if role == "partner" {
                    Role::Partner
                } else {
                    Role::Customer
                },
                display_name: row.get(2)?,
            })
        },
    )
    .optional()
}

pub fn create_session(conn: &Connection, token: &str, party: &Party) -> rusqlite::Result<()> {
    let role = match party.role {
        Role::Customer => "customer",
        Role::Partner => "partner",
    };
    conn.execute(
        "INSERT INTO sessions (token, party_id, role, display_name) VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(token) DO UPDATE SET
           party_id = excluded.party_id,
           role = excluded.role,
           display_name = excluded.display_name",
        params![token, party.id, role, party.display_name],
    )?;
    Ok(())
}
