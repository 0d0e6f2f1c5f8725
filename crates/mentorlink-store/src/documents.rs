//! Schemaless document CRUD on top of [`Database`].
//!
//! A document is a JSON object stored in the `documents` table under a
//! `(collection, id)` key. Updates are applied inside a transaction so that
//! field replacements and array appends land together or not at all.

use chrono::Utc;
use rusqlite::params;
use serde_json::{Map, Value};
use tracing::warn;

use crate::database::Database;
use crate::error::{Result, StoreError};

pub type Fields = Map<String, Value>;

/// A stored document: its ID plus whatever fields it happens to carry.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

/// Field equality predicate for [`Database::query_documents`].
#[derive(Debug, Clone, PartialEq)]
pub struct FieldEq {
    pub field: String,
    pub value: Value,
}

impl FieldEq {
    pub fn new(field: &str, value: impl Into<Value>) -> Self {
        Self {
            field: field.to_string(),
            value: value.into(),
        }
    }

    fn matches(&self, fields: &Fields) -> bool {
        fields.get(&self.field) == Some(&self.value)
    }
}

/// One logical write against a single document.
///
/// There is no numeric increment: callers that need `x + 1`
/// compute it from a value they read earlier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentUpdate {
    set: Vec<(String, Value)>,
    append: Vec<(String, Value)>,
    expect_len: Option<(String, usize)>,
}

impl DocumentUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace (or create) a field.
    pub fn set(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.set.push((field.to_string(), value.into()));
        self
    }

    /// Append to an array field, creating it if missing or not an array.
    pub fn append(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.append.push((field.to_string(), value.into()));
        self
    }

    /// Only apply if the array `field` currently holds exactly `len` entries.
    pub fn expect_array_len(mut self, field: &str, len: usize) -> Self {
        self.expect_len = Some((field.to_string(), len));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.append.is_empty()
    }

    pub(crate) fn apply_to(&self, fields: &mut Fields) -> Result<()> {
        if let Some((field, expected)) = &self.expect_len {
            let actual = array_len(fields, field);
            if actual != *expected {
                return Err(StoreError::Conflict {
                    field: field.clone(),
                    expected: *expected,
                    actual,
                });
            }
        }

        for (field, value) in &self.set {
            fields.insert(field.clone(), value.clone());
        }

        for (field, value) in &self.append {
            match fields.get_mut(field) {
                Some(Value::Array(items)) => items.push(value.clone()),
                _ => {
                    fields.insert(field.clone(), Value::Array(vec![value.clone()]));
                }
            }
        }

        Ok(())
    }
}

fn array_len(fields: &Fields, field: &str) -> usize {
    fields
        .get(field)
        .and_then(Value::as_array)
        .map(Vec::len)
        .unwrap_or(0)
}

/// Parse a stored body, treating anything that is not a JSON object as empty.
fn parse_body(collection: &str, id: &str, body: &str) -> Fields {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(fields)) => fields,
        Ok(_) | Err(_) => {
            warn!(collection, id, "Stored document is not a JSON object, treating as empty");
            Fields::new()
        }
    }
}

impl Database {
    /// Insert a new document. Fails if the key already exists.
    pub fn insert_document(&self, collection: &str, id: &str, fields: &Fields) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        self.conn().execute(
            "INSERT INTO documents (collection, id, body, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            params![collection, id, serde_json::to_string(fields)?, now],
        )?;
        Ok(())
    }

    /// Create or fully replace a document under a caller-chosen ID.
    pub fn put_document(&self, collection: &str, id: &str, fields: &Fields) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        self.conn().execute(
            "INSERT INTO documents (collection, id, body, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)
             ON CONFLICT (collection, id) DO UPDATE SET body = excluded.body,
                                                        updated_at = excluded.updated_at",
            params![collection, id, serde_json::to_string(fields)?, now],
        )?;
        Ok(())
    }

    pub fn get_document(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let body = self.conn().query_row(
            "SELECT body FROM documents WHERE collection = ?1 AND id = ?2",
            params![collection, id],
            |row| row.get::<_, String>(0),
        );

        match body {
            Ok(body) => Ok(Some(Document {
                id: id.to_string(),
                fields: parse_body(collection, id, &body),
            })),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(other) => Err(StoreError::Sqlite(other)),
        }
    }

    /// All documents of a collection, oldest first.
    pub fn list_documents(&self, collection: &str) -> Result<Vec<Document>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, body FROM documents WHERE collection = ?1
             ORDER BY created_at ASC, rowid ASC",
        )?;

        let rows = stmt.query_map(params![collection], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut documents = Vec::new();
        for row in rows {
            let (id, body) = row?;
            let fields = parse_body(collection, &id, &body);
            documents.push(Document { id, fields });
        }
        Ok(documents)
    }

    /// Documents whose fields equal every predicate.
    pub fn query_documents(&self, collection: &str, predicates: &[FieldEq]) -> Result<Vec<Document>> {
        let mut documents = self.list_documents(collection)?;
        documents.retain(|doc| predicates.iter().all(|p| p.matches(&doc.fields)));
        Ok(documents)
    }

    /// Apply `update` atomically. Returns the resulting fields.
    pub fn update_document(
        &self,
        collection: &str,
        id: &str,
        update: &DocumentUpdate,
    ) -> Result<Fields> {
        let tx = self.conn().unchecked_transaction()?;

        let body: String = tx
            .query_row(
                "SELECT body FROM documents WHERE collection = ?1 AND id = ?2",
                params![collection, id],
                |row| row.get(0),
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::not_found(collection, id),
                other => StoreError::Sqlite(other),
            })?;

        let mut fields = parse_body(collection, id, &body);
        update.apply_to(&mut fields)?;

        tx.execute(
            "UPDATE documents SET body = ?1, updated_at = ?2 WHERE collection = ?3 AND id = ?4",
            params![
                serde_json::to_string(&fields)?,
                Utc::now().to_rfc3339(),
                collection,
                id
            ],
        )?;
        tx.commit()?;

        Ok(fields)
    }

    pub fn delete_document(&self, collection: &str, id: &str) -> Result<bool> {
        let affected = self.conn().execute(
            "DELETE FROM documents WHERE collection = ?1 AND id = ?2",
            params![collection, id],
        )?;
        Ok(affected > 0)
    }
}
