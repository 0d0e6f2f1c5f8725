//! v001 -- Document table.
//!
//! Every collection shares one table. Bodies are JSON objects and carry no
//! schema of their own; typing happens in `records`.

use rusqlite::Connection;

const UP_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    collection TEXT NOT NULL,
    id         TEXT NOT NULL,               -- UUID v4, or the identity provider's user id
    body       TEXT NOT NULL,               -- JSON object
    created_at TEXT NOT NULL,               -- RFC-3339
    updated_at TEXT NOT NULL,

    PRIMARY KEY (collection, id)
);

CREATE INDEX IF NOT EXISTS idx_documents_collection_created
    ON documents(collection, created_at);
"#;

pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
