//! # mentorlink-store
//!
//! Document storage for MentorLink, backed by SQLite.
//!
//! Records are schemaless JSON documents grouped into collections and keyed by
//! generated IDs. The crate offers three layers:
//!
//! - [`Database`]: a synchronous handle over a `rusqlite::Connection` with
//!   document CRUD helpers.
//! - [`DocumentStore`]: the async collaborator interface the rest of the
//!   system talks to, implemented by [`SqliteDocumentStore`].
//! - Typed repositories (`mentors`, `accounts`, `tasks`, `reviews`) that
//!   normalize documents into the models of `mentorlink-shared`.

pub mod accounts;
pub mod database;
pub mod document_store;
pub mod documents;
pub mod mentors;
pub mod migrations;
pub mod records;
pub mod reviews;
pub mod tasks;

mod error;

pub use database::Database;
pub use document_store::{ChangeEvent, ChangeKind, CollectionWatch, DocumentStore, SqliteDocumentStore};
pub use documents::{Document, DocumentUpdate, FieldEq};
pub use error::{Result, StoreError};
pub use reviews::RatingWriteMode;
pub use tasks::TaskWatch;
