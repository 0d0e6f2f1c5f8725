//! The mentor dashboard's planning list.

use serde_json::json;

use mentorlink_shared::constants::COLLECTION_TASKS;
use mentorlink_shared::models::Task;
use mentorlink_shared::types::{TaskId, UserId};

use crate::document_store::{require, ChangeEvent, CollectionWatch, DocumentStore};
use crate::documents::{Document, DocumentUpdate, FieldEq, Fields};
use crate::error::{Result, StoreError};
use crate::records::{field, task_from_document};

pub async fn add_task(store: &dyn DocumentStore, owner: &UserId, text: &str) -> Result<Task> {
    let fields: Fields = [
        (field::OWNER_ID.to_string(), json!(owner.as_str())),
        (field::TEXT.to_string(), json!(text)),
    ]
    .into_iter()
    .collect();

    let id = store.add_document(COLLECTION_TASKS, fields.clone()).await?;
    Ok(task_from_document(&Document { id, fields }))
}

pub async fn list_tasks(store: &dyn DocumentStore, owner: &UserId) -> Result<Vec<Task>> {
    let docs = store
        .query(COLLECTION_TASKS, &[FieldEq::new(field::OWNER_ID, owner.as_str())])
        .await?;
    Ok(docs.iter().map(task_from_document).collect())
}

/// Fetch a task, treating other owners' tasks as absent.
async fn owned_task(store: &dyn DocumentStore, owner: &UserId, id: &TaskId) -> Result<Task> {
    let task = task_from_document(&require(store, COLLECTION_TASKS, id.as_str()).await?);
    if &task.owner_id != owner {
        return Err(StoreError::not_found(COLLECTION_TASKS, id.as_str()));
    }
    Ok(task)
}

pub async fn edit_task(
    store: &dyn DocumentStore,
    owner: &UserId,
    id: &TaskId,
    text: &str,
) -> Result<Task> {
    let mut task = owned_task(store, owner, id).await?;
    store
        .update(
            COLLECTION_TASKS,
            id.as_str(),
            DocumentUpdate::new().set(field::TEXT, text),
        )
        .await?;
    task.text = text.to_string();
    Ok(task)
}

pub async fn delete_task(store: &dyn DocumentStore, owner: &UserId, id: &TaskId) -> Result<()> {
    owned_task(store, owner, id).await?;
    store.delete_document(COLLECTION_TASKS, id.as_str()).await?;
    Ok(())
}

/// Changes to one owner's tasks.
pub struct TaskWatch {
    owner: UserId,
    inner: CollectionWatch,
}

impl TaskWatch {
    /// Next change to a task of this owner, or `None` once the store is gone.
    pub async fn recv(&mut self) -> Option<ChangeEvent> {
        loop {
            let event = self.inner.recv().await?;
            let owner = event.fields.get(field::OWNER_ID).and_then(|v| v.as_str());
            if owner == Some(self.owner.as_str()) {
                return Some(event);
            }
        }
    }
}

pub fn watch_tasks(store: &dyn DocumentStore, owner: &UserId) -> TaskWatch {
    TaskWatch {
        owner: owner.clone(),
        inner: store.subscribe(COLLECTION_TASKS),
    }
}
