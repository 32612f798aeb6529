//! Generic key-partitioned document store.
//!
//! The remote database is abstracted as named collections of JSON documents.
//! Two backends are provided: an in-memory store for tests and tooling, and
//! a file-backed store (one JSON file per collection) with file locking and
//! atomic replace on write.

use crate::{Error, Result};
use fs2::FileExt;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::NamedTempFile;

/// A single equality filter for collection queries
#[derive(Clone, Debug)]
pub struct Filter {
    pub field: String,
    pub value: Value,
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Path of a subcollection nested under a parent document
pub fn subcollection_path(parent_collection: &str, parent_id: &str, name: &str) -> String {
    format!("{}/{}/{}", parent_collection, parent_id, name)
}

/// Key-partitioned document store operations.
///
/// Implementations must be safe to share across threads; every call is a
/// complete read or write against one collection.
pub trait DocumentStore: Send + Sync {
    /// Fetch a document by id; `Ok(None)` when absent
    fn get_document(&self, collection: &str, id: &str) -> Result<Option<Value>>;

    /// Create or replace a document. With `merge`, existing top-level fields
    /// not present in `fields` are preserved.
    fn set_document(&self, collection: &str, id: &str, fields: Value, merge: bool) -> Result<()>;

    /// Overwrite an existing document; fails if the document is absent
    fn update_document(&self, collection: &str, id: &str, fields: Value) -> Result<()>;

    /// Fetch all documents matching every filter (unordered)
    fn query_collection(&self, collection: &str, filters: &[Filter]) -> Result<Vec<Value>>;

    /// Fetch all documents of a subcollection nested under a parent document
    fn list_subcollection(
        &self,
        parent_collection: &str,
        parent_id: &str,
        name: &str,
    ) -> Result<Vec<Value>> {
        self.query_collection(&subcollection_path(parent_collection, parent_id, name), &[])
    }
}

fn matches_filters(doc: &Value, filters: &[Filter]) -> bool {
    filters
        .iter()
        .all(|f| doc.get(&f.field) == Some(&f.value))
}

fn merge_fields(existing: &mut Value, fields: Value) {
    match (existing.as_object_mut(), fields) {
        (Some(existing_map), Value::Object(new_map)) => {
            for (k, v) in new_map {
                existing_map.insert(k, v);
            }
        }
        (_, fields) => *existing = fields,
    }
}

// ============================================================================
// Memory Store
// ============================================================================

/// In-memory document store for tests and local tooling
#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, BTreeMap<String, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, BTreeMap<String, Value>>> {
        match self.collections.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl DocumentStore for MemoryStore {
    fn get_document(&self, collection: &str, id: &str) -> Result<Option<Value>> {
        Ok(self
            .lock()
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    fn set_document(&self, collection: &str, id: &str, fields: Value, merge: bool) -> Result<()> {
        let mut collections = self.lock();
        let docs = collections.entry(collection.to_string()).or_default();
        match docs.get_mut(id) {
            Some(existing) if merge => merge_fields(existing, fields),
            _ => {
                docs.insert(id.to_string(), fields);
            }
        }
        Ok(())
    }

    fn update_document(&self, collection: &str, id: &str, fields: Value) -> Result<()> {
        let mut collections = self.lock();
        let docs = collections
            .get_mut(collection)
            .ok_or_else(|| Error::Store(format!("collection '{}' not found", collection)))?;
        match docs.get_mut(id) {
            Some(existing) => {
                *existing = fields;
                Ok(())
            }
            None => Err(Error::Store(format!(
                "document '{}/{}' not found",
                collection, id
            ))),
        }
    }

    fn query_collection(&self, collection: &str, filters: &[Filter]) -> Result<Vec<Value>> {
        Ok(self
            .lock()
            .get(collection)
            .map(|docs| {
                docs.values()
                    .filter(|doc| matches_filters(doc, filters))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

// ============================================================================
// File Store
// ============================================================================

/// File-backed document store: one JSON file per collection.
///
/// Reads take a shared lock; writes go through a temp file with an exclusive
/// lock and an atomic rename, so a crashed writer never leaves a torn
/// collection file behind.
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn collection_file(&self, collection: &str) -> PathBuf {
        // Subcollection paths contain '/'; flatten to a single file name
        let file_name = format!("{}.json", collection.replace('/', "__"));
        self.data_dir.join("store").join(file_name)
    }

    fn read_collection(&self, collection: &str) -> Result<BTreeMap<String, Value>> {
        let path = self.collection_file(collection);
        if !path.exists() {
            return Ok(BTreeMap::new());
        }

        let file = File::open(&path)?;
        file.lock_shared()?;

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        let read_result = reader.read_to_string(&mut contents);
        file.unlock()?;
        read_result?;

        match serde_json::from_str::<BTreeMap<String, Value>>(&contents) {
            Ok(docs) => Ok(docs),
            Err(e) => {
                tracing::warn!(
                    "Failed to parse collection file {:?}: {}. Treating as empty.",
                    path,
                    e
                );
                Ok(BTreeMap::new())
            }
        }
    }

    fn write_collection(&self, collection: &str, docs: &BTreeMap<String, Value>) -> Result<()> {
        let path = self.collection_file(collection);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Unique temp file in the same directory for atomic rename
        let temp = NamedTempFile::new_in(path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "collection path missing parent")
        })?)?;

        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(docs)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(&path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Wrote {} documents to {:?}", docs.len(), path);
        Ok(())
    }
}

impl DocumentStore for FileStore {
    fn get_document(&self, collection: &str, id: &str) -> Result<Option<Value>> {
        Ok(self.read_collection(collection)?.remove(id))
    }

    fn set_document(&self, collection: &str, id: &str, fields: Value, merge: bool) -> Result<()> {
        let mut docs = self.read_collection(collection)?;
        match docs.get_mut(id) {
            Some(existing) if merge => merge_fields(existing, fields),
            _ => {
                docs.insert(id.to_string(), fields);
            }
        }
        self.write_collection(collection, &docs)
    }

    fn update_document(&self, collection: &str, id: &str, fields: Value) -> Result<()> {
        let mut docs = self.read_collection(collection)?;
        match docs.get_mut(id) {
            Some(existing) => *existing = fields,
            None => {
                return Err(Error::Store(format!(
                    "document '{}/{}' not found",
                    collection, id
                )))
            }
        }
        self.write_collection(collection, &docs)
    }

    fn query_collection(&self, collection: &str, filters: &[Filter]) -> Result<Vec<Value>> {
        Ok(self
            .read_collection(collection)?
            .into_values()
            .filter(|doc| matches_filters(doc, filters))
            .collect())
    }
}

/// Documents stored as plain JSON values
pub fn to_document<T: serde::Serialize>(value: &T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

/// Deserialize a stored document, surfacing the field that failed
pub fn from_document<T: serde::de::DeserializeOwned>(value: Value) -> Result<T> {
    Ok(serde_json::from_value(value)?)
}
