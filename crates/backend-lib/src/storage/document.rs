// ============================
// crates/backend-lib/src/storage/document.rs
// ============================
//! Flat-file backend: one pretty-printed JSON array per collection.
use std::{
    cmp::Ordering,
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use hrms_common::{Entity, Id, COLLECTIONS};
use metrics::counter;
use serde_json::{Map, Value};
use tokio::{fs as tokio_fs, sync::RwLock};

use super::{apply_patch, compare_values, to_object, Filter, Order, Patch, Removal, Storage};
use crate::error::AppError;
use crate::metrics::STORAGE_WRITE;

/// Document implementation of the Storage trait.
///
/// Every mutation is a read-modify-write of the whole file under the
/// collection's write lock; the new contents go to a temp file that is
/// then renamed over the old one. Operations spanning two collections
/// lock the parent collection before the child.
pub struct DocumentStore {
    root: PathBuf,
    locks: DashMap<&'static str, Arc<RwLock<()>>>,
}

impl DocumentStore {
    /// Open the data directory, creating it and any missing collection files
    pub fn new<P: AsRef<Path>>(root: P) -> anyhow::Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        for collection in COLLECTIONS {
            let path = collection_path(&root, collection);
            if !path.exists() {
                fs::write(&path, "[]")?;
            }
        }
        tracing::info!(path = %root.display(), "document store opened");
        Ok(Self {
            root,
            locks: DashMap::new(),
        })
    }

    fn lock_for<T: Entity>(&self) -> Arc<RwLock<()>> {
        self.locks.entry(T::COLLECTION).or_default().clone()
    }

    fn path_for<T: Entity>(&self) -> PathBuf {
        collection_path(&self.root, T::COLLECTION)
    }

    async fn load<T: Entity>(&self) -> Result<Vec<T>, AppError> {
        let path = self.path_for::<T>();
        let content = match tokio_fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    async fn save<T: Entity>(&self, records: &[T]) -> Result<(), AppError> {
        let path = self.path_for::<T>();
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(records)?;
        tokio_fs::write(&tmp, json).await?;
        tokio_fs::rename(&tmp, &path).await?;
        counter!(STORAGE_WRITE).increment(1);
        Ok(())
    }
}

fn collection_path(root: &Path, collection: &str) -> PathBuf {
    root.join(format!("{collection}.json"))
}

/// Wall-clock milliseconds, bumped past the largest id in use
fn next_id<T: Entity>(records: &[T]) -> Id {
    let last = records.iter().map(|r| r.id()).max().unwrap_or(0);
    Utc::now().timestamp_millis().max(last + 1)
}

/// Error if another record already holds the values of a `T::UNIQUE`
/// field or a `T::UNIQUE_TOGETHER` group. Groups with a `null` value are
/// not checked.
fn check_unique<T: Entity>(
    records: &[T],
    candidate: &Map<String, Value>,
    skip_id: Option<Id>,
) -> Result<(), AppError> {
    if T::UNIQUE.is_empty() && T::UNIQUE_TOGETHER.is_empty() {
        return Ok(());
    }
    let others = records
        .iter()
        .filter(|r| Some(r.id()) != skip_id)
        .map(to_object)
        .collect::<Result<Vec<_>, _>>()?;

    let groups = T::UNIQUE
        .iter()
        .map(std::slice::from_ref)
        .chain(T::UNIQUE_TOGETHER.iter().copied());
    for group in groups {
        let Some(values) = group
            .iter()
            .map(|field| candidate.get(*field).filter(|v| !v.is_null()))
            .collect::<Option<Vec<_>>>()
        else {
            continue;
        };
        let taken = others.iter().any(|existing| {
            group
                .iter()
                .zip(&values)
                .all(|(field, value)| existing.get(*field) == Some(*value))
        });
        if taken {
            return Err(AppError::Conflict(format!(
                "Duplicate value for {}.{}",
                T::COLLECTION,
                group.join("+")
            )));
        }
    }
    Ok(())
}

#[async_trait]
impl Storage for DocumentStore {
    async fn list<T: Entity>(&self, filter: Filter) -> Result<Vec<T>, AppError> {
        filter.check::<T>()?;
        let lock = self.lock_for::<T>();
        let _guard = lock.read().await;

        let mut matched = Vec::new();
        for record in self.load::<T>().await? {
            let object = to_object(&record)?;
            if filter.matches(&object) {
                matched.push((record, object));
            }
        }
        matched.sort_by(|(a, a_object), (b, b_object)| {
            let by_field = match filter.sort_by {
                Some(field) => compare_values(
                    a_object.get(field).unwrap_or(&Value::Null),
                    b_object.get(field).unwrap_or(&Value::Null),
                ),
                None => Ordering::Equal,
            };
            by_field.then_with(|| a.id().cmp(&b.id()))
        });
        if filter.order == Order::Desc {
            matched.reverse();
        }
        if let Some(limit) = filter.limit {
            matched.truncate(limit);
        }
        Ok(matched.into_iter().map(|(record, _)| record).collect())
    }

    async fn get<T: Entity>(&self, id: Id) -> Result<Option<T>, AppError> {
        let lock = self.lock_for::<T>();
        let _guard = lock.read().await;
        Ok(self.load::<T>().await?.into_iter().find(|r| r.id() == id))
    }

    async fn insert<T: Entity>(&self, mut record: T) -> Result<T, AppError> {
        let lock = self.lock_for::<T>();
        let _guard = lock.write().await;

        let mut records = self.load::<T>().await?;
        check_unique(&records, &to_object(&record)?, None)?;
        record.set_id(next_id(&records));
        records.push(record.clone());
        self.save(&records).await?;
        Ok(record)
    }

    async fn update<T: Entity>(&self, id: Id, patch: Patch) -> Result<Option<T>, AppError> {
        let lock = self.lock_for::<T>();
        let _guard = lock.write().await;

        let mut records = self.load::<T>().await?;
        let Some(index) = records.iter().position(|r| r.id() == id) else {
            return Ok(None);
        };
        let (updated, object) = apply_patch(&records[index], &patch)?;
        check_unique(&records, &object, Some(id))?;
        records[index] = updated.clone();
        self.save(&records).await?;
        Ok(Some(updated))
    }

    async fn delete<T: Entity>(&self, id: Id) -> Result<bool, AppError> {
        let lock = self.lock_for::<T>();
        let _guard = lock.write().await;

        let mut records = self.load::<T>().await?;
        let before = records.len();
        records.retain(|r| r.id() != id);
        if records.len() == before {
            return Ok(false);
        }
        self.save(&records).await?;
        Ok(true)
    }

    async fn count<T: Entity>(&self, filter: Filter) -> Result<usize, AppError> {
        filter.check::<T>()?;
        let lock = self.lock_for::<T>();
        let _guard = lock.read().await;

        let mut count = 0;
        for record in self.load::<T>().await? {
            if filter.matches(&to_object(&record)?) {
                count += 1;
            }
        }
        Ok(count)
    }

    async fn insert_linked<P: Entity, T: Entity>(&self, parent: Id, record: T) -> Result<Option<T>, AppError> {
        let parent_lock = self.lock_for::<P>();
        let _parent_guard = parent_lock.read().await;

        if !self.load::<P>().await?.iter().any(|p| p.id() == parent) {
            return Ok(None);
        }
        self.insert(record).await.map(Some)
    }

    async fn delete_unreferenced<T: Entity, R: Entity>(
        &self,
        id: Id,
        field: &'static str,
    ) -> Result<Removal, AppError> {
        let referencing = Filter::all().eq(field, id);
        referencing.check::<R>()?;

        let lock = self.lock_for::<T>();
        let _guard = lock.write().await;
        let child_lock = self.lock_for::<R>();
        let _child_guard = child_lock.read().await;

        let mut records = self.load::<T>().await?;
        if !records.iter().any(|r| r.id() == id) {
            return Ok(Removal::Missing);
        }
        let mut references = 0;
        for child in self.load::<R>().await? {
            if referencing.matches(&to_object(&child)?) {
                references += 1;
            }
        }
        if references > 0 {
            return Ok(Removal::Referenced(references));
        }

        records.retain(|r| r.id() != id);
        self.save(&records).await?;
        Ok(Removal::Deleted)
    }
}
