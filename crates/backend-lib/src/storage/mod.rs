// ============================
// crates/backend-lib/src/storage/mod.rs
// ============================
//! Storage abstraction with document-file and SQLite implementations.
//!
//! Both backends persist any [`Entity`] and honour the same contract:
//! equality and prefix filters on known fields, ordering by id or by a
//! field, partial updates through a [`Patch`], hard deletes.
use std::cmp::Ordering;

use async_trait::async_trait;
use hrms_common::{Entity, Id};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::AppError;

pub mod document;
pub mod sql;

pub use document::DocumentStore;
pub use sql::SqlStore;

/// Trait for storage backends
#[async_trait]
pub trait Storage: Send + Sync + 'static {
    /// Records matching `filter`
    async fn list<T: Entity>(&self, filter: Filter) -> Result<Vec<T>, AppError>;

    /// Record by id
    async fn get<T: Entity>(&self, id: Id) -> Result<Option<T>, AppError>;

    /// Store a new record and return it with its assigned id
    async fn insert<T: Entity>(&self, record: T) -> Result<T, AppError>;

    /// Apply `patch` to the record with `id`; `None` if there is none
    async fn update<T: Entity>(&self, id: Id, patch: Patch) -> Result<Option<T>, AppError>;

    /// Remove the record with `id`; false if there was none
    async fn delete<T: Entity>(&self, id: Id) -> Result<bool, AppError>;

    /// Number of records matching `filter`; order and limit are ignored
    async fn count<T: Entity>(&self, filter: Filter) -> Result<usize, AppError>;

    /// Insert `record` only while the `P` record `parent` exists.
    /// `None` when it does not; the check and the write are atomic.
    async fn insert_linked<P: Entity, T: Entity>(&self, parent: Id, record: T) -> Result<Option<T>, AppError>;

    /// Delete the `T` record `id` unless some `R` record has `field == id`.
    /// The reference check and the delete are atomic.
    async fn delete_unreferenced<T: Entity, R: Entity>(
        &self,
        id: Id,
        field: &'static str,
    ) -> Result<Removal, AppError>;
}

/// Outcome of [`Storage::delete_unreferenced`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    Deleted,
    Missing,
    /// Still referenced by this many records
    Referenced(usize),
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    #[default]
    Asc,
    Desc,
}

/// One predicate on a stored field
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Field equals the value (`null` matches `null`)
    Eq(&'static str, Value),
    /// Text field starts with the prefix
    Prefix(&'static str, String),
}

impl Condition {
    pub fn field(&self) -> &'static str {
        match self {
            Condition::Eq(field, _) | Condition::Prefix(field, _) => field,
        }
    }

    /// Evaluate against a serialized record
    pub fn matches(&self, object: &Map<String, Value>) -> bool {
        let value = object.get(self.field()).unwrap_or(&Value::Null);
        match self {
            Condition::Eq(_, expected) => value == expected,
            Condition::Prefix(_, prefix) => value.as_str().is_some_and(|s| s.starts_with(prefix)),
        }
    }
}

/// Query over one collection: conditions (all must hold), order, limit.
/// Records sort on `sort_by` when set, with `id` breaking ties.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    pub conditions: Vec<Condition>,
    pub sort_by: Option<&'static str>,
    pub order: Order,
    pub limit: Option<usize>,
}

impl Filter {
    /// Everything, oldest first
    pub fn all() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: &'static str, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition::Eq(field, value.into()));
        self
    }

    pub fn starts_with(mut self, field: &'static str, prefix: impl Into<String>) -> Self {
        self.conditions.push(Condition::Prefix(field, prefix.into()));
        self
    }

    pub fn newest_first(mut self) -> Self {
        self.order = Order::Desc;
        self
    }

    /// Largest `field` value first
    pub fn latest_by(mut self, field: &'static str) -> Self {
        self.sort_by = Some(field);
        self.order = Order::Desc;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Reject fields `T` does not have; filters are built in code, so this
    /// is a programming error rather than bad input
    pub fn check<T: Entity>(&self) -> Result<(), AppError> {
        let unknown = self
            .conditions
            .iter()
            .map(Condition::field)
            .chain(self.sort_by)
            .find(|field| !T::has_field(field));
        match unknown {
            Some(field) => Err(AppError::Internal(format!(
                "unknown filter field {}.{field}",
                T::COLLECTION
            ))),
            None => Ok(()),
        }
    }

    /// Whether a serialized record satisfies every condition
    pub fn matches(&self, object: &Map<String, Value>) -> bool {
        self.conditions.iter().all(|c| c.matches(object))
    }
}

/// Order two stored values the way SQLite orders a column: nulls first,
/// then numbers, then text
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    fn rank(value: &Value) -> u8 {
        match value {
            Value::Null => 0,
            Value::Bool(_) | Value::Number(_) => 1,
            Value::String(_) => 2,
            Value::Array(_) | Value::Object(_) => 3,
        }
    }
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        },
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

/// Field → new value; fields not named keep their value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch(pub Map<String, Value>);

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.0.insert(field.to_string(), value.into());
        self
    }

    pub fn set_serialized<V: Serialize>(self, field: &str, value: &V) -> Result<Self, AppError> {
        Ok(self.set(field, serde_json::to_value(value)?))
    }

    /// Set `field` only when `value` is present
    pub fn set_opt<V: Into<Value>>(self, field: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.set(field, v),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Serialize a record into its JSON object form
pub fn to_object<T: Serialize>(record: &T) -> Result<Map<String, Value>, AppError> {
    match serde_json::to_value(record)? {
        Value::Object(map) => Ok(map),
        other => Err(AppError::Internal(format!(
            "record serialized to {other} instead of an object"
        ))),
    }
}

/// Apply `patch` to `current`. Returns the patched record and its
/// serialized form. Unknown fields, `id`, and values of the wrong
/// shape are validation errors.
pub fn apply_patch<T: Entity>(current: &T, patch: &Patch) -> Result<(T, Map<String, Value>), AppError> {
    if let Some(field) = patch.fields().find(|f| !T::FIELDS.contains(f)) {
        return Err(AppError::invalid(format!("Unknown field: {field}")));
    }

    let mut object = to_object(current)?;
    for (field, value) in &patch.0 {
        object.insert(field.clone(), value.clone());
    }

    let updated: T = serde_json::from_value(Value::Object(object))
        .map_err(|e| AppError::invalid(format!("Invalid value: {e}")))?;
    // Round-trip so callers persist the canonical representation
    let object = to_object(&updated)?;
    Ok((updated, object))
}
