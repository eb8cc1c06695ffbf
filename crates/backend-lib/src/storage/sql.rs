// ============================
// crates/backend-lib/src/storage/sql.rs
// ============================
//! SQLite backend.
//!
//! One table per collection with `INTEGER PRIMARY KEY AUTOINCREMENT`
//! ids. Rows are converted to and from the records' JSON form so the
//! same [`Entity`] field lists drive both backends.
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use hrms_common::{Entity, Id};
use metrics::counter;
use parking_lot::Mutex;
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{params_from_iter, Connection, OptionalExtension};
use serde_json::{Map, Number, Value};

use super::{apply_patch, to_object, Condition, Filter, Order, Patch, Removal, Storage};
use crate::error::AppError;
use crate::metrics::STORAGE_WRITE;

/// Tables; column names must match each record's `FIELDS`
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    profile_picture TEXT,
    role TEXT NOT NULL DEFAULT 'employee',
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS employees (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER REFERENCES users(id),
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    phone TEXT,
    department TEXT,
    position TEXT,
    salary REAL,
    hire_date TEXT,
    status TEXT NOT NULL DEFAULT 'active',
    created_at TEXT NOT NULL
);
CREATE UNIQUE INDEX IF NOT EXISTS idx_employees_user_unique ON employees(user_id);

CREATE TABLE IF NOT EXISTS jobs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    job_title TEXT NOT NULL,
    department TEXT NOT NULL,
    experience TEXT,
    salary TEXT,
    description TEXT,
    status TEXT NOT NULL DEFAULT 'open',
    posted_date TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS candidates (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    job_id INTEGER REFERENCES jobs(id),
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    phone TEXT,
    resume_url TEXT,
    status TEXT NOT NULL DEFAULT 'pending',
    applied_date TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS leave_requests (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    employee_id INTEGER NOT NULL REFERENCES employees(id),
    leave_type TEXT NOT NULL,
    start_date TEXT NOT NULL,
    end_date TEXT NOT NULL,
    reason TEXT,
    status TEXT NOT NULL DEFAULT 'pending',
    requested_date TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_leave_employee ON leave_requests(employee_id);

CREATE TABLE IF NOT EXISTS attendance (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    employee_id INTEGER NOT NULL REFERENCES employees(id),
    attendance_date TEXT NOT NULL,
    check_in_time TEXT,
    check_out_time TEXT,
    status TEXT
);

CREATE TABLE IF NOT EXISTS payroll (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    employee_id INTEGER NOT NULL REFERENCES employees(id),
    month TEXT NOT NULL,
    basic_salary REAL NOT NULL,
    allowances REAL NOT NULL DEFAULT 0,
    deductions REAL NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    UNIQUE (employee_id, month)
);

CREATE TABLE IF NOT EXISTS tracking (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    employee_id INTEGER NOT NULL REFERENCES employees(id),
    tracking_date TEXT NOT NULL,
    location TEXT NOT NULL,
    activity TEXT,
    duration INTEGER
);
";

/// SQLite implementation of the Storage trait
#[derive(Clone)]
pub struct SqlStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqlStore {
    /// Open (or create) the database file
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;

        // WAL mode for concurrent reads + crash safety
        let mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        tracing::info!(path = %path.display(), journal_mode = %mode, "sqlite store opened");
        Self::init(conn)
    }

    /// Private database, used by tests
    pub fn open_in_memory() -> anyhow::Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> anyhow::Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking pool
    async fn run<R, F>(&self, f: F) -> Result<R, AppError>
    where
        R: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<R, AppError> + Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = conn.lock();
            f(&mut conn)
        })
        .await?
    }
}

/// Map constraint violations to client errors, everything else to 500
fn map_err(err: rusqlite::Error) -> AppError {
    if let rusqlite::Error::SqliteFailure(failure, _) = &err {
        match failure.extended_code {
            rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                return AppError::Conflict("Duplicate value".to_string());
            },
            rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
                return AppError::Conflict("Record is referenced or references a missing record".to_string());
            },
            _ => {},
        }
    }
    AppError::Database(err)
}

fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => n.as_f64().map_or(SqlValue::Null, SqlValue::Real),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}

fn from_sql_value(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => Number::from_f64(f).map_or(Value::Null, Value::Number),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
    }
}

/// `id` followed by every field, quoted
fn columns<T: Entity>() -> String {
    std::iter::once("id")
        .chain(T::FIELDS.iter().copied())
        .map(|c| format!("\"{c}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

fn row_to_record<T: Entity>(row: &rusqlite::Row<'_>) -> rusqlite::Result<Map<String, Value>> {
    let mut object = Map::new();
    for (i, name) in std::iter::once("id").chain(T::FIELDS.iter().copied()).enumerate() {
        object.insert(name.to_string(), from_sql_value(row.get_ref(i)?));
    }
    Ok(object)
}

fn decode<T: Entity>(object: Map<String, Value>) -> Result<T, AppError> {
    Ok(serde_json::from_value(Value::Object(object))?)
}

/// ` WHERE ...` clause and its parameters
fn where_clause(conditions: &[Condition]) -> (String, Vec<SqlValue>) {
    if conditions.is_empty() {
        return (String::new(), Vec::new());
    }
    let mut clauses = Vec::with_capacity(conditions.len());
    let mut params = Vec::with_capacity(conditions.len());
    for (i, condition) in conditions.iter().enumerate() {
        let n = i + 1;
        match condition {
            Condition::Eq(field, value) => {
                clauses.push(format!("\"{field}\" IS ?{n}"));
                params.push(to_sql_value(value));
            },
            Condition::Prefix(field, prefix) => {
                clauses.push(format!("substr(\"{field}\", 1, length(?{n})) = ?{n}"));
                params.push(SqlValue::Text(prefix.clone()));
            },
        }
    }
    (format!(" WHERE {}", clauses.join(" AND ")), params)
}

fn select_by_id<T: Entity>(conn: &Connection, id: Id) -> Result<Option<Map<String, Value>>, AppError> {
    let sql = format!("SELECT {} FROM \"{}\" WHERE id = ?1", columns::<T>(), T::COLLECTION);
    conn.query_row(&sql, [id], row_to_record::<T>)
        .optional()
        .map_err(map_err)
}

fn exists<T: Entity>(conn: &Connection, id: Id) -> Result<bool, AppError> {
    let sql = format!("SELECT 1 FROM \"{}\" WHERE id = ?1", T::COLLECTION);
    Ok(conn
        .query_row(&sql, [id], |_| Ok(()))
        .optional()
        .map_err(map_err)?
        .is_some())
}

/// Insert the serialized record and return the new rowid
fn insert_row<T: Entity>(conn: &Connection, object: &Map<String, Value>) -> Result<Id, AppError> {
    let placeholders: Vec<String> = (1..=T::FIELDS.len()).map(|n| format!("?{n}")).collect();
    let names: Vec<String> = T::FIELDS.iter().map(|f| format!("\"{f}\"")).collect();
    let sql = format!(
        "INSERT INTO \"{}\" ({}) VALUES ({})",
        T::COLLECTION,
        names.join(", "),
        placeholders.join(", ")
    );
    let values: Vec<SqlValue> = T::FIELDS
        .iter()
        .map(|f| to_sql_value(object.get(*f).unwrap_or(&Value::Null)))
        .collect();
    conn.execute(&sql, params_from_iter(values.iter()))
        .map_err(map_err)?;
    Ok(conn.last_insert_rowid())
}

#[async_trait]
impl Storage for SqlStore {
    async fn list<T: Entity>(&self, filter: Filter) -> Result<Vec<T>, AppError> {
        filter.check::<T>()?;
        self.run(move |conn| {
            let (clause, params) = where_clause(&filter.conditions);
            let order = match filter.order {
                Order::Asc => "ASC",
                Order::Desc => "DESC",
            };
            let sort = match filter.sort_by {
                Some(field) => format!("\"{field}\" {order}, id {order}"),
                None => format!("id {order}"),
            };
            let mut sql = format!(
                "SELECT {} FROM \"{}\"{clause} ORDER BY {sort}",
                columns::<T>(),
                T::COLLECTION
            );
            if let Some(limit) = filter.limit {
                sql.push_str(&format!(" LIMIT {limit}"));
            }

            let mut stmt = conn.prepare(&sql).map_err(map_err)?;
            let rows = stmt
                .query_map(params_from_iter(params.iter()), row_to_record::<T>)
                .map_err(map_err)?;
            let mut records = Vec::new();
            for row in rows {
                records.push(decode(row.map_err(map_err)?)?);
            }
            Ok(records)
        })
        .await
    }

    async fn get<T: Entity>(&self, id: Id) -> Result<Option<T>, AppError> {
        self.run(move |conn| select_by_id::<T>(conn, id)?.map(decode::<T>).transpose())
            .await
    }

    async fn insert<T: Entity>(&self, mut record: T) -> Result<T, AppError> {
        let object = to_object(&record)?;
        let id = self.run(move |conn| insert_row::<T>(conn, &object)).await?;
        counter!(STORAGE_WRITE).increment(1);
        record.set_id(id);
        Ok(record)
    }

    async fn update<T: Entity>(&self, id: Id, patch: Patch) -> Result<Option<T>, AppError> {
        let updated = self
            .run(move |conn| {
                let tx = conn.transaction().map_err(map_err)?;
                let Some(current) = select_by_id::<T>(&tx, id)? else {
                    return Ok(None);
                };
                let current: T = decode(current)?;
                let (updated, object) = apply_patch(&current, &patch)?;
                if patch.is_empty() {
                    return Ok(Some(updated));
                }

                let fields: Vec<&str> = patch.fields().collect();
                let sets: Vec<String> = fields
                    .iter()
                    .enumerate()
                    .map(|(i, f)| format!("\"{f}\" = ?{}", i + 1))
                    .collect();
                let sql = format!(
                    "UPDATE \"{}\" SET {} WHERE id = ?{}",
                    T::COLLECTION,
                    sets.join(", "),
                    fields.len() + 1
                );
                let mut values: Vec<SqlValue> = fields
                    .iter()
                    .map(|f| to_sql_value(object.get(*f).unwrap_or(&Value::Null)))
                    .collect();
                values.push(SqlValue::Integer(id));
                tx.execute(&sql, params_from_iter(values.iter()))
                    .map_err(map_err)?;
                tx.commit().map_err(map_err)?;
                Ok(Some(updated))
            })
            .await?;
        if updated.is_some() {
            counter!(STORAGE_WRITE).increment(1);
        }
        Ok(updated)
    }

    async fn delete<T: Entity>(&self, id: Id) -> Result<bool, AppError> {
        let removed = self
            .run(move |conn| {
                let sql = format!("DELETE FROM \"{}\" WHERE id = ?1", T::COLLECTION);
                Ok(conn.execute(&sql, [id]).map_err(map_err)? > 0)
            })
            .await?;
        if removed {
            counter!(STORAGE_WRITE).increment(1);
        }
        Ok(removed)
    }

    async fn count<T: Entity>(&self, filter: Filter) -> Result<usize, AppError> {
        filter.check::<T>()?;
        self.run(move |conn| {
            let (clause, params) = where_clause(&filter.conditions);
            let sql = format!("SELECT COUNT(*) FROM \"{}\"{clause}", T::COLLECTION);
            let count: i64 = conn
                .query_row(&sql, params_from_iter(params.iter()), |row| row.get(0))
                .map_err(map_err)?;
            Ok(usize::try_from(count).unwrap_or(0))
        })
        .await
    }

    async fn insert_linked<P: Entity, T: Entity>(&self, parent: Id, mut record: T) -> Result<Option<T>, AppError> {
        let object = to_object(&record)?;
        let id = self
            .run(move |conn| {
                let tx = conn.transaction().map_err(map_err)?;
                if !exists::<P>(&tx, parent)? {
                    return Ok(None);
                }
                let id = insert_row::<T>(&tx, &object)?;
                tx.commit().map_err(map_err)?;
                Ok(Some(id))
            })
            .await?;
        let Some(id) = id else { return Ok(None) };
        counter!(STORAGE_WRITE).increment(1);
        record.set_id(id);
        Ok(Some(record))
    }

    async fn delete_unreferenced<T: Entity, R: Entity>(
        &self,
        id: Id,
        field: &'static str,
    ) -> Result<Removal, AppError> {
        Filter::all().eq(field, id).check::<R>()?;
        let removal = self
            .run(move |conn| {
                let tx = conn.transaction().map_err(map_err)?;
                if !exists::<T>(&tx, id)? {
                    return Ok(Removal::Missing);
                }
                let sql = format!("SELECT COUNT(*) FROM \"{}\" WHERE \"{field}\" = ?1", R::COLLECTION);
                let references: i64 = tx.query_row(&sql, [id], |row| row.get(0)).map_err(map_err)?;
                if references > 0 {
                    return Ok(Removal::Referenced(usize::try_from(references).unwrap_or(usize::MAX)));
                }
                let sql = format!("DELETE FROM \"{}\" WHERE id = ?1", T::COLLECTION);
                tx.execute(&sql, [id]).map_err(map_err)?;
                tx.commit().map_err(map_err)?;
                Ok(Removal::Deleted)
            })
            .await?;
        if removal == Removal::Deleted {
            counter!(STORAGE_WRITE).increment(1);
        }
        Ok(removal)
    }
}
