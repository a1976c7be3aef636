//! In-memory `Remote` double for view and write-path tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use serde_json::Value;

use super::error::ApiError;
use super::remote::{Dialect, Remote, Resource};
use crate::entities::RecordId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Op {
    Select,
    Insert,
    Update,
    Delete,
    Fetch,
}

/// Tables keyed by resource path (REST scope substituted). Postgrest scope
/// filters are applied on select, like the real table API.
#[derive(Default)]
pub(crate) struct MemoryRemote {
    tables: Mutex<HashMap<String, Vec<Value>>>,
    documents: Mutex<HashMap<String, Value>>,
    failures: Mutex<HashMap<Op, VecDeque<ApiError>>>,
    calls: Mutex<Vec<(Op, String)>>,
    next_id: AtomicI64,
}

impl MemoryRemote {
    pub(crate) fn new() -> Self {
        Self { next_id: AtomicI64::new(1000), ..Self::default() }
    }

    pub(crate) fn seed(&self, path: &str, rows: Vec<Value>) {
        self.tables.lock().unwrap().insert(path.to_owned(), rows);
    }

    pub(crate) fn set_document(&self, path: &str, doc: Value) {
        self.documents.lock().unwrap().insert(path.to_owned(), doc);
    }

    pub(crate) fn rows(&self, path: &str) -> Vec<Value> {
        self.tables.lock().unwrap().get(path).cloned().unwrap_or_default()
    }

    /// Make the next call of `op` fail with `err`.
    pub(crate) fn fail_next(&self, op: Op, err: ApiError) {
        self.failures.lock().unwrap().entry(op).or_default().push_back(err);
    }

    pub(crate) fn calls(&self) -> Vec<(Op, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, op: Op) -> usize {
        self.calls.lock().unwrap().iter().filter(|(o, _)| *o == op).count()
    }

    fn enter(&self, op: Op, resource: &Resource) -> Result<String, ApiError> {
        let key = resource.collection_path()?;
        self.calls.lock().unwrap().push((op, key.clone()));
        if let Some(err) = self.failures.lock().unwrap().get_mut(&op).and_then(VecDeque::pop_front) {
            return Err(err);
        }
        Ok(key)
    }

    fn assign_id(&self, resource: &Resource, row: &mut Value) {
        let Value::Object(map) = row else { return };
        if map.get("id").is_some_and(|id| !id.is_null()) {
            return;
        }
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        let id = match resource.dialect {
            Dialect::Postgrest => Value::from(n),
            Dialect::Rest => Value::from(format!("r{n}")),
        };
        map.insert("id".into(), id);
        if let (Some(column), Some(scope)) = (resource.scope_key, resource.scope.as_deref()) {
            map.entry(column).or_insert_with(|| scope_value(scope));
        }
    }
}

fn scope_value(scope: &str) -> Value {
    scope.parse::<i64>().map_or_else(|_| Value::from(scope), Value::from)
}

fn id_matches(row: &Value, id: &RecordId) -> bool {
    row.get("id")
        .and_then(|v| serde_json::from_value::<RecordId>(v.clone()).ok())
        .is_some_and(|row_id| row_id.to_string() == id.to_string())
}

fn scope_matches(row: &Value, resource: &Resource) -> bool {
    match (resource.scope_key, resource.scope.as_deref()) {
        (Some(column), Some(scope)) => row.get(column).is_some_and(|v| match v {
            Value::String(s) => s == scope,
            other => other.to_string() == scope,
        }),
        _ => true,
    }
}

#[async_trait]
impl Remote for MemoryRemote {
    async fn select(&self, resource: &Resource) -> Result<Vec<Value>, ApiError> {
        let key = self.enter(Op::Select, resource)?;
        let rows = self.rows(&key);
        Ok(rows.into_iter().filter(|row| scope_matches(row, resource)).collect())
    }

    async fn insert(&self, resource: &Resource, rows: Vec<Value>) -> Result<(), ApiError> {
        let key = self.enter(Op::Insert, resource)?;
        let mut tables = self.tables.lock().unwrap();
        let table = tables.entry(key).or_default();
        for mut row in rows {
            self.assign_id(resource, &mut row);
            table.push(row);
        }
        Ok(())
    }

    async fn update(&self, resource: &Resource, id: &RecordId, patch: Value) -> Result<(), ApiError> {
        let key = self.enter(Op::Update, resource)?;
        let mut tables = self.tables.lock().unwrap();
        let row = tables
            .get_mut(&key)
            .and_then(|rows| rows.iter_mut().find(|row| id_matches(row, id)))
            .ok_or_else(|| ApiError::Status { status: 404, message: Some(format!("{key}/{id} not found")) })?;
        if let (Value::Object(target), Value::Object(fields)) = (row, patch) {
            target.extend(fields);
        }
        Ok(())
    }

    async fn delete(&self, resource: &Resource, id: &RecordId) -> Result<(), ApiError> {
        let key = self.enter(Op::Delete, resource)?;
        let mut tables = self.tables.lock().unwrap();
        if let Some(rows) = tables.get_mut(&key) {
            rows.retain(|row| !id_matches(row, id));
        }
        Ok(())
    }

    async fn fetch(&self, resource: &Resource) -> Result<Value, ApiError> {
        let key = self.enter(Op::Fetch, resource)?;
        self.documents
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .ok_or(ApiError::Status { status: 404, message: None })
    }
}
