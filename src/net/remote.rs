//! The `Remote` trait and the `Resource` addressing it is keyed by.
//!
//! DESIGN
//! ======
//! The dashboard talks to two backends: a REST API for the exam domain and
//! a Postgrest table API for the shop and forms. A `Resource` carries
//! everything needed to address a collection on either one (path, dialect,
//! response envelope, bulk strategy, scope), so views stay dialect-agnostic
//! and only `ApiClient` knows the wire conventions.

use async_trait::async_trait;
use serde_json::Value;

use super::error::ApiError;
use crate::entities::RecordId;

/// Placeholder in REST paths replaced by the resource scope.
pub const SCOPE_PLACEHOLDER: &str = "{scope}";

/// Wire convention of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// `GET /path`, `POST /path`, `PATCH /path/{id}`, `DELETE /path/{id}`.
    Rest,
    /// `GET /table?select=*`, `PATCH /table?id=eq.{id}`, ...
    Postgrest,
}

/// Shape of a list response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope {
    /// The body is the array itself.
    Bare,
    /// The array sits under a `data` key.
    Data,
}

/// How a multi-row insert goes over the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Batch {
    /// One request per row.
    PerItem,
    /// One request carrying a JSON array.
    Array,
    /// One request to `{path}/bulk` carrying `{key: [...]}`.
    Keyed(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub path: String,
    pub dialect: Dialect,
    pub envelope: Envelope,
    pub batch: Batch,
    /// Column a Postgrest scope filters on.
    pub scope_key: Option<&'static str>,
    pub scope: Option<String>,
}

impl Resource {
    /// A REST collection; put `{scope}` in the path for nested collections.
    #[must_use]
    pub fn rest(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            dialect: Dialect::Rest,
            envelope: Envelope::Bare,
            batch: Batch::PerItem,
            scope_key: None,
            scope: None,
        }
    }

    /// A Postgrest table.
    #[must_use]
    pub fn table(name: impl Into<String>) -> Self {
        Self {
            path: name.into(),
            dialect: Dialect::Postgrest,
            envelope: Envelope::Bare,
            batch: Batch::Array,
            scope_key: None,
            scope: None,
        }
    }

    #[must_use]
    pub fn with_envelope(mut self, envelope: Envelope) -> Self {
        self.envelope = envelope;
        self
    }

    #[must_use]
    pub fn with_batch(mut self, batch: Batch) -> Self {
        self.batch = batch;
        self
    }

    /// Key a Postgrest table on a parent column.
    #[must_use]
    pub fn keyed_by(mut self, column: &'static str) -> Self {
        self.scope_key = Some(column);
        self
    }

    #[must_use]
    pub fn scoped(mut self, value: impl Into<String>) -> Self {
        self.scope = Some(value.into());
        self
    }

    #[must_use]
    pub fn requires_scope(&self) -> bool {
        self.scope_key.is_some() || self.path.contains(SCOPE_PLACEHOLDER)
    }

    /// True when the resource can be addressed as-is.
    #[must_use]
    pub fn is_addressable(&self) -> bool {
        !self.requires_scope() || self.scope.is_some()
    }

    /// Path of the collection with the scope substituted.
    ///
    /// # Errors
    ///
    /// Returns `InvalidUrl` when the path needs a scope that is not set.
    pub fn collection_path(&self) -> Result<String, ApiError> {
        if !self.path.contains(SCOPE_PLACEHOLDER) {
            return Ok(self.path.clone());
        }
        let scope = self
            .scope
            .as_deref()
            .ok_or_else(|| ApiError::InvalidUrl(format!("{} needs a scope", self.path)))?;
        Ok(self.path.replace(SCOPE_PLACEHOLDER, scope))
    }

    /// Path of a single record (REST only; tables address rows by filter).
    ///
    /// # Errors
    ///
    /// Returns `InvalidUrl` when the path needs a scope that is not set.
    pub fn record_path(&self, id: &RecordId) -> Result<String, ApiError> {
        Ok(format!("{}/{id}", self.collection_path()?))
    }

    /// Postgrest filters selecting the scoped rows.
    ///
    /// # Errors
    ///
    /// Returns `InvalidUrl` when the table is keyed but no scope is set.
    pub fn scope_filter(&self) -> Result<Option<(String, String)>, ApiError> {
        match (self.scope_key, self.scope.as_deref()) {
            (None, _) => Ok(None),
            (Some(column), Some(value)) => Ok(Some((column.to_owned(), format!("eq.{value}")))),
            (Some(column), None) => Err(ApiError::InvalidUrl(format!("{} needs a {column} scope", self.path))),
        }
    }
}

/// Unwrap a list response according to its envelope.
///
/// # Errors
///
/// Returns `Decode` when the body is not the expected array shape.
pub fn unwrap_rows(body: Value, envelope: Envelope) -> Result<Vec<Value>, ApiError> {
    let list = match envelope {
        Envelope::Bare => body,
        Envelope::Data => match body {
            Value::Object(mut map) => map
                .remove("data")
                .ok_or_else(|| ApiError::Decode("missing `data` field".into()))?,
            other => other,
        },
    };
    match list {
        Value::Array(rows) => Ok(rows),
        Value::Null => Ok(Vec::new()),
        other => Err(ApiError::Decode(format!("expected a list, got {}", json_kind(&other)))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// Table-style operations every admin screen is built from.
#[async_trait]
pub trait Remote: Send + Sync {
    /// Fetch every row of a collection.
    async fn select(&self, resource: &Resource) -> Result<Vec<Value>, ApiError>;

    /// Insert rows, batched according to `resource.batch`.
    async fn insert(&self, resource: &Resource, rows: Vec<Value>) -> Result<(), ApiError>;

    /// Apply a partial-field patch to one record.
    async fn update(&self, resource: &Resource, id: &RecordId, patch: Value) -> Result<(), ApiError>;

    /// Physically delete one record.
    async fn delete(&self, resource: &Resource, id: &RecordId) -> Result<(), ApiError>;

    /// Fetch the raw JSON document at a resource path (reports, details).
    async fn fetch(&self, resource: &Resource) -> Result<Value, ApiError>;
}

#[cfg(test)]
#[path = "remote_test.rs"]
mod remote_test;
