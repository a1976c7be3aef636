//! HTTP implementation of `Remote`.
//!
//! SYSTEM CONTEXT
//! ==============
//! REST resources go to `api_url`, Postgrest tables to `data_url`. Every
//! request carries the session bearer token; table requests also carry the
//! project key as `apikey` (and as the bearer when nobody is signed in).
//!
//! ERROR HANDLING
//! ==============
//! A 401 on any request clears the session before the error is returned, so
//! the front end sees the logout signal even if the caller drops the error.

use reqwest::{Method, RequestBuilder};
use serde_json::Value;
use tracing::{debug, warn};

use super::error::{ApiError, classify_status};
use super::remote::{Batch, Dialect, Remote, Resource, unwrap_rows};
use super::session::Session;
use crate::config::AdminConfig;
use crate::entities::RecordId;

const PREFER_MINIMAL: &str = "return=minimal";

pub struct ApiClient {
    http: reqwest::Client,
    api_url: String,
    data_url: String,
    data_key: Option<String>,
    session: Session,
}

impl ApiClient {
    /// Build a client from config, sharing `session` with the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(config: &AdminConfig, session: Session) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeouts.request())
            .connect_timeout(config.timeouts.connect())
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_owned(),
            data_url: config.data_url.trim_end_matches('/').to_owned(),
            data_key: config.data_key.clone(),
            session,
        })
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    fn url(&self, dialect: Dialect, path: &str) -> String {
        let base = match dialect {
            Dialect::Rest => &self.api_url,
            Dialect::Postgrest => &self.data_url,
        };
        join_url(base, path)
    }

    fn request(&self, method: Method, dialect: Dialect, path: &str) -> RequestBuilder {
        let url = self.url(dialect, path);
        debug!(%method, %url, "remote request");
        let mut builder = self.http.request(method, url);
        let mut bearer = self.session.token();
        if dialect == Dialect::Postgrest {
            if let Some(key) = &self.data_key {
                builder = builder.header("apikey", key);
                bearer = bearer.or_else(|| Some(key.clone()));
            }
        }
        if let Some(token) = bearer {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    fn write_request(&self, method: Method, dialect: Dialect, path: &str) -> RequestBuilder {
        let builder = self.request(method, dialect, path);
        match dialect {
            Dialect::Postgrest => builder.header("Prefer", PREFER_MINIMAL),
            Dialect::Rest => builder,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await.map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| ApiError::Transport(e.to_string()))?;
        if let Err(err) = classify_status(status, &body) {
            if err.is_unauthorized() {
                self.session.logout();
            }
            warn!(status, error = %err, "remote request failed");
            return Err(err);
        }
        Ok(body)
    }

    /// Postgrest rows are addressed by an `id=eq.{id}` filter.
    fn row_request(&self, method: Method, resource: &Resource, id: &RecordId) -> Result<RequestBuilder, ApiError> {
        match resource.dialect {
            Dialect::Rest => Ok(self.write_request(method, Dialect::Rest, &resource.record_path(id)?)),
            Dialect::Postgrest => Ok(self
                .write_request(method, Dialect::Postgrest, &resource.collection_path()?)
                .query(&[("id", format!("eq.{id}"))])),
        }
    }
}

#[async_trait::async_trait]
impl Remote for ApiClient {
    async fn select(&self, resource: &Resource) -> Result<Vec<Value>, ApiError> {
        let body = self.fetch(resource).await?;
        unwrap_rows(body, resource.envelope)
    }

    async fn insert(&self, resource: &Resource, rows: Vec<Value>) -> Result<(), ApiError> {
        if rows.is_empty() {
            return Ok(());
        }
        let path = resource.collection_path()?;
        match (resource.dialect, resource.batch) {
            (dialect, Batch::PerItem) => {
                for row in rows {
                    let request = self.write_request(Method::POST, dialect, &path).json(&row);
                    self.send(request).await?;
                }
            }
            (Dialect::Postgrest, Batch::Array | Batch::Keyed(_)) => {
                let request = self.write_request(Method::POST, Dialect::Postgrest, &path).json(&rows);
                self.send(request).await?;
            }
            (Dialect::Rest, Batch::Array) => {
                let request = self.write_request(Method::POST, Dialect::Rest, &bulk_path(&path)).json(&rows);
                self.send(request).await?;
            }
            (Dialect::Rest, Batch::Keyed(key)) => {
                let payload = keyed_payload(key, rows);
                let request = self.write_request(Method::POST, Dialect::Rest, &bulk_path(&path)).json(&payload);
                self.send(request).await?;
            }
        }
        Ok(())
    }

    async fn update(&self, resource: &Resource, id: &RecordId, patch: Value) -> Result<(), ApiError> {
        let request = self.row_request(Method::PATCH, resource, id)?.json(&patch);
        self.send(request).await.map(|_| ())
    }

    async fn delete(&self, resource: &Resource, id: &RecordId) -> Result<(), ApiError> {
        let request = self.row_request(Method::DELETE, resource, id)?;
        self.send(request).await.map(|_| ())
    }

    async fn fetch(&self, resource: &Resource) -> Result<Value, ApiError> {
        let path = resource.collection_path()?;
        let mut request = self.request(Method::GET, resource.dialect, &path);
        if resource.dialect == Dialect::Postgrest {
            request = request.query(&[("select", "*")]);
            if let Some(filter) = resource.scope_filter()? {
                request = request.query(&[filter]);
            }
        }
        let body = self.send(request).await?;
        parse_body(&body)
    }
}

// =============================================================================
// WIRE HELPERS
// =============================================================================

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

fn bulk_path(path: &str) -> String {
    format!("{path}/bulk")
}

fn keyed_payload(key: &str, rows: Vec<Value>) -> Value {
    let mut map = serde_json::Map::new();
    map.insert(key.to_owned(), Value::Array(rows));
    Value::Object(map)
}

fn parse_body(body: &str) -> Result<Value, ApiError> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;
