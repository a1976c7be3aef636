use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, Method as HttpMethod, StatusCode, Uri};
use serde_json::json;

use super::*;
use crate::net::remote::Envelope;

// =============================================================================
// Stub server
// =============================================================================

#[derive(Debug, Clone)]
struct Seen {
    method: String,
    uri: String,
    authorization: Option<String>,
    apikey: Option<String>,
    prefer: Option<String>,
    body: String,
}

#[derive(Clone, Default)]
struct Stub {
    seen: Arc<Mutex<Vec<Seen>>>,
    responses: Arc<Mutex<HashMap<String, (u16, String)>>>,
}

impl Stub {
    fn respond(&self, method: &str, path: &str, status: u16, body: &str) {
        self.responses
            .lock()
            .unwrap()
            .insert(format!("{method} {path}"), (status, body.to_owned()));
    }

    fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_owned)
}

async fn capture(
    State(stub): State<Stub>,
    method: HttpMethod,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    stub.seen.lock().unwrap().push(Seen {
        method: method.to_string(),
        uri: uri.to_string(),
        authorization: header(&headers, "authorization"),
        apikey: header(&headers, "apikey"),
        prefer: header(&headers, "prefer"),
        body,
    });
    let key = format!("{method} {}", uri.path());
    let (status, body) = stub
        .responses
        .lock()
        .unwrap()
        .get(&key)
        .cloned()
        .unwrap_or((200, "[]".to_owned()));
    (StatusCode::from_u16(status).unwrap(), body)
}

async fn spawn_stub(stub: Stub) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().fallback(capture).with_state(stub);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn client_for(base: &str, token: Option<&str>) -> ApiClient {
    let config = AdminConfig {
        api_url: base.to_owned(),
        data_url: format!("{base}/rest/v1"),
        data_key: Some("anon-key".into()),
        token: token.map(str::to_owned),
        ..AdminConfig::default()
    };
    ApiClient::new(&config, Session::new(config.token.clone())).unwrap()
}

// =============================================================================
// Pure helpers
// =============================================================================

#[test]
fn join_url_normalizes_slashes() {
    assert_eq!(join_url("http://x/", "/students"), "http://x/students");
    assert_eq!(join_url("http://x", "students"), "http://x/students");
}

#[test]
fn keyed_payload_wraps_rows() {
    assert_eq!(keyed_payload("students", vec![json!({"name": "Ali"})]), json!({"students": [{"name": "Ali"}]}));
}

#[test]
fn parse_body_empty_is_null() {
    assert_eq!(parse_body("  ").unwrap(), Value::Null);
    assert!(matches!(parse_body("{oops"), Err(ApiError::Decode(_))));
}

// =============================================================================
// REST dialect
// =============================================================================

#[tokio::test]
async fn rest_select_sends_bearer_and_unwraps_data_envelope() {
    let stub = Stub::default();
    stub.respond("GET", "/students", 200, r#"{"data":[{"id":"s1","name":"Ali","nationalId":1,"nominalId":2}]}"#);
    let base = spawn_stub(stub.clone()).await;
    let client = client_for(&base, Some("tok"));

    let rows = client
        .select(&Resource::rest("students").with_envelope(Envelope::Data))
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    let seen = stub.seen();
    assert_eq!(seen[0].method, "GET");
    assert_eq!(seen[0].uri, "/students");
    assert_eq!(seen[0].authorization.as_deref(), Some("Bearer tok"));
    assert_eq!(seen[0].apikey, None);
}

#[tokio::test]
async fn rest_keyed_batch_posts_envelope_to_bulk_path() {
    let stub = Stub::default();
    let base = spawn_stub(stub.clone()).await;
    let client = client_for(&base, Some("tok"));
    let resource = Resource::rest("students").with_batch(Batch::Keyed("students"));

    client
        .insert(&resource, vec![json!({"name": "Ali"}), json!({"name": "Sara"})])
        .await
        .unwrap();

    let seen = stub.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].method, "POST");
    assert_eq!(seen[0].uri, "/students/bulk");
    let body: Value = serde_json::from_str(&seen[0].body).unwrap();
    assert_eq!(body, json!({"students": [{"name": "Ali"}, {"name": "Sara"}]}));
}

#[tokio::test]
async fn rest_array_batch_posts_list_to_scoped_bulk_path() {
    let stub = Stub::default();
    let base = spawn_stub(stub.clone()).await;
    let client = client_for(&base, Some("tok"));
    let resource = Resource::rest("exams/{scope}/sections").with_batch(Batch::Array).scoped("ex1");

    client.insert(&resource, vec![json!({"type": "dice_folding_test"})]).await.unwrap();

    let seen = stub.seen();
    assert_eq!(seen[0].uri, "/exams/ex1/sections/bulk");
    let body: Value = serde_json::from_str(&seen[0].body).unwrap();
    assert_eq!(body, json!([{"type": "dice_folding_test"}]));
}

#[tokio::test]
async fn rest_per_item_batch_posts_each_row() {
    let stub = Stub::default();
    let base = spawn_stub(stub.clone()).await;
    let client = client_for(&base, Some("tok"));

    client
        .insert(&Resource::rest("exams"), vec![json!({"title": "A"}), json!({"title": "B"})])
        .await
        .unwrap();

    let seen = stub.seen();
    assert_eq!(seen.len(), 2);
    assert!(seen.iter().all(|s| s.method == "POST" && s.uri == "/exams"));
    assert_eq!(seen[0].prefer, None);
}

#[tokio::test]
async fn empty_insert_makes_no_request() {
    let stub = Stub::default();
    let base = spawn_stub(stub.clone()).await;
    let client = client_for(&base, Some("tok"));

    client.insert(&Resource::rest("exams"), Vec::new()).await.unwrap();
    assert!(stub.seen().is_empty());
}

#[tokio::test]
async fn rest_update_and_delete_address_record_path() {
    let stub = Stub::default();
    stub.respond("PATCH", "/students/s1", 200, "");
    stub.respond("DELETE", "/exams/e9", 200, "");
    let base = spawn_stub(stub.clone()).await;
    let client = client_for(&base, Some("tok"));

    client
        .update(&Resource::rest("students"), &RecordId::from("s1"), json!({"name": "Sara"}))
        .await
        .unwrap();
    client.delete(&Resource::rest("exams"), &RecordId::from("e9")).await.unwrap();

    let seen = stub.seen();
    assert_eq!((seen[0].method.as_str(), seen[0].uri.as_str()), ("PATCH", "/students/s1"));
    assert_eq!(seen[0].body, r#"{"name":"Sara"}"#);
    assert_eq!((seen[1].method.as_str(), seen[1].uri.as_str()), ("DELETE", "/exams/e9"));
}

// =============================================================================
// Postgrest dialect
// =============================================================================

#[tokio::test]
async fn table_select_sends_select_star_scope_filter_and_apikey() {
    let stub = Stub::default();
    stub.respond("GET", "/rest/v1/product_variants", 200, r#"[{"id":1,"size":"40","stockQuantity":3,"productId":12}]"#);
    let base = spawn_stub(stub.clone()).await;
    let client = client_for(&base, Some("tok"));
    let resource = Resource::table("product_variants").keyed_by("productId").scoped("12");

    let rows = client.select(&resource).await.unwrap();

    assert_eq!(rows.len(), 1);
    let seen = stub.seen();
    assert_eq!(seen[0].uri, "/rest/v1/product_variants?select=*&productId=eq.12");
    assert_eq!(seen[0].apikey.as_deref(), Some("anon-key"));
    assert_eq!(seen[0].authorization.as_deref(), Some("Bearer tok"));
}

#[tokio::test]
async fn table_requests_fall_back_to_project_key_as_bearer() {
    let stub = Stub::default();
    let base = spawn_stub(stub.clone()).await;
    let client = client_for(&base, None);

    client.select(&Resource::table("faqs_en")).await.unwrap();

    assert_eq!(stub.seen()[0].authorization.as_deref(), Some("Bearer anon-key"));
}

#[tokio::test]
async fn table_insert_posts_one_array_with_minimal_return() {
    let stub = Stub::default();
    stub.respond("POST", "/rest/v1/coupons", 201, "");
    let base = spawn_stub(stub.clone()).await;
    let client = client_for(&base, Some("tok"));

    client
        .insert(&Resource::table("coupons"), vec![json!({"code": "A-1"}), json!({"code": "A-2"})])
        .await
        .unwrap();

    let seen = stub.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].prefer.as_deref(), Some("return=minimal"));
    let body: Value = serde_json::from_str(&seen[0].body).unwrap();
    assert_eq!(body.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn table_update_filters_by_id() {
    let stub = Stub::default();
    stub.respond("PATCH", "/rest/v1/orders", 204, "");
    let base = spawn_stub(stub.clone()).await;
    let client = client_for(&base, Some("tok"));

    client
        .update(&Resource::table("orders"), &RecordId::Int(5), json!({"status": "SHIPPING"}))
        .await
        .unwrap();

    let seen = stub.seen();
    assert_eq!(seen[0].method, "PATCH");
    assert_eq!(seen[0].uri, "/rest/v1/orders?id=eq.5");
}

// =============================================================================
// Errors
// =============================================================================

#[tokio::test]
async fn unauthorized_clears_session() {
    let stub = Stub::default();
    stub.respond("GET", "/exams", 401, r#"{"message":"Unauthorized"}"#);
    let base = spawn_stub(stub.clone()).await;
    let client = client_for(&base, Some("expired"));

    let err = client.select(&Resource::rest("exams")).await.unwrap_err();

    assert_eq!(err, ApiError::Unauthorized);
    assert_eq!(client.session().token(), None);
    assert_eq!(client.session().redirect_to(), Some(crate::net::session::LOGIN_PATH));
}

#[tokio::test]
async fn error_status_carries_body_message() {
    let stub = Stub::default();
    stub.respond("POST", "/exams", 400, r#"{"message":["title should not be empty"],"statusCode":400}"#);
    let base = spawn_stub(stub.clone()).await;
    let client = client_for(&base, Some("tok"));

    let err = client.insert(&Resource::rest("exams"), vec![json!({})]).await.unwrap_err();

    assert_eq!(err.remote_message(), Some("title should not be empty"));
    assert_eq!(client.session().token().as_deref(), Some("tok"));
}

#[tokio::test]
async fn unscoped_resource_fails_without_request() {
    let stub = Stub::default();
    let base = spawn_stub(stub.clone()).await;
    let client = client_for(&base, Some("tok"));

    let err = client.select(&Resource::rest("exam-results/{scope}")).await.unwrap_err();

    assert!(matches!(err, ApiError::InvalidUrl(_)));
    assert!(stub.seen().is_empty());
}

#[tokio::test]
async fn connection_refused_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let client = client_for(&format!("http://{addr}"), Some("tok"));

    let err = client.select(&Resource::rest("exams")).await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}
