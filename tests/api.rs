use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, request::Parts, Method, Request, StatusCode},
    Router,
};
use labeling_api::model::{FieldValue, Row, TableInfo};
use labeling_api::{
    app, default_registry, Action, AppError, AppState, Hooks, MemoryStore, RequestContext, StatusPolicy, Store,
    StoreError,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

/// Memory store that counts every call, to prove a request never reached storage.
#[derive(Default)]
struct CountingStore {
    inner: MemoryStore,
    calls: AtomicUsize,
}

impl CountingStore {
    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Store for CountingStore {
    async fn count(&self, table: &TableInfo) -> Result<i64, StoreError> {
        self.hit();
        self.inner.count(table).await
    }
    async fn select_page(
        &self,
        table: &TableInfo,
        limit: i64,
        offset: Option<i64>,
        order: Option<&str>,
    ) -> Result<Vec<Row>, StoreError> {
        self.hit();
        self.inner.select_page(table, limit, offset, order).await
    }
    async fn select_one(&self, table: &TableInfo, key: &FieldValue) -> Result<Option<Row>, StoreError> {
        self.hit();
        self.inner.select_one(table, key).await
    }
    async fn insert(&self, table: &TableInfo, row: &Row) -> Result<u64, StoreError> {
        self.hit();
        self.inner.insert(table, row).await
    }
    async fn update(&self, table: &TableInfo, row: &Row) -> Result<u64, StoreError> {
        self.hit();
        self.inner.update(table, row).await
    }
    async fn delete(&self, table: &TableInfo, key: &FieldValue) -> Result<u64, StoreError> {
        self.hit();
        self.inner.delete(table, key).await
    }
    async fn ping(&self) -> Result<(), StoreError> {
        self.inner.ping().await
    }
}

fn router_with(state: AppState) -> Router {
    app(state, 64 * 1024)
}

fn router() -> Router {
    router_with(AppState::new(Arc::new(MemoryStore::new()), default_registry()))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, _, body) = send_raw(app, method, uri, body.map(|b| b.to_string()), &[]).await;
    let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, value)
}

async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<String>,
    headers: &[(&str, &str)],
) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let mut req = Request::builder().method(method).uri(uri);
    for (k, v) in headers {
        req = req.header(*k, *v);
    }
    let req = match body {
        Some(b) => req.header(header::CONTENT_TYPE, "application/json").body(Body::from(b)),
        None => req.body(Body::empty()),
    }
    .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, headers, bytes.to_vec())
}

fn ann() -> Value {
    json!({"id":86,"email":"a@b.com","name":"Ann","password":"p","surname":"S","username":"ann"})
}

#[tokio::test]
async fn create_echoes_and_get_returns_same_user() {
    let app = router();
    let (status, created) = send(&app, Method::POST, "/tuser", Some(ann())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created, ann());

    let (status, fetched) = send(&app, Method::GET, "/tuser/86", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, ann());
}

#[tokio::test]
async fn list_pages_and_counts_whole_table() {
    let app = router();
    for id in 1..=5 {
        let image = json!({"id": id, "name": format!("img{}.png", id), "image_set_id": 1});
        let (status, _) = send(&app, Method::POST, "/timage", Some(image)).await;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, body) = send(&app, Method::GET, "/timage?page=0&pagesize=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["total_records"], 5);
    assert_eq!(body["page"], 0);
    assert_eq!(body["page_size"], 2);

    let (_, body) = send(&app, Method::GET, "/timage?page=3&pagesize=2", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["id"], 5);

    let (_, body) = send(&app, Method::GET, "/timage?pagesize=2&order=id%20desc", None).await;
    assert_eq!(body["data"][0]["id"], 5);
    assert_eq!(body["data"][1]["id"], 4);
}

#[tokio::test]
async fn empty_table_lists_as_empty_page() {
    let app = router();
    let (status, body) = send(&app, Method::GET, "/labeltype", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"page": 0, "page_size": 20, "data": [], "total_records": 0}));
}

#[tokio::test]
async fn delete_of_missing_row_is_flattened_not_found() {
    let app = router();
    let (status, body) = send(&app, Method::DELETE, "/tlabel/999", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"code": 400, "message": "record not found"}));
}

#[tokio::test]
async fn delete_returns_bare_row_count() {
    let app = router();
    send(&app, Method::POST, "/tlabel", Some(json!({"id": 7, "image_id": 1, "user_id": 2}))).await;
    let (status, body) = send(&app, Method::DELETE, "/tlabel/7", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(1));
    let (status, _) = send(&app, Method::GET, "/tlabel/7", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_merges_sent_fields_only() {
    let app = router();
    send(&app, Method::POST, "/tuser", Some(ann())).await;
    let (status, body) = send(&app, Method::PUT, "/tuser/86", Some(json!({"surname": "Smith"}))).await;
    assert_eq!(status, StatusCode::OK);
    let mut expected = ann();
    expected["surname"] = json!("Smith");
    assert_eq!(body, expected);

    let (_, body) = send(&app, Method::PUT, "/tuser/86", Some(json!({}))).await;
    assert_eq!(body, expected);

    let (status, body) = send(&app, Method::PUT, "/tuser/1", Some(json!({"name": "X"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "record not found");
}

#[tokio::test]
async fn bad_params_are_rejected_before_storage() {
    let store = Arc::new(CountingStore::default());
    let app = router_with(AppState::new(store.clone(), default_registry()));
    for uri in ["/tuser?page=-1", "/tuser?pagesize=0", "/tuser?page=abc"] {
        let (status, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["message"], "bad params", "{}", uri);
    }
    let (status, body) = send(&app, Method::GET, "/tuser/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "invalid int64 key: abc");

    let (_, _, raw) = send_raw(&app, Method::POST, "/tuser", Some("{not json".into()), &[]).await;
    let body: Value = serde_json::from_slice(&raw).unwrap();
    assert_eq!(body["message"], "bad params");

    let (_, body) = send(&app, Method::POST, "/tuser", Some(json!({"id": 1}))).await;
    assert_eq!(body["message"], "bad params");

    assert_eq!(store.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn duplicate_create_is_insert_failed() {
    let app = router();
    send(&app, Method::POST, "/tuser", Some(ann())).await;
    let (status, body) = send(&app, Method::POST, "/tuser", Some(ann())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "insert failed");
}

#[tokio::test]
async fn broken_order_clause_is_not_found() {
    let app = router();
    let (status, body) = send(&app, Method::GET, "/tuser?order=id;drop", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "record not found");
}

#[tokio::test]
async fn responses_carry_json_and_no_cache_headers() {
    let app = router();
    let (_, headers, _) = send_raw(&app, Method::GET, "/tuser", None, &[]).await;
    assert_eq!(headers[header::CONTENT_TYPE], "application/json; charset=utf-8");
    assert_eq!(headers[header::CACHE_CONTROL], "no-cache");

    let (_, headers, _) = send_raw(&app, Method::GET, "/tuser/1", None, &[]).await;
    assert_eq!(headers[header::CONTENT_TYPE], "application/json; charset=utf-8");
    assert_eq!(headers[header::CACHE_CONTROL], "no-cache");
}

#[tokio::test]
async fn hook_rejection_short_circuits_without_storage_calls() {
    let store = Arc::new(CountingStore::default());
    let hooks = Hooks::new().with_request_validator(|_: &RequestContext, table: &str, action: Action| {
        if action == Action::Delete {
            Err(AppError::Rejected(format!("no deletes on {}", table)))
        } else {
            Ok(())
        }
    });
    let app = router_with(AppState::new(store.clone(), default_registry()).with_hooks(hooks));
    let (status, body) = send(&app, Method::DELETE, "/tuser/86", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "request rejected: no deletes on t_user");
    assert_eq!(store.calls.load(Ordering::SeqCst), 0);

    let (status, _) = send(&app, Method::GET, "/tuser", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(store.calls.load(Ordering::SeqCst) > 0);
}

#[tokio::test]
async fn hook_runs_before_body_decode() {
    let hooks = Hooks::new().with_request_validator(
        |_: &RequestContext, _: &str, _: Action| -> Result<(), AppError> { Err(AppError::Rejected("closed".into())) },
    );
    let app = router_with(AppState::new(Arc::new(MemoryStore::new()), default_registry()).with_hooks(hooks));
    let (_, _, raw) = send_raw(&app, Method::POST, "/tuser", Some("garbage".into()), &[]).await;
    let body: Value = serde_json::from_slice(&raw).unwrap();
    assert_eq!(body["message"], "request rejected: closed");
}

#[tokio::test]
async fn custom_context_reaches_the_validator() {
    let hooks = Hooks::new()
        .with_context_initializer(|parts: &Parts| {
            let ctx = RequestContext::from_parts(parts);
            let role = if ctx.user.as_deref() == Some("admin") { "admin" } else { "guest" };
            ctx.with_value("role", role)
        })
        .with_request_validator(|ctx: &RequestContext, _: &str, action: Action| {
            if action.is_mutation() && ctx.value("role") != Some("admin") {
                Err(AppError::Rejected("admin only".into()))
            } else {
                Ok(())
            }
        });
    let app = router_with(
        AppState::new(Arc::new(MemoryStore::new()), default_registry())
            .with_hooks(hooks)
            .with_status_policy(StatusPolicy::Semantic),
    );
    let body = Some(ann().to_string());
    let (status, _, _) = send_raw(&app, Method::POST, "/tuser", body.clone(), &[("X-Api-User", "guest1")]).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _, _) = send_raw(&app, Method::POST, "/tuser", body, &[("X-Api-User", "admin")]).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn ddl_lists_every_table_and_looks_up_by_name() {
    let app = router();
    let (status, body) = send(&app, Method::GET, "/ddl", None).await;
    assert_eq!(status, StatusCode::OK);
    let tables = body.as_object().unwrap();
    assert_eq!(tables.len(), 7);
    assert_eq!(tables["t_image"]["retrieve_many_url"], "/timage");

    let (status, body) = send(&app, Method::GET, "/ddl/t_user", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "t_user");
    assert_eq!(body["table_info"]["columns"][1]["database_type_pretty"], "VARCHAR(255)");
    assert_eq!(body["table_info"]["columns"][1]["column_type"], "VARCHAR");
    assert_eq!(body["table_info"]["columns"][1]["json_field_name"], "email");
    assert_eq!(body["table_info"]["columns"][0]["is_auto_increment"], false);

    let (status, body) = send(&app, Method::GET, "/ddl/x", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "unable to find table: x");
}

#[tokio::test]
async fn ddl_is_guarded_by_the_validator() {
    let hooks = Hooks::new().with_request_validator(|_: &RequestContext, table: &str, action: Action| {
        if table == "ddl" && action == Action::FetchSchema {
            Err(AppError::Rejected("schema hidden".into()))
        } else {
            Ok(())
        }
    });
    let app = router_with(AppState::new(Arc::new(MemoryStore::new()), default_registry()).with_hooks(hooks));
    let (status, body) = send(&app, Method::GET, "/ddl", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "request rejected: schema hidden");
}

#[tokio::test]
async fn semantic_policy_maps_kinds_to_statuses() {
    let app = router_with(
        AppState::new(Arc::new(MemoryStore::new()), default_registry()).with_status_policy(StatusPolicy::Semantic),
    );
    let (status, body) = send(&app, Method::GET, "/tuser/5", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"code": 404, "message": "record not found"}));

    let (status, _) = send(&app, Method::GET, "/ddl/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    send(&app, Method::POST, "/tuser", Some(ann())).await;
    let (status, _) = send(&app, Method::POST, "/tuser", Some(ann())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, _) = send(&app, Method::GET, "/tuser?page=-2", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn project_user_is_keyed_by_project() {
    let app = router();
    let (status, _) = send(&app, Method::POST, "/tprojectuser", Some(json!({"project_id": 3, "user_id": 9}))).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = send(&app, Method::GET, "/tprojectuser/3", None).await;
    assert_eq!(body, json!({"project_id": 3, "user_id": 9}));
}

#[tokio::test]
async fn operational_endpoints() {
    let app = router();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));

    let (status, body) = send(&app, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "ok");

    let (_, body) = send(&app, Method::GET, "/version", None).await;
    assert_eq!(body["name"], "labeling-api");
}

#[tokio::test]
async fn oversized_body_is_refused() {
    let app = app(AppState::new(Arc::new(MemoryStore::new()), default_registry()), 16);
    let (status, _, _) = send_raw(&app, Method::POST, "/tuser", Some(ann().to_string()), &[]).await;
    assert_ne!(status, StatusCode::OK);
}

#[tokio::test]
async fn created_date_accepts_rfc3339_and_returns_utc() {
    let app = router();
    let set = json!({"id": 1, "created_date": "2024-01-02T03:04:05Z", "user_id": 3});
    let (status, body) = send(&app, Method::POST, "/timageset", Some(set)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["created_date"], "2024-01-02T03:04:05Z");

    let (_, body) = send(&app, Method::GET, "/timageset/1", None).await;
    assert_eq!(body["created_date"], "2024-01-02T03:04:05Z");

    let label = json!({"id": 2, "created_date": "2040-04-09T11:40:32+03:00", "image_id": 1, "user_id": 2});
    let (status, body) = send(&app, Method::POST, "/tlabel", Some(label)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["created_date"], "2040-04-09T08:40:32Z");

    let (status, body) = send(&app, Method::PUT, "/tproject/9", Some(json!({"created_date": "not a date"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "bad params");
}
