use fieldbook_model::{Crop, RecordId, Task};
use fieldbook_store::protocol::{DeletePayload, FetchParams, ProjectionParams, RecordsPayload};
use fieldbook_store::{
    FunctionInvoker, HttpTransport, RecordService, RecordTransport, StoreConfig, StoreError,
    TransportProvider,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> StoreConfig {
    StoreConfig {
        base_url: format!("{}/", server.uri()),
        project_id: "proj-1".to_string(),
        public_key: "key-1".to_string(),
        ..Default::default()
    }
}

fn transport_for(server: &MockServer) -> HttpTransport {
    HttpTransport::new(config_for(server)).unwrap()
}

// ── Construction ────────────────────────────────────────────────

#[test]
fn new_rejects_missing_credentials() {
    let err = HttpTransport::new(StoreConfig::default()).err().unwrap();
    assert!(matches!(err, StoreError::Config(_)));
}

#[tokio::test]
async fn provider_reports_unavailable_transport() {
    let provider = TransportProvider::from_config(StoreConfig::default());
    let err = provider.get().await.err().unwrap();
    assert!(matches!(err, StoreError::TransportUnavailable(_)));
    assert!(!provider.is_initialized());
}

#[tokio::test]
async fn provider_builds_once() {
    let server = MockServer::start().await;
    let provider = TransportProvider::from_config(config_for(&server));

    let first = provider.get().await.unwrap();
    let second = provider.get().await.unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.name(), "http");
}

#[tokio::test]
async fn services_without_credentials_read_as_empty() {
    let crops: RecordService<Crop> = RecordService::from_config(StoreConfig::default());
    assert!(crops.get_all().await.is_empty());
    assert!(crops.get_by_id(RecordId::new(1)).await.unwrap_err().is_transport());
}

// ── Table operations ────────────────────────────────────────────

#[tokio::test]
async fn fetch_posts_query_with_auth_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tables/crop_c/records/query"))
        .and(header("X-Project-Id", "proj-1"))
        .and(header("Authorization", "Bearer key-1"))
        .and(body_partial_json(json!({"fields": [{"field": {"Name": "Id"}}]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{"Id": 1, "name_c": "Corn"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let transport = transport_for(&server);
    let params = FetchParams {
        fields: vec![fieldbook_store::protocol::FieldRef::new("Id")],
        ..Default::default()
    };
    let response = transport.fetch_records("crop_c", &params).await.unwrap();

    assert!(response.success);
    assert_eq!(response.data.unwrap()[0]["name_c"], json!("Corn"));
}

#[tokio::test]
async fn get_posts_projection_to_record_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tables/task_c/records/42/get"))
        .and(body_json(json!({"fields": [{"field": {"Name": "title_c"}}]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"Id": 42, "title_c": "Fence"}
        })))
        .mount(&server)
        .await;

    let transport = transport_for(&server);
    let params = ProjectionParams {
        fields: vec![fieldbook_store::protocol::FieldRef::new("title_c")],
    };
    let response = transport
        .get_record_by_id("task_c", RecordId::new(42), &params)
        .await
        .unwrap();
    assert_eq!(response.data.unwrap()["title_c"], json!("Fence"));
}

#[tokio::test]
async fn writes_use_post_put_and_delete() {
    let server = MockServer::start().await;
    let ok = ResponseTemplate::new(200).set_body_json(json!({
        "success": true,
        "results": [{"success": true, "data": {"Id": 9}}]
    }));
    for verb in ["POST", "PUT"] {
        Mock::given(method(verb))
            .and(path("/tables/crop_c/records"))
            .and(body_partial_json(json!({"records": [{"name_c": "Kale"}]})))
            .respond_with(ok.clone())
            .expect(1)
            .mount(&server)
            .await;
    }
    Mock::given(method("DELETE"))
        .and(path("/tables/crop_c/records"))
        .and(body_json(json!({"RecordIds": [9]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "results": [{"success": true}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let transport = transport_for(&server);
    let mut record = serde_json::Map::new();
    record.insert("name_c".into(), json!("Kale"));
    let payload = RecordsPayload {
        records: vec![record],
    };

    let created = transport.create_records("crop_c", &payload).await.unwrap();
    assert!(created.results.unwrap()[0].success);
    let updated = transport.update_records("crop_c", &payload).await.unwrap();
    assert!(updated.success);
    let deleted = transport
        .delete_records(
            "crop_c",
            &DeletePayload {
                record_ids: vec![RecordId::new(9)],
            },
        )
        .await
        .unwrap();
    assert!(deleted.results.unwrap()[0].data.is_none());
}

#[tokio::test]
async fn non_success_status_is_backend_rejected_with_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tables/crop_c/records/query"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid public key"))
        .mount(&server)
        .await;

    let err = transport_for(&server)
        .fetch_records("crop_c", &FetchParams::default())
        .await
        .unwrap_err();
    match err {
        StoreError::BackendRejected { message } => assert_eq!(message, "invalid public key"),
        other => panic!("expected BackendRejected, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_error_body_reports_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = transport_for(&server)
        .fetch_records("crop_c", &FetchParams::default())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("503"), "{err}");
}

#[tokio::test]
async fn unreachable_store_is_a_transport_error() {
    let config = StoreConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        project_id: "p".to_string(),
        public_key: "k".to_string(),
        timeout_secs: 2,
        ..Default::default()
    };
    let err = HttpTransport::new(config)
        .unwrap()
        .fetch_records("crop_c", &FetchParams::default())
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Http(_)));
    assert!(err.is_transport());
}

#[tokio::test]
async fn malformed_reply_is_serialization_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = transport_for(&server)
        .fetch_records("crop_c", &FetchParams::default())
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Serialization(_)));
}

// ── End to end ──────────────────────────────────────────────────

#[tokio::test]
async fn service_round_trip_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tables/task_c/records"))
        .and(body_partial_json(json!({"records": [{"Name": "New Task", "title_c": ""}]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "results": [{
                "success": true,
                "data": {"Id": 31, "Name": "New Task", "title_c": "", "crop_id_c": {"Id": 4, "Name": "Corn"}}
            }]
        })))
        .mount(&server)
        .await;

    let tasks: RecordService<Task> = RecordService::from_config(config_for(&server));
    let created = tasks.create(&Task::default()).await.unwrap();

    assert_eq!(created.id, Some(RecordId::new(31)));
    assert_eq!(created.title, "");
    assert_eq!(created.crop_id, Some(RecordId::new(4)));
    assert!(tasks.provider().is_initialized());
}

// ── Functions ───────────────────────────────────────────────────

#[tokio::test]
async fn invoke_posts_body_to_function() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/functions/farm-assistant/invoke"))
        .and(body_partial_json(json!({"message": "hi"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"message": "hello"}
        })))
        .mount(&server)
        .await;

    let response = transport_for(&server)
        .invoke("farm-assistant", &json!({"message": "hi", "conversationHistory": []}))
        .await
        .unwrap();
    assert!(response.success);
    assert_eq!(response.data.unwrap()["message"], json!("hello"));
}
