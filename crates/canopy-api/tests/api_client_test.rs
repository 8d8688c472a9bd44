#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use canopy_api::{ApiClient, Collection, Error, Filter, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let base = format!("{}/api", server.uri());
    let client = ApiClient::with_client(&base, reqwest::Client::new()).unwrap();
    (server, client)
}

fn animal(id: u64, zone: &str) -> Value {
    json!({
        "animalId": id,
        "name": "Bengal Tiger",
        "scientificName": "Panthera tigris tigris",
        "location": "North ridge",
        "zone": zone,
        "count": 4,
        "speciesType": "Mammal",
        "conservationStatus": "Endangered"
    })
}

// ── Listing ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_collection() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/animals"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([animal(1, "Zone A"), animal(2, "Zone B")])),
        )
        .mount(&server)
        .await;

    let rows: Vec<Value> = client.list(Collection::Animals).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1]["animalId"], 2);
}

#[tokio::test]
async fn test_zone_filter_is_percent_encoded() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/animals/zone/Zone%20A"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([animal(1, "Zone A")])))
        .mount(&server)
        .await;

    let rows: Vec<Value> = client
        .list_filtered(Collection::Animals, &Filter::Zone("Zone A".into()))
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["zone"], "Zone A");
}

#[tokio::test]
async fn test_flag_filters() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/plants/medicinal"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/officers/active"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let plants: Vec<Value> = client
        .list_filtered(Collection::Plants, &Filter::Medicinal)
        .await
        .unwrap();
    let officers: Vec<Value> = client
        .list_filtered(Collection::Officers, &Filter::Active)
        .await
        .unwrap();
    assert!(plants.is_empty());
    assert!(officers.is_empty());
}

#[tokio::test]
async fn test_date_range_query() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/visitors/date-range"))
        .and(query_param("startDate", "2025-01-01"))
        .and(query_param("endDate", "2025-01-31"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "visitorId": 9 }])))
        .mount(&server)
        .await;

    let rows: Vec<Value> = client
        .list_filtered(
            Collection::Visitors,
            &Filter::DateRange {
                start: "2025-01-01".into(),
                end: "2025-01-31".into(),
            },
        )
        .await
        .unwrap();
    assert_eq!(rows[0]["visitorId"], 9);
}

// ── Mutations ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_returns_server_record() {
    let (server, client) = setup().await;

    let draft = json!({ "commonName": "Oak", "heightMeters": 12.5, "healthStatus": "Healthy", "zone": "Zone A" });
    let mut created = draft.clone();
    created["treeId"] = json!(17);

    Mock::given(method("POST"))
        .and(path("/api/trees"))
        .and(body_json(&draft))
        .respond_with(ResponseTemplate::new(201).set_body_json(&created))
        .mount(&server)
        .await;

    let record: Value = client.create(Collection::Trees, &draft).await.unwrap();
    assert_eq!(record["treeId"], 17);
    assert_eq!(record["commonName"], "Oak");
}

#[tokio::test]
async fn test_update_puts_full_record() {
    let (server, client) = setup().await;

    let body = animal(3, "Zone C");
    Mock::given(method("PUT"))
        .and(path("/api/animals/3"))
        .and(body_json(&body))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let record: Value = client.update(Collection::Animals, 3, &body).await.unwrap();
    assert_eq!(record["zone"], "Zone C");
}

#[tokio::test]
async fn test_delete_accepts_empty_body() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/resources/5"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    client.remove(Collection::Resources, 5).await.unwrap();
}

// ── Error mapping ───────────────────────────────────────────────────

#[tokio::test]
async fn test_missing_record_is_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/trees/99"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result: Result<Value, Error> = client.fetch(Collection::Trees, 99).await;
    let err = result.unwrap_err();
    assert!(err.is_not_found(), "expected NotFound, got: {err:?}");
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_bad_payload_is_validation_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/plants"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "message": "commonName is required" })),
        )
        .mount(&server)
        .await;

    let result: Result<Value, Error> = client.create(Collection::Plants, &json!({})).await;
    match result {
        Err(Error::Validation { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "commonName is required");
        }
        other => panic!("expected Validation error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_carries_status_text() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/visitors"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client.list::<Value>(Collection::Visitors).await.unwrap_err();
    assert_eq!(err.to_string(), "API Error: 500 Internal Server Error");
    assert!(!err.is_network());
}

#[tokio::test]
async fn test_garbage_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/animals"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = client.list::<Value>(Collection::Animals).await;
    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "expected Deserialization error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_garbage_body_preview_respects_char_boundaries() {
    let (server, client) = setup().await;

    // 'é' straddles byte 200 of the body.
    let body = format!("{}é and more", "a".repeat(199));
    Mock::given(method("GET"))
        .and(path("/api/animals"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body.clone()))
        .mount(&server)
        .await;

    match client.list::<Value>(Collection::Animals).await {
        Err(Error::Deserialization { message, body: raw }) => {
            assert_eq!(raw, body);
            assert!(message.contains(&format!("{}é", "a".repeat(199))));
            assert!(!message.contains("and more"));
        }
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_unauthorized_record_call_is_server_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/trees"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "token expired" })))
        .mount(&server)
        .await;

    match client.list::<Value>(Collection::Trees).await {
        Err(Error::Server {
            status,
            status_text,
            message,
        }) => {
            assert_eq!(status, 401);
            assert_eq!(status_text, "Unauthorized");
            assert_eq!(message.as_deref(), Some("token expired"));
        }
        other => panic!("expected Server error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let client = ApiClient::with_client("http://127.0.0.1:9/api", reqwest::Client::new()).unwrap();
    let err = client.list::<Value>(Collection::Trees).await.unwrap_err();
    assert!(err.is_network(), "expected network error, got: {err:?}");
}

// ── Auth ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_success() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "username": "ranger", "password": "hunter22" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": { "id": 1, "username": "ranger", "role": "ADMIN" },
            "message": "Login successful",
            "token": "tok-123"
        })))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "hunter22".to_string().into();
    let resp = client.login("ranger", &secret).await.unwrap();
    assert_eq!(resp.user.username, "ranger");
    assert_eq!(resp.token.as_deref(), Some("tok-123"));
}

#[tokio::test]
async fn test_login_failure_uses_server_message() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid credentials" })),
        )
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "wrong".to_string().into();
    match client.login("ranger", &secret).await {
        Err(Error::Authentication { message }) => assert_eq!(message, "Invalid credentials"),
        other => panic!("expected Authentication error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_signup_sends_admin_role() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/signup"))
        .and(body_json(json!({
            "username": "warden",
            "email": "warden@forest.example",
            "password": "longenough",
            "role": "ADMIN"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": { "username": "warden", "email": "warden@forest.example" }
        })))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "longenough".to_string().into();
    let resp = client
        .signup("warden", "warden@forest.example", &secret)
        .await
        .unwrap();
    assert_eq!(resp.user.email.as_deref(), Some("warden@forest.example"));
    assert!(resp.token.is_none());
}

#[tokio::test]
async fn test_bearer_token_is_attached() {
    let server = MockServer::start().await;
    let transport = TransportConfig::default().with_bearer_token(Some("tok-123".to_string().into()));
    let client = ApiClient::new(&format!("{}/api", server.uri()), &transport).unwrap();

    Mock::given(method("GET"))
        .and(path("/api/officers"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let rows: Vec<Value> = client.list(Collection::Officers).await.unwrap();
    assert!(rows.is_empty());
}
