#![allow(clippy::unwrap_used)]
// End-to-end controller flows against a mocked REST service.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use canopy_core::{
    Animal, ApiClient, CoreError, Entity, EntityId, Gateway, HttpGateway, Resource,
    TransportConfig, ViewController,
};

async fn setup() -> (MockServer, HttpGateway) {
    let server = MockServer::start().await;
    let client = ApiClient::new(&format!("{}/api", server.uri()), &TransportConfig::default())
        .unwrap();
    (server, HttpGateway::new(Arc::new(client)))
}

fn tiger(count: u32, zone: &str) -> serde_json::Value {
    json!({
        "animalId": 1,
        "name": "Tiger",
        "scientificName": "Panthera tigris",
        "location": "North ridge",
        "zone": zone,
        "count": count,
        "speciesType": "Mammal",
        "conservationStatus": "Endangered",
        "lastSightingDate": "2025-02-01",
        "createdAt": "2025-01-01T08:00:00",
        "updatedAt": "2025-01-02T08:00:00"
    })
}

#[tokio::test]
async fn quick_update_puts_merged_record() {
    let (server, gateway) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/animals"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([tiger(10, "Zone A")])))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    // Only count changes; everything else, bookkeeping included, is sent back untouched.
    Mock::given(method("PUT"))
        .and(path("/api/animals/1"))
        .and(body_json(tiger(12, "Zone A")))
        .respond_with(ResponseTemplate::new(200).set_body_json(tiger(12, "Zone A")))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/animals"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([tiger(12, "Zone A")])))
        .mount(&server)
        .await;

    let mut view = ViewController::<Animal>::new();
    let request = view.refresh();
    view.run(&gateway, request).await.unwrap();

    view.open_quick_update(EntityId::new(1)).unwrap();
    view.draft_mut()
        .set_input(Animal::field("count").unwrap(), "12");
    let request = view.save().unwrap();
    view.run(&gateway, request).await.unwrap();

    assert_eq!(view.records()[0].count, 12);
}

#[tokio::test]
async fn missing_record_maps_to_not_found() {
    let (server, gateway) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/resources/77"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = Gateway::<Resource>::delete(&gateway, EntityId::new(77)).await;
    match result {
        Err(CoreError::NotFound {
            entity_type,
            identifier,
        }) => {
            assert_eq!(entity_type, "Resource");
            assert_eq!(identifier, "77");
        }
        other => panic!("expected NotFound, got: {other:?}"),
    }
}

#[tokio::test]
async fn create_posts_draft_without_id() {
    let (server, gateway) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/resources"))
        .and(body_json(json!({
            "resourceName": "Patrol Jeep",
            "resourceType": "Vehicle",
            "quantity": 2,
            "unit": "",
            "location": "",
            "assignedZone": "Zone A",
            "assignedOfficerId": 7,
            "conditionStatus": "Excellent",
            "cost": null,
            "lastMaintenanceDate": "2025-03-14"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "resourceId": 3,
            "resourceName": "Patrol Jeep",
            "resourceType": "Vehicle",
            "quantity": 2,
            "assignedZone": "Zone A",
            "assignedOfficerId": 7
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/resources"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let mut view = ViewController::<Resource>::new()
        .with_today(chrono::NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
    view.open_add();
    let draft = view.draft_mut();
    draft.set_input(Resource::field("resourceName").unwrap(), "Patrol Jeep");
    draft.set_input(Resource::field("quantity").unwrap(), "2");
    draft.set_input(Resource::field("assignedZone").unwrap(), "Zone A");
    draft.set_input(Resource::field("assignedOfficerId").unwrap(), "7");
    let request = view.save().unwrap();
    view.run(&gateway, request).await.unwrap();

    assert_eq!(view.last_saved().and_then(Entity::id), Some(EntityId::new(3)));
}
