use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use server::{build_app, AppState};

fn app() -> Router {
    build_app(AppState::memory(false))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(Body::from(b.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, value)
}

async fn create_type(app: &Router, name: &str) -> String {
    let (status, body) = send(app, Method::POST, "/api/vehicle-types", Some(json!({"name": name, "capacity": 5}))).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_str().unwrap().to_string()
}

/// `(vehicleTypeId, quantity)` pairs of an operation body, in order.
fn demand(op: &Value) -> Value {
    op["requirements"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| json!({"vehicleTypeId": r["vehicleTypeId"], "quantity": r["quantity"]}))
        .collect()
}

#[tokio::test]
async fn health_is_ok() {
    let (status, body) = send(&app(), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn openapi_document_is_served() {
    let (status, body) = send(&app(), Method::GET, "/api/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/operations/{id}/requirements"].is_object());
}

#[tokio::test]
async fn vehicle_type_scenario() {
    let app = app();
    let (status, created) =
        send(&app, Method::POST, "/api/vehicle-types", Some(json!({"name": "Sedan", "capacity": 5}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(created["id"].is_string());
    assert!(created["createdAt"].is_string());
    assert_eq!(created["description"], Value::Null);

    let (status, err) =
        send(&app, Method::POST, "/api/vehicle-types", Some(json!({"name": "Sedan", "capacity": 5}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err["statusCode"], 409);
    assert_eq!(err["error"], "ConflictError");
    assert_eq!(err["message"], "Vehicle type with name 'Sedan' already exists");

    let (status, list) = send(&app, Method::GET, "/api/vehicle-types?name=sed", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["id"], created["id"]);

    let unknown = format!("/api/vehicle-types/{}", uuid::Uuid::new_v4());
    let (status, err) = send(&app, Method::DELETE, &unknown, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["error"], "NotFoundError");
    assert_eq!(err["message"], "Vehicle type not found");
}

#[tokio::test]
async fn vehicle_type_patch_and_delete() {
    let app = app();
    let id = create_type(&app, "Sedan").await;
    let uri = format!("/api/vehicle-types/{id}");

    let (status, same) = send(&app, Method::PATCH, &uri, Some(json!({"name": "Sedan"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(same["capacity"], 5);

    let (status, cleared) = send(&app, Method::PATCH, &uri, Some(json!({"capacity": null}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cleared["capacity"], Value::Null);
    assert_eq!(cleared["name"], "Sedan");

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);
    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn referenced_vehicle_type_cannot_be_deleted() {
    let app = app();
    let sedan = create_type(&app, "Sedan").await;
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/vehicles",
        Some(json!({"registrationNo": "ABC-123", "vehicleTypeId": sedan})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, err) = send(&app, Method::DELETE, &format!("/api/vehicle-types/{sedan}"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err["error"], "ConflictError");
}

#[tokio::test]
async fn vehicle_scenario() {
    let app = app();
    let sedan = create_type(&app, "Sedan").await;
    let body = json!({"registrationNo": "ABC-123", "vehicleTypeId": sedan});

    let (status, vehicle) = send(&app, Method::POST, "/api/vehicles", Some(body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(vehicle["status"], "AVAILABLE");
    assert_eq!(vehicle["registrationNo"], "ABC-123");
    assert_eq!(vehicle["vehicleType"]["id"], sedan.as_str());
    assert_eq!(vehicle["vehicleType"]["name"], "Sedan");

    let (status, _) = send(&app, Method::POST, "/api/vehicles", Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, list) = send(&app, Method::GET, &format!("/api/vehicles/by-type/{sedan}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["vehicleType"]["capacity"], 5);

    let (status, _) = send(&app, Method::GET, &format!("/api/vehicles/by-type/{}", uuid::Uuid::new_v4()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn vehicle_with_unknown_type_is_not_found() {
    let app = app();
    let body = json!({"registrationNo": "ABC-123", "vehicleTypeId": uuid::Uuid::new_v4()});
    let (status, err) = send(&app, Method::POST, "/api/vehicles", Some(body)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["message"], "Vehicle type not found");
}

#[tokio::test]
async fn vehicle_list_filters_by_status() {
    let app = app();
    let sedan = create_type(&app, "Sedan").await;
    for (reg, status) in [("A-1", "AVAILABLE"), ("B-2", "MAINTENANCE")] {
        let body = json!({"registrationNo": reg, "vehicleTypeId": sedan, "status": status});
        assert_eq!(send(&app, Method::POST, "/api/vehicles", Some(body)).await.0, StatusCode::CREATED);
    }
    let (status, list) = send(&app, Method::GET, "/api/vehicles?status=MAINTENANCE", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["registrationNo"], "B-2");

    let (status, err) = send(&app, Method::GET, "/api/vehicles?status=PARKED", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["statusCode"], 400);
}

#[tokio::test]
async fn operation_scenario() {
    let app = app();
    let sedan = create_type(&app, "Sedan").await;

    let (status, op) = send(
        &app,
        Method::POST,
        "/api/operations",
        Some(json!({"name": "Airport run", "requirements": [{"vehicleTypeId": sedan, "quantity": 2}]})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(op["status"], "PLANNING");
    assert_eq!(demand(&op), json!([{"vehicleTypeId": sedan, "quantity": 2}]));
    let line = &op["requirements"][0];
    assert_eq!(line["operationId"], op["id"]);
    assert!(line["id"].is_string());
    assert_eq!(line["vehicleType"]["name"], "Sedan");

    let uri = format!("/api/operations/{}", op["id"].as_str().unwrap());
    let (status, updated) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(json!({"requirements": [{"vehicleTypeId": sedan, "quantity": 5}]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(demand(&updated), json!([{"vehicleTypeId": sedan, "quantity": 5}]));

    let (_, fetched) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(fetched["requirements"].as_array().unwrap().len(), 1);

    // embedded types follow renames
    let (status, _) = send(&app, Method::PATCH, &format!("/api/vehicle-types/{sedan}"), Some(json!({"name": "Saloon"}))).await;
    assert_eq!(status, StatusCode::OK);
    let (_, fetched) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(fetched["requirements"][0]["vehicleType"]["name"], "Saloon");
}

#[tokio::test]
async fn operation_with_empty_requirements_is_rejected() {
    let app = app();
    let (status, err) =
        send(&app, Method::POST, "/api/operations", Some(json!({"name": "Empty", "requirements": []}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "Bad Request");
    assert_eq!(err["statusCode"], 400);
    assert!(err["message"].as_str().unwrap().contains("At least one vehicle type requirement is required"));
}

#[tokio::test]
async fn operation_with_unknown_vehicle_type_is_not_found() {
    let app = app();
    let body = json!({"name": "Ghost", "requirements": [{"vehicleTypeId": uuid::Uuid::new_v4(), "quantity": 1}]});
    let (status, err) = send(&app, Method::POST, "/api/operations", Some(body)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["message"], "Vehicle type not found");
}

#[tokio::test]
async fn requirement_sub_resource() {
    let app = app();
    let sedan = create_type(&app, "Sedan").await;
    let van = create_type(&app, "Van").await;
    let (_, op) = send(
        &app,
        Method::POST,
        "/api/operations",
        Some(json!({"name": "Harbour shuttle", "requirements": [{"vehicleTypeId": sedan, "quantity": 1}]})),
    )
    .await;
    let id = op["id"].as_str().unwrap().to_string();
    let reqs = format!("/api/operations/{id}/requirements");

    let (status, _) = send(&app, Method::POST, &reqs, Some(json!({"vehicleTypeId": van, "quantity": 2}))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, after) = send(&app, Method::POST, &reqs, Some(json!({"vehicleTypeId": van, "quantity": 4}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        demand(&after),
        json!([{"vehicleTypeId": sedan, "quantity": 1}, {"vehicleTypeId": van, "quantity": 4}])
    );
    assert_eq!(after["requirements"][1]["vehicleType"]["name"], "Van");

    let (status, patched) = send(&app, Method::PATCH, &format!("{reqs}/{sedan}"), Some(json!({"quantity": 3}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["requirements"][0]["quantity"], 3);

    let (status, _) = send(&app, Method::PATCH, &format!("{reqs}/{}", uuid::Uuid::new_v4()), Some(json!({"quantity": 3}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::PATCH, &format!("{reqs}/{sedan}"), Some(json!({"quantity": 0}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::DELETE, &format!("{reqs}/{van}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::DELETE, &format!("{reqs}/{van}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, by_type) = send(&app, Method::GET, &format!("/api/operations/by-type/{sedan}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_type.as_array().unwrap().len(), 1);
    let (_, none) = send(&app, Method::GET, &format!("/api/operations?vehicleTypeId={van}"), None).await;
    assert!(none.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn malformed_requests_are_bad_requests() {
    let app = app();
    let (status, err) = send(&app, Method::GET, "/api/vehicles/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "Bad Request");

    let (status, _) = send(&app, Method::POST, "/api/vehicle-types", Some(json!({"capacity": 5}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, err) = send(&app, Method::POST, "/api/vehicle-types", Some(json!({"name": ""}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "Bad Request");

    let (status, _) = send(&app, Method::GET, "/api/operations?vehicleTypeId=nope", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    for uri in ["/api/operations?status=planning", "/api/vehicles?status=PARKED"] {
        let (status, err) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err["error"], "Bad Request");
    }
}

#[tokio::test]
async fn status_transitions_can_be_enforced() {
    let app = build_app(AppState::memory(true));
    let sedan = create_type(&app, "Sedan").await;
    let (_, op) = send(
        &app,
        Method::POST,
        "/api/operations",
        Some(json!({"name": "Strict", "requirements": [{"vehicleTypeId": sedan, "quantity": 1}]})),
    )
    .await;
    let uri = format!("/api/operations/{}", op["id"].as_str().unwrap());

    let (status, _) = send(&app, Method::PATCH, &uri, Some(json!({"status": "COMPLETED"}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, body) = send(&app, Method::PATCH, &uri, Some(json!({"status": "ACTIVE"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ACTIVE");
}
