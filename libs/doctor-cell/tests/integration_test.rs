use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use doctor_cell::router::{doctor_routes, office_routes, specialty_routes};
use shared_utils::test_utils::{MockClinicResponses, TestConfig};

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn lists_doctors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockClinicResponses::doctor_response(7, "Carlos", "Ruiz"),
            MockClinicResponses::doctor_response(8, "Elena", "Soto"),
        ])))
        .mount(&server)
        .await;

    let app = doctor_routes(TestConfig::for_backend(server.uri()).to_arc());
    let (status, body) = get_json(app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["id_doctor"], 7);
    assert_eq!(body[1]["lastname"], "Soto");
}

#[tokio::test]
async fn unknown_doctor_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/doctors/42"))
        .respond_with(ResponseTemplate::new(404).set_body_json(
            MockClinicResponses::error_response(404, "Doctor not found"),
        ))
        .mount(&server)
        .await;

    let app = doctor_routes(TestConfig::for_backend(server.uri()).to_arc());
    let (status, body) = get_json(app, "/42").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Doctor not found");
}

#[tokio::test]
async fn lists_specialties() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/medical-specialty"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id_specialty": 1, "specialty_name": "Cardiología" }
        ])))
        .mount(&server)
        .await;

    let app = specialty_routes(TestConfig::for_backend(server.uri()).to_arc());
    let (status, body) = get_json(app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["specialty_name"], "Cardiología");
}

#[tokio::test]
async fn gets_office_by_number() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/medical-office/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockClinicResponses::office_response(3)))
        .mount(&server)
        .await;

    let app = office_routes(TestConfig::for_backend(server.uri()).to_arc());
    let (status, body) = get_json(app, "/3").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["number_office"], 3);
}

#[tokio::test]
async fn backend_outage_is_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/medical-office"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let app = office_routes(TestConfig::for_backend(server.uri()).to_arc());
    let (status, body) = get_json(app, "/").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "The request could not be completed. Please try again.");
}
