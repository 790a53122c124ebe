use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use appointment_cell::router::appointment_routes;
use shared_utils::test_utils::{MockClinicResponses, TestConfig};

// Fixtures run in UTC-3: 10:00 local on 2030-03-14 is 13:00Z.
const LOCAL_DATE: &str = "2030-03-14";
const SLOT_INSTANT: &str = "2030-03-14T13:00:00.000Z";

fn create_test_app(server: &MockServer) -> Router {
    appointment_routes(TestConfig::for_backend(server.uri()).to_arc())
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn candidate(time: &str) -> Value {
    json!({
        "dateLocal": LOCAL_DATE,
        "timeLocal": time,
        "patientId": 1,
        "doctorId": 7,
        "officeId": 3
    })
}

async fn mount_snapshot(server: &MockServer, appointments: Value) {
    Mock::given(method("GET"))
        .and(path("/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(appointments))
        .mount(server)
        .await;
}

#[tokio::test]
async fn booking_posts_utc_instant_and_local_hour() {
    let server = MockServer::start().await;
    mount_snapshot(&server, json!([])).await;
    Mock::given(method("POST"))
        .and(path("/appointments"))
        .and(body_json(json!({
            "date": SLOT_INSTANT,
            "hour": "10:00",
            "patientIdPatient": 1,
            "doctorIdDoctor": 7,
            "medicalOfficeNumberOffice": 3
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(
            MockClinicResponses::appointment_response(12, 7, SLOT_INSTANT, "10:00", "RESERVADO"),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = send(create_test_app(&server), json_request("POST", "/", candidate("10:00"))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Appointment created successfully.");
    assert_eq!(body["appointment"]["id_appointment"], 12);
}

#[tokio::test]
async fn double_booking_is_a_conflict_and_never_posted() {
    let server = MockServer::start().await;
    mount_snapshot(&server, json!([
        MockClinicResponses::appointment_response(4, 7, SLOT_INSTANT, "10:00", "RESERVADO"),
    ]))
    .await;
    Mock::given(method("POST"))
        .and(path("/appointments"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let (status, body) = send(create_test_app(&server), json_request("POST", "/", candidate("10:00"))).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Doctor 7 already has an appointment on 2030-03-14 at 10:00");
}

#[tokio::test]
async fn canceled_slot_can_be_booked_again() {
    let server = MockServer::start().await;
    mount_snapshot(&server, json!([
        MockClinicResponses::appointment_response(4, 7, SLOT_INSTANT, "10:00", "CANCELADO"),
    ]))
    .await;
    Mock::given(method("POST"))
        .and(path("/appointments"))
        .respond_with(ResponseTemplate::new(201).set_body_json(
            MockClinicResponses::appointment_response(13, 7, SLOT_INSTANT, "10:00", "RESERVADO"),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let (status, _) = send(create_test_app(&server), json_request("POST", "/", candidate("10:00"))).await;

    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn missing_office_is_rejected_as_bad_request() {
    let server = MockServer::start().await;
    mount_snapshot(&server, json!([])).await;

    let mut body = candidate("10:00");
    body["officeId"] = json!(0);
    let (status, body) = send(create_test_app(&server), json_request("POST", "/", body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Required field is missing or invalid: officeId");
}

#[tokio::test]
async fn past_dates_are_rejected() {
    let server = MockServer::start().await;
    mount_snapshot(&server, json!([])).await;

    let mut body = candidate("10:00");
    body["dateLocal"] = json!("2020-01-02");
    let (status, body) = send(create_test_app(&server), json_request("POST", "/", body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "The appointment date and time cannot be in the past");
}

#[tokio::test]
async fn malformed_snapshot_records_are_skipped() {
    let server = MockServer::start().await;
    mount_snapshot(&server, json!([
        { "id_appointment": 90, "date": "not a date", "hour": "10:00", "doctor": { "id_doctor": 7 } },
        { "id_appointment": 91, "date": SLOT_INSTANT, "hour": "10:00" },
    ]))
    .await;
    Mock::given(method("POST"))
        .and(path("/appointments"))
        .respond_with(ResponseTemplate::new(201).set_body_json(
            MockClinicResponses::appointment_response(14, 7, SLOT_INSTANT, "10:00", "RESERVADO"),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let (status, _) = send(create_test_app(&server), json_request("POST", "/", candidate("10:00"))).await;

    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn backend_message_list_is_surfaced() {
    let server = MockServer::start().await;
    mount_snapshot(&server, json!([])).await;
    Mock::given(method("POST"))
        .and(path("/appointments"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "statusCode": 400,
            "message": ["date must be a valid ISO 8601 date string", "hour should not be empty"]
        })))
        .mount(&server)
        .await;

    let (status, body) = send(create_test_app(&server), json_request("POST", "/", candidate("10:00"))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "date must be a valid ISO 8601 date string, hour should not be empty"
    );
}

#[tokio::test]
async fn editing_keeps_its_own_slot_and_sends_update_shape() {
    let server = MockServer::start().await;
    mount_snapshot(&server, json!([
        MockClinicResponses::appointment_response(4, 7, SLOT_INSTANT, "10:00", "RESERVADO"),
    ]))
    .await;
    Mock::given(method("PUT"))
        .and(path("/appointments/4"))
        .and(body_json(json!({
            "date": SLOT_INSTANT,
            "hour": "10:00",
            "observations": "control",
            "state": "RESERVADO",
            "patientIdPatient": 1,
            "doctorIdDoctor": 7,
            "medicalOfficeNumberOffice": 3,
            "patientId": 1,
            "doctorId": 7,
            "medicalOfficeNumber": 3
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockClinicResponses::appointment_response(4, 7, SLOT_INSTANT, "10:00", "RESERVADO"),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let mut body = candidate("10:00");
    body["observations"] = json!(" control ");
    body["state"] = json!("RESERVADO");
    let (status, body) = send(create_test_app(&server), json_request("PUT", "/4", body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Appointment 4 updated successfully.");
}

#[tokio::test]
async fn cancel_sends_canceled_state_on_the_same_slot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/appointments/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockClinicResponses::appointment_response(4, 7, SLOT_INSTANT, "10:00", "RESERVADO"),
        ))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/appointments/4"))
        .and(body_partial_json(json!({
            "date": SLOT_INSTANT,
            "hour": "10:00",
            "state": "CANCELADO",
            "doctorId": 7
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockClinicResponses::appointment_response(4, 7, SLOT_INSTANT, "10:00", "CANCELADO"),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = send(create_test_app(&server), json_request("POST", "/4/cancel", json!({}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["appointment"]["state"], "CANCELADO");
}

#[tokio::test]
async fn edit_form_is_expressed_in_local_time() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/appointments/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockClinicResponses::appointment_response(4, 7, "2030-03-15T01:30:00.000Z", "22:30", "ATENDIDO"),
        ))
        .mount(&server)
        .await;

    let (status, body) = send(create_test_app(&server), get("/4/form")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dateLocal"], LOCAL_DATE);
    assert_eq!(body["timeLocal"], "22:30");
    assert_eq!(body["doctorId"], 7);
    assert_eq!(body["officeId"], 3);
    assert_eq!(body["state"], "ATENDIDO");
    assert_eq!(body["editingAppointmentId"], 4);
}

#[tokio::test]
async fn new_form_defaults_to_nine() {
    let server = MockServer::start().await;

    let (status, body) = send(create_test_app(&server), get("/form")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timeLocal"], "09:00");
    assert_eq!(body["dateLocal"], "");
    assert!(body["patientId"].is_null());
}

#[tokio::test]
async fn unknown_appointment_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/appointments/99"))
        .respond_with(ResponseTemplate::new(404).set_body_json(
            MockClinicResponses::error_response(404, "Appointment not found"),
        ))
        .mount(&server)
        .await;

    let (status, body) = send(create_test_app(&server), get("/99")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Appointment 99 not found");
}

#[tokio::test]
async fn availability_lists_free_and_taken_local_slots() {
    let server = MockServer::start().await;
    mount_snapshot(&server, json!([
        MockClinicResponses::appointment_response(4, 7, SLOT_INSTANT, "10:00", "RESERVADO"),
        MockClinicResponses::appointment_response(5, 8, "2030-03-14T14:00:00.000Z", "11:00", "RESERVADO"),
    ]))
    .await;
    Mock::given(method("GET"))
        .and(path("/doctors/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockClinicResponses::doctor_response(7, "Carlos", "Ruiz"),
        ))
        .mount(&server)
        .await;

    let (status, body) = send(
        create_test_app(&server),
        get("/availability?doctorId=7&date=2030-03-14"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["occupiedSlots"], json!(["10:00"]));
    let free = body["freeSlots"].as_array().unwrap();
    assert_eq!(free.len(), 23);
    assert!(!free.contains(&json!("10:00")));
    assert!(free.contains(&json!("11:00")));
}

#[tokio::test]
async fn availability_requires_a_well_formed_date() {
    let server = MockServer::start().await;

    let (status, body) = send(create_test_app(&server), get("/availability?doctorId=7&date=14/03/2030")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Required field is missing or invalid: date");
}

#[tokio::test]
async fn validate_returns_payload_without_submitting() {
    let server = MockServer::start().await;
    mount_snapshot(&server, json!([])).await;
    Mock::given(method("POST"))
        .and(path("/appointments"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let (status, body) = send(
        create_test_app(&server),
        json_request("POST", "/validate", candidate("19:30")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], true);
    assert_eq!(body["payload"]["date"], "2030-03-14T22:30:00.000Z");
    assert_eq!(body["payload"]["hour"], "19:30");
}

#[tokio::test]
async fn slot_grid_is_half_hourly() {
    let server = MockServer::start().await;

    let (status, body) = send(create_test_app(&server), get("/slots")).await;

    assert_eq!(status, StatusCode::OK);
    let slots = body["slots"].as_array().unwrap();
    assert_eq!(slots.len(), 24);
    assert_eq!(slots[0], "08:00");
    assert_eq!(slots[23], "19:30");
}

#[tokio::test]
async fn edit_moving_into_a_taken_slot_is_rejected_before_put() {
    let server = MockServer::start().await;
    mount_snapshot(&server, json!([
        MockClinicResponses::appointment_response(4, 7, "2030-03-14T15:00:00.000Z", "12:00", "RESERVADO"),
        MockClinicResponses::appointment_response(5, 7, SLOT_INSTANT, "10:00", "RESERVADO"),
    ]))
    .await;
    Mock::given(method("PUT"))
        .and(path("/appointments/4"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut body = candidate("10:00");
    body["state"] = json!("ATENDIDO");
    let (status, body) = send(create_test_app(&server), json_request("PUT", "/4", body)).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Doctor 7 already has an appointment on 2030-03-14 at 10:00");
}

#[tokio::test]
async fn off_grid_record_can_be_marked_attended() {
    let server = MockServer::start().await;
    mount_snapshot(&server, json!([
        MockClinicResponses::appointment_response(4, 7, "2030-03-15T01:30:00.000Z", "22:30", "RESERVADO"),
    ]))
    .await;
    Mock::given(method("PUT"))
        .and(path("/appointments/4"))
        .and(body_partial_json(json!({
            "date": "2030-03-15T01:30:00.000Z",
            "hour": "22:30",
            "state": "ATENDIDO"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockClinicResponses::appointment_response(4, 7, "2030-03-15T01:30:00.000Z", "22:30", "ATENDIDO"),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let mut body = candidate("22:30");
    body["state"] = json!("ATENDIDO");
    let (status, body) = send(create_test_app(&server), json_request("PUT", "/4", body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["appointment"]["state"], "ATENDIDO");
}

#[tokio::test]
async fn validate_ignores_state_on_a_new_booking() {
    let server = MockServer::start().await;
    mount_snapshot(&server, json!([])).await;

    let mut body = candidate("10:00");
    body["dateLocal"] = json!("2020-01-02");
    body["state"] = json!("CANCELADO");
    let (status, body) = send(create_test_app(&server), json_request("POST", "/validate", body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "The appointment date and time cannot be in the past");
}
