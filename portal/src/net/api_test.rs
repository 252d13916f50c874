use super::*;
use crate::net::types::{BaggageStatus, FlightStatus, GateStatus, TicketStatus};
use crate::state::session::Session;
use crate::test_support::{MockBackend, flight_json, make_token, ticket_json};
use serde_json::json;
use time::macros::date;

fn passenger_token() -> String {
    make_token(&json!({ "sub": 11, "name": "Pat", "role": "PASSENGER" }))
}

// =============================================================================
// authorization header
// =============================================================================

#[tokio::test]
async fn send_attaches_bearer_when_signed_in() {
    let backend = MockBackend::start().await;
    backend.respond("GET", "/bookings/my", 200, json!([]));
    let (api, session, _rx) = backend.client();
    let token = passenger_token();
    session.login_with_token(&token).unwrap();

    api.my_bookings().await.unwrap();

    let seen = backend.requests_to("GET", "/bookings/my");
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].authorization.as_deref(), Some(format!("Bearer {token}").as_str()));
}

#[tokio::test]
async fn send_omits_header_without_session() {
    let backend = MockBackend::start().await;
    backend.respond("GET", "/ops/gates", 200, json!([]));
    let (api, _session, _rx) = backend.client();

    api.list_gates().await.unwrap();

    assert!(backend.requests()[0].authorization.is_none());
}

#[tokio::test]
async fn cleared_session_stops_sending_header() {
    let backend = MockBackend::start().await;
    backend.respond("GET", "/bookings/my", 200, json!([]));
    let (api, session, _rx) = backend.client();
    session.login_with_token(&passenger_token()).unwrap();
    api.my_bookings().await.unwrap();

    session.clear_session().unwrap();
    api.my_bookings().await.unwrap();

    let seen = backend.requests_to("GET", "/bookings/my");
    assert!(seen[0].authorization.is_some());
    assert!(seen[1].authorization.is_none());
}

// =============================================================================
// error normalization
// =============================================================================

#[tokio::test]
async fn unauthorized_clears_session_and_emits_once() {
    let backend = MockBackend::start().await;
    backend.respond("GET", "/bookings/my", 401, json!({ "error": "unauthorized" }));
    let (api, session, mut rx) = backend.client();
    session.login_with_token(&passenger_token()).unwrap();

    let err = api.my_bookings().await.unwrap_err();

    assert!(matches!(err, ClientError::Auth { ref message } if message == "unauthorized"));
    assert_eq!(session.current_session(), Session::Anonymous);
    assert_eq!(rx.try_recv().ok(), Some(ClientEvent::Unauthorized));
    assert!(rx.try_recv().is_err(), "exactly one event per failed call");
    assert_eq!(backend.requests().len(), 1, "no retry");
}

#[tokio::test]
async fn unauthorized_without_listener_still_signs_out() {
    let backend = MockBackend::start().await;
    backend.respond("GET", "/bookings/baggage", 401, json!(null));
    let (api, session, rx) = backend.client();
    drop(rx);
    session.login_with_token(&passenger_token()).unwrap();

    let err = api.my_baggage().await.unwrap_err();
    assert!(err.is_auth());
    assert!(!session.current_session().is_authenticated());
}

#[tokio::test]
async fn forbidden_is_api_error_and_keeps_session() {
    let backend = MockBackend::start().await;
    backend.respond("POST", "/ops/gates", 403, json!({ "error": "forbidden" }));
    let (api, session, mut rx) = backend.client();
    session.login_with_token(&passenger_token()).unwrap();

    let req = CreateGateRequest { terminal_id: 1, code: "A1".into(), status: GateStatus::Open };
    let err = api.create_gate(&req).await.unwrap_err();

    assert!(matches!(err, ClientError::Api { status: 403, ref message } if message == "forbidden"));
    assert!(session.current_session().is_authenticated());
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn error_without_body_uses_status_message() {
    let backend = MockBackend::start().await;
    backend.respond("GET", "/ops/baggage", 500, json!(null));
    let (api, _session, _rx) = backend.client();

    let err = api.list_all_baggage().await.unwrap_err();
    assert_eq!(err.to_string(), "Request failed with status 500");
    assert_eq!(err.error_code(), "E_API");
}

#[tokio::test]
async fn unparseable_success_body_is_parse_error() {
    let backend = MockBackend::start().await;
    backend.respond("GET", "/bookings/my", 200, json!({ "unexpected": true }));
    let (api, _session, _rx) = backend.client();

    assert!(matches!(api.my_bookings().await.unwrap_err(), ClientError::Parse(_)));
}

#[tokio::test]
async fn unreachable_backend_is_transport_error() {
    let config = ClientConfig::new("http://127.0.0.1:9/api/v1", std::env::temp_dir());
    let session = Arc::new(SessionStore::open(crate::state::storage::MemoryStorage::new()));
    let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
    let api = ApiClient::new(&config, session, tx).unwrap();

    assert!(matches!(api.list_gates().await.unwrap_err(), ClientError::Transport(_)));
}

// =============================================================================
// endpoints
// =============================================================================

#[tokio::test]
async fn send_returns_raw_json() {
    let backend = MockBackend::start().await;
    backend.respond("PATCH", "/ops/baggage/4", 200, json!({ "ok": 1 }));
    let (api, _session, _rx) = backend.client();

    let value = api
        .send("/ops/baggage/4", Method::PATCH, Some(json!({ "status": "LOADED" })))
        .await
        .unwrap();

    assert_eq!(value, json!({ "ok": 1 }));
    assert_eq!(backend.requests()[0].body, json!({ "status": "LOADED" }));
}

#[tokio::test]
async fn empty_success_body_is_null() {
    let backend = MockBackend::start().await;
    backend.respond("POST", "/bookings/1/cancel", 204, json!(null));
    let (api, _session, _rx) = backend.client();

    let value = api.send("/bookings/1/cancel", Method::POST, None).await.unwrap();
    assert!(value.is_null());
}

#[tokio::test]
async fn login_posts_credentials_and_reads_token() {
    let backend = MockBackend::start().await;
    backend.respond("POST", "/auth/login", 200, json!({ "token": "a.b.c", "user": null }));
    let (api, _session, _rx) = backend.client();

    let resp = api
        .login(&LoginRequest { email: "a@b.c".into(), password: "secret".into() })
        .await
        .unwrap();

    assert_eq!(resp.token, "a.b.c");
    assert_eq!(backend.requests()[0].body, json!({ "email": "a@b.c", "password": "secret" }));
}

#[tokio::test]
async fn search_flights_encodes_query() {
    let backend = MockBackend::start().await;
    backend.respond("GET", "/flights", 200, json!([flight_json(1, "VN100")]));
    let (api, _session, _rx) = backend.client();

    let params = SearchFlightsParams {
        origin: Some("SGN".into()),
        destination: Some("HAN".into()),
        date: Some(date!(2026 - 04 - 01)),
    };
    let flights = api.search_flights(&params).await.unwrap();

    assert_eq!(flights.len(), 1);
    assert_eq!(flights[0].flight_no, "VN100");
    assert_eq!(flights[0].status, FlightStatus::Scheduled);
    assert_eq!(
        backend.requests()[0].query.as_deref(),
        Some("origin=SGN&destination=HAN&date=2026-04-01")
    );
}

#[tokio::test]
async fn search_flights_without_filters_sends_no_query() {
    let backend = MockBackend::start().await;
    backend.respond("GET", "/flights", 200, json!(null));
    let (api, _session, _rx) = backend.client();

    let flights = api.search_flights(&SearchFlightsParams::default()).await.unwrap();
    assert!(flights.is_empty());
    assert!(backend.requests()[0].query.as_deref().is_none_or(str::is_empty));
}

#[tokio::test]
async fn cancel_booking_posts_to_ticket_path() {
    let backend = MockBackend::start().await;
    backend.respond("POST", "/bookings/42/cancel", 200, json!({ "message": "ticket cancelled" }));
    let (api, _session, _rx) = backend.client();

    let resp = api.cancel_booking(42).await.unwrap();
    assert_eq!(resp.message, "ticket cancelled");
    assert_eq!(backend.requests_to("POST", "/bookings/42/cancel").len(), 1);
}

#[tokio::test]
async fn create_booking_omits_absent_optionals() {
    let backend = MockBackend::start().await;
    backend.respond("POST", "/bookings", 201, ticket_json(8, "ACTIVE"));
    let (api, _session, _rx) = backend.client();

    let ticket = api
        .create_booking(&BookingRequest { flight_id: 3, passport_no: None, phone: None })
        .await
        .unwrap();

    assert_eq!(ticket.status, TicketStatus::Active);
    assert_eq!(backend.requests()[0].body, json!({ "flight_id": 3 }));
}

#[tokio::test]
async fn update_baggage_patches_status() {
    let backend = MockBackend::start().await;
    backend.respond(
        "PATCH",
        "/ops/baggage/5",
        200,
        json!({
            "id": 5, "ticket_id": 8, "tag_code": "BG-5",
            "status": "IN_TRANSIT", "updated_at": "2026-02-02T00:00:00Z"
        }),
    );
    let (api, _session, _rx) = backend.client();

    let bag = api
        .update_baggage(5, &UpdateBaggageRequest { status: BaggageStatus::InTransit })
        .await
        .unwrap();

    assert_eq!(bag.status, BaggageStatus::InTransit);
    assert_eq!(backend.requests()[0].body, json!({ "status": "IN_TRANSIT" }));
}
