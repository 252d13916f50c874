//! REST client for the booking backend.
//!
//! ARCHITECTURE
//! ============
//! Every call funnels through [`ApiClient::send`] / `execute`, which attaches
//! the bearer token held by the shared [`SessionStore`] and normalizes
//! responses into [`ClientError`]. A 401 from any endpoint clears the
//! session and emits one [`ClientEvent::Unauthorized`]; navigating to the
//! login view is the receiver's job, not the client's.
//!
//! ERROR HANDLING
//! ==============
//! Non-success bodies are `{ "error": "..." }` when the backend produced
//! them; anything else falls back to a status-based message. No call is
//! retried.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::sync::Arc;
use std::time::Duration;

pub use reqwest::Method;
use reqwest::{RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::mpsc::UnboundedSender;

use super::error::ClientError;
use super::types::{
    AuthResponse, Baggage, BaggageDetail, BookingRequest, CreateBaggageRequest, CreateGateRequest,
    Flight, Gate, LoginRequest, MessageResponse, RegisterRequest, SearchFlightsParams, Ticket,
    UpdateBaggageRequest,
};
use crate::config::ClientConfig;
use crate::state::session::SessionStore;

/// Out-of-band notifications from the client to the composition root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientEvent {
    /// A request was rejected with 401 and the session has been cleared.
    Unauthorized,
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionStore>,
    events: UnboundedSender<ClientEvent>,
}

impl ApiClient {
    /// Build a client for `config.api_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(
        config: &ClientConfig,
        session: Arc<SessionStore>,
        events: UnboundedSender<ClientEvent>,
    ) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| ClientError::HttpClientBuild(e.to_string()))?;
        Ok(Self {
            http,
            base_url: config.api_url.clone(),
            session,
            events,
        })
    }

    /// Send `body` as JSON to `endpoint` (relative to the API root) and
    /// return the decoded response body. An empty body decodes as `null`.
    ///
    /// # Errors
    ///
    /// [`ClientError::Auth`] on 401 (session already cleared),
    /// [`ClientError::Api`] on other non-success statuses, and
    /// transport/parse errors otherwise.
    pub async fn send(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<Value>,
    ) -> Result<Value, ClientError> {
        let request = self.http.request(method, self.url(endpoint));
        let request = match body {
            Some(json) => request.json(&json),
            None => request,
        };
        self.execute(endpoint, request).await
    }

    // =========================================================================
    // AUTH
    // =========================================================================

    /// `POST /auth/register`.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn register(&self, req: &RegisterRequest) -> Result<MessageResponse, ClientError> {
        self.call(Method::POST, "/auth/register", Some(req)).await
    }

    /// `POST /auth/login`.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn login(&self, req: &LoginRequest) -> Result<AuthResponse, ClientError> {
        self.call(Method::POST, "/auth/login", Some(req)).await
    }

    // =========================================================================
    // FLIGHTS
    // =========================================================================

    /// `GET /flights?origin=..&destination=..&date=..`.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn search_flights(
        &self,
        params: &SearchFlightsParams,
    ) -> Result<Vec<Flight>, ClientError> {
        let request = self.http.get(self.url("/flights")).query(params);
        let value = self.execute("/flights", request).await?;
        decode_list(value)
    }

    // =========================================================================
    // BOOKINGS
    // =========================================================================

    /// `POST /bookings`.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn create_booking(&self, req: &BookingRequest) -> Result<Ticket, ClientError> {
        self.call(Method::POST, "/bookings", Some(req)).await
    }

    /// `GET /bookings/my`.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn my_bookings(&self) -> Result<Vec<Ticket>, ClientError> {
        self.call_list("/bookings/my").await
    }

    /// `POST /bookings/{id}/cancel`.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn cancel_booking(&self, ticket_id: i64) -> Result<MessageResponse, ClientError> {
        let endpoint = format!("/bookings/{ticket_id}/cancel");
        self.call::<_, ()>(Method::POST, &endpoint, None).await
    }

    /// `GET /bookings/baggage`.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn my_baggage(&self) -> Result<Vec<Baggage>, ClientError> {
        self.call_list("/bookings/baggage").await
    }

    // =========================================================================
    // AIRPORT OPERATIONS
    // =========================================================================

    /// `POST /ops/gates` (staff/admin).
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn create_gate(&self, req: &CreateGateRequest) -> Result<Gate, ClientError> {
        self.call(Method::POST, "/ops/gates", Some(req)).await
    }

    /// `GET /ops/gates`.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn list_gates(&self) -> Result<Vec<Gate>, ClientError> {
        self.call_list("/ops/gates").await
    }

    /// `POST /ops/baggage` (staff/admin).
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn check_in_baggage(
        &self,
        req: &CreateBaggageRequest,
    ) -> Result<Baggage, ClientError> {
        self.call(Method::POST, "/ops/baggage", Some(req)).await
    }

    /// `GET /ops/baggage` (staff/admin).
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn list_all_baggage(&self) -> Result<Vec<BaggageDetail>, ClientError> {
        self.call_list("/ops/baggage").await
    }

    /// `PATCH /ops/baggage/{id}` (staff/admin).
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn update_baggage(
        &self,
        baggage_id: i64,
        req: &UpdateBaggageRequest,
    ) -> Result<Baggage, ClientError> {
        let endpoint = format!("/ops/baggage/{baggage_id}");
        self.call(Method::PATCH, &endpoint, Some(req)).await
    }

    // =========================================================================
    // PLUMBING
    // =========================================================================

    fn url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.base_url)
    }

    async fn call<T, B>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = body
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| ClientError::Parse(e.to_string()))?;
        let value = self.send(endpoint, method, body).await?;
        serde_json::from_value(value).map_err(|e| ClientError::Parse(e.to_string()))
    }

    async fn call_list<T: DeserializeOwned>(&self, endpoint: &str) -> Result<Vec<T>, ClientError> {
        let value = self.send(endpoint, Method::GET, None).await?;
        decode_list(value)
    }

    async fn execute(&self, endpoint: &str, request: RequestBuilder) -> Result<Value, ClientError> {
        let request = match self.session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        tracing::debug!(endpoint, status = status.as_u16(), "api response");

        if status == StatusCode::UNAUTHORIZED {
            self.handle_unauthorized(endpoint);
            return Err(ClientError::Auth {
                message: error_message(&text, status),
            });
        }
        if !status.is_success() {
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: error_message(&text, status),
            });
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| ClientError::Parse(e.to_string()))
    }

    fn handle_unauthorized(&self, endpoint: &str) {
        tracing::warn!(endpoint, "request rejected as unauthenticated; signing out");
        if let Err(e) = self.session.clear_session() {
            tracing::warn!(error = %e, "failed to remove persisted session");
        }
        // A closed receiver means nobody is routing views; the session is
        // already cleared either way.
        let _ = self.events.send(ClientEvent::Unauthorized);
    }
}

/// Lists come back as `null` when the backend has no rows.
fn decode_list<T: DeserializeOwned>(value: Value) -> Result<Vec<T>, ClientError> {
    if value.is_null() {
        return Ok(Vec::new());
    }
    serde_json::from_value(value).map_err(|e| ClientError::Parse(e.to_string()))
}

fn error_message(body: &str, status: StatusCode) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_owned))
        .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()))
}
