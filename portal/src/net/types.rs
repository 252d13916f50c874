//! Wire types for the booking REST API.
//!
//! DESIGN
//! ======
//! Field names follow the backend contract (`flight_no`, `passport_no`,
//! login returning `{ token }`). These are pass-through records; the only
//! logic here is status classification and naming used by pages and the
//! CLI.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

// =============================================================================
// IDENTITY
// =============================================================================

/// Account role carried in the token's `role` claim.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[default]
    Passenger,
    Staff,
    Admin,
}

impl Role {
    /// Map a raw claim value to a role. Unrecognized values get the least
    /// privileged role.
    #[must_use]
    pub fn from_claim(raw: &str) -> Self {
        match raw {
            "STAFF" => Self::Staff,
            "ADMIN" => Self::Admin,
            _ => Self::Passenger,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Passenger => "PASSENGER",
            Self::Staff => "STAFF",
            Self::Admin => "ADMIN",
        }
    }

    /// Whether this role may open airport-operations views.
    #[must_use]
    pub fn is_operator(self) -> bool {
        matches!(self, Self::Staff | Self::Admin)
    }
}

/// The signed-in user as seen by the client, derived from token claims.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub subject_id: String,
    pub display_name: String,
    pub email: String,
    pub role: Role,
    #[serde(with = "time::serde::rfc3339")]
    pub issued_at: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub expires_at: Option<OffsetDateTime>,
}

impl Identity {
    /// Whether the token's `exp` claim lies at or before `now`.
    /// Tokens without `exp` never expire client-side.
    #[must_use]
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now)
    }
}

// =============================================================================
// AUTH
// =============================================================================

#[derive(Clone, Debug, Serialize)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AuthResponse {
    pub token: String,
}

/// Generic `{ "message": ... }` acknowledgement body.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

// =============================================================================
// FLIGHTS
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlightStatus {
    Scheduled,
    Delayed,
    Boarding,
    Departed,
    Arrived,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl FlightStatus {
    /// Wire name, e.g. for plain-text output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "SCHEDULED",
            Self::Delayed => "DELAYED",
            Self::Boarding => "BOARDING",
            Self::Departed => "DEPARTED",
            Self::Arrived => "ARRIVED",
            Self::Cancelled => "CANCELLED",
            Self::Unknown => "UNKNOWN",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    pub id: i64,
    pub flight_no: String,
    pub origin: String,
    pub destination: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gate_id: Option<i64>,
    #[serde(with = "time::serde::rfc3339")]
    pub departure_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub arrival_time: OffsetDateTime,
    pub status: FlightStatus,
    #[serde(default)]
    pub version: i32,
    #[serde(default)]
    pub total_seats: i32,
    #[serde(default)]
    pub base_price: Option<f64>,
}

/// Query parameters for `GET /flights`. Absent fields are omitted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SearchFlightsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "iso_date::option::serialize"
    )]
    pub date: Option<Date>,
}

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

// =============================================================================
// BOOKINGS
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Active,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl TicketStatus {
    /// Wire name, e.g. for plain-text output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Cancelled => "CANCELLED",
            Self::Unknown => "UNKNOWN",
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct BookingRequest {
    pub flight_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passport_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: i64,
    pub flight_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight: Option<Flight>,
    pub passenger_id: i64,
    #[serde(default)]
    pub seat_no: Option<String>,
    pub price: f64,
    pub status: TicketStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Ticket {
    /// Only active tickets can be cancelled.
    #[must_use]
    pub fn is_cancellable(&self) -> bool {
        self.status == TicketStatus::Active
    }
}

// =============================================================================
// AIRPORT OPERATIONS
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GateStatus {
    Open,
    Closed,
    Maintenance,
    #[serde(other)]
    Unknown,
}

impl GateStatus {
    /// Wire name, e.g. for plain-text output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Closed => "CLOSED",
            Self::Maintenance => "MAINTENANCE",
            Self::Unknown => "UNKNOWN",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gate {
    pub id: i64,
    pub terminal_id: i64,
    pub code: String,
    pub status: GateStatus,
}

#[derive(Clone, Debug, Serialize)]
pub struct CreateGateRequest {
    pub terminal_id: i64,
    pub code: String,
    pub status: GateStatus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BaggageStatus {
    Received,
    Loaded,
    InTransit,
    Delivered,
    #[serde(other)]
    Unknown,
}

impl BaggageStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Received => "RECEIVED",
            Self::Loaded => "LOADED",
            Self::InTransit => "IN_TRANSIT",
            Self::Delivered => "DELIVERED",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Next step in the handling flow. `Delivered` is terminal; an unknown
    /// status has no successor.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Received => Some(Self::Loaded),
            Self::Loaded => Some(Self::InTransit),
            Self::InTransit | Self::Delivered => Some(Self::Delivered),
            Self::Unknown => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Baggage {
    pub id: i64,
    pub ticket_id: i64,
    pub tag_code: String,
    pub status: BaggageStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Baggage row joined with the owning passenger, for the operations view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaggageDetail {
    pub id: i64,
    pub tag_code: String,
    pub status: BaggageStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub passenger_name: String,
    pub user_id: i64,
}

#[derive(Clone, Debug, Serialize)]
pub struct CreateBaggageRequest {
    pub ticket_id: i64,
}

#[derive(Clone, Debug, Serialize)]
pub struct UpdateBaggageRequest {
    pub status: BaggageStatus,
}
