//! Booking a seat on one flight.

#[cfg(test)]
#[path = "book_flight_test.rs"]
mod book_flight_test;

use super::{ActionOutcome, PageStatus};
use crate::app::App;
use crate::net::api::ApiClient;
use crate::net::error::ClientError;
use crate::net::types::{BookingRequest, Flight, SearchFlightsParams, Ticket};
use crate::routes::{Route, ViewHandle};

const MIN_PASSPORT_LEN: usize = 5;
const MIN_PHONE_LEN: usize = 10;

/// Passenger details collected on the booking form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BookingForm {
    pub passport_no: String,
    pub phone: String,
}

impl BookingForm {
    /// # Errors
    ///
    /// Returns [`ClientError::Validation`] naming the first bad field.
    pub fn validate(&self, flight_id: i64) -> Result<BookingRequest, ClientError> {
        let passport_no = self.passport_no.trim();
        if passport_no.chars().count() < MIN_PASSPORT_LEN {
            return Err(ClientError::validation("passport_no", "Passport number is required"));
        }
        let phone = self.phone.trim();
        if phone.chars().count() < MIN_PHONE_LEN {
            return Err(ClientError::validation("phone", "Phone number is required"));
        }
        Ok(BookingRequest {
            flight_id,
            passport_no: Some(passport_no.to_owned()),
            phone: Some(phone.to_owned()),
        })
    }
}

#[derive(Clone, Debug)]
pub struct BookFlightPage {
    pub flight_id: i64,
    /// The flight being booked, once found.
    pub flight: Option<Flight>,
    pub status: PageStatus,
}

impl BookFlightPage {
    #[must_use]
    pub fn new(flight_id: i64) -> Self {
        Self {
            flight_id,
            flight: None,
            status: PageStatus::default(),
        }
    }

    /// Look the flight up in the unfiltered flight list.
    ///
    /// # Errors
    ///
    /// Request failures, or [`ClientError::Api`] with status 404 when no
    /// flight has this id.
    pub async fn load(
        &mut self,
        api: &ApiClient,
        view: &ViewHandle,
    ) -> Result<ActionOutcome, ClientError> {
        self.status.begin();
        let flight_id = self.flight_id;
        let result = api
            .search_flights(&SearchFlightsParams::default())
            .await
            .and_then(|flights| {
                flights
                    .into_iter()
                    .find(|f| f.id == flight_id)
                    .ok_or_else(|| ClientError::Api {
                        status: 404,
                        message: "Flight not found".into(),
                    })
            });
        let Some(flight) = self.status.settle(view, result)? else {
            return Ok(ActionOutcome::Discarded);
        };
        self.flight = Some(flight);
        Ok(ActionOutcome::Applied)
    }

    /// Book the flight and move to the bookings view.
    ///
    /// # Errors
    ///
    /// Validation or request failures; the view is unchanged on failure.
    pub async fn submit(
        &mut self,
        app: &mut App,
        form: &BookingForm,
    ) -> Result<Ticket, ClientError> {
        let req = form.validate(self.flight_id).map_err(|e| self.status.reject(e))?;
        self.status.begin();
        let result = app.api().create_booking(&req).await;
        self.status.loading = false;
        let ticket = result.map_err(|e| self.status.reject(e))?;

        tracing::info!(ticket_id = ticket.id, flight_id = self.flight_id, "flight booked");
        self.status.notice = Some("Flight booked successfully!".into());
        app.navigate(Route::Bookings);
        Ok(ticket)
    }
}
