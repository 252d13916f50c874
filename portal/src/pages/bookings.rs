//! The caller's tickets and baggage.

#[cfg(test)]
#[path = "bookings_test.rs"]
mod bookings_test;

use super::{ActionOutcome, PageStatus};
use crate::net::api::ApiClient;
use crate::net::error::ClientError;
use crate::net::types::{Baggage, Ticket};
use crate::routes::ViewHandle;

#[derive(Clone, Debug, Default)]
pub struct BookingsPage {
    pub tickets: Vec<Ticket>,
    /// Present only while the baggage panel is open.
    pub baggage: Option<Vec<Baggage>>,
    pub status: PageStatus,
}

impl BookingsPage {
    /// Fetch `GET /bookings/my`.
    ///
    /// # Errors
    ///
    /// Request failures, also recorded in `status`.
    pub async fn load(
        &mut self,
        api: &ApiClient,
        view: &ViewHandle,
    ) -> Result<ActionOutcome, ClientError> {
        self.status.begin();
        let result = api.my_bookings().await;
        let Some(tickets) = self.status.settle(view, result)? else {
            return Ok(ActionOutcome::Discarded);
        };
        self.tickets = tickets;
        Ok(ActionOutcome::Applied)
    }

    /// Cancel a ticket, then refetch the list.
    ///
    /// # Errors
    ///
    /// Rejects tickets already known to be inactive without a request;
    /// otherwise request failures.
    pub async fn cancel(
        &mut self,
        api: &ApiClient,
        view: &ViewHandle,
        ticket_id: i64,
    ) -> Result<ActionOutcome, ClientError> {
        if let Some(ticket) = self.tickets.iter().find(|t| t.id == ticket_id) {
            if !ticket.is_cancellable() {
                let message = format!("Ticket {ticket_id} is not active");
                return Err(self.status.reject(ClientError::validation("ticket", message)));
            }
        }

        self.status.begin();
        let result = api.cancel_booking(ticket_id).await;
        if self.status.settle(view, result)?.is_none() {
            return Ok(ActionOutcome::Discarded);
        }
        tracing::info!(ticket_id, "ticket cancelled");
        self.status.notice = Some("Ticket cancelled successfully".into());
        self.load(api, view).await
    }

    /// Open or close the baggage panel, fetching on open.
    ///
    /// # Errors
    ///
    /// Request failures when opening.
    pub async fn toggle_baggage(
        &mut self,
        api: &ApiClient,
        view: &ViewHandle,
    ) -> Result<ActionOutcome, ClientError> {
        if self.baggage.take().is_some() {
            return Ok(ActionOutcome::Applied);
        }
        self.status.begin();
        let result = api.my_baggage().await;
        let Some(baggage) = self.status.settle(view, result)? else {
            return Ok(ActionOutcome::Discarded);
        };
        self.baggage = Some(baggage);
        Ok(ActionOutcome::Applied)
    }
}
