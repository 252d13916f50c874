//! Page controllers: view state plus the actions each screen performs.
//!
//! DESIGN
//! ======
//! A page owns plain data (fetched rows plus a [`PageStatus`]) and exposes
//! async actions taking the [`ViewHandle`] it was mounted with. Results that
//! arrive after the handle went stale are dropped without touching state.

pub mod admin;
pub mod book_flight;
pub mod bookings;
pub mod home;
pub mod login;
pub mod profile;

use crate::net::error::ClientError;
use crate::routes::ViewHandle;

/// Whether an action's result reached the page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    Applied,
    /// The view was left before the response arrived.
    Discarded,
}

/// Loading flag and user-facing messages shared by every page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageStatus {
    pub loading: bool,
    pub error: Option<String>,
    /// Last success message (e.g. "Ticket cancelled successfully").
    pub notice: Option<String>,
}

impl PageStatus {
    pub(crate) fn begin(&mut self) {
        self.loading = true;
    }

    /// Record a failure that happened before any request was sent.
    pub(crate) fn reject(&mut self, e: ClientError) -> ClientError {
        self.error = Some(e.to_string());
        e
    }

    /// Route a finished request into page state.
    ///
    /// Stale views yield `Ok(None)` and leave the status alone. Otherwise
    /// loading ends and the error is cleared on success or set on failure.
    pub(crate) fn settle<T>(
        &mut self,
        view: &ViewHandle,
        result: Result<T, ClientError>,
    ) -> Result<Option<T>, ClientError> {
        if !view.is_current() {
            tracing::debug!("dropping response for a view that is no longer mounted");
            return Ok(None);
        }
        self.loading = false;
        match result {
            Ok(value) => {
                self.error = None;
                Ok(Some(value))
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }
}
