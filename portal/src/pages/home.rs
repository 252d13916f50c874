//! Flight search.

#[cfg(test)]
#[path = "home_test.rs"]
mod home_test;

use time::Date;
use time::macros::format_description;

use super::{ActionOutcome, PageStatus};
use crate::net::api::ApiClient;
use crate::net::error::ClientError;
use crate::net::types::{Flight, SearchFlightsParams};
use crate::routes::ViewHandle;

/// Raw search form input.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchForm {
    pub origin: String,
    pub destination: String,
    /// `YYYY-MM-DD`, or empty for any date.
    pub date: String,
}

impl SearchForm {
    /// Validate and normalize into query parameters. Airport codes must be
    /// exactly three letters and are uppercased.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Validation`] naming the first bad field.
    pub fn validate(&self) -> Result<SearchFlightsParams, ClientError> {
        let origin = airport_code("origin", "Origin", &self.origin)?;
        let destination = airport_code("destination", "Destination", &self.destination)?;
        let date = match self.date.trim() {
            "" => None,
            raw => Some(
                Date::parse(raw, format_description!("[year]-[month]-[day]"))
                    .map_err(|_| ClientError::validation("date", "Date must be YYYY-MM-DD"))?,
            ),
        };
        Ok(SearchFlightsParams {
            origin: Some(origin),
            destination: Some(destination),
            date,
        })
    }
}

fn airport_code(field: &'static str, label: &str, raw: &str) -> Result<String, ClientError> {
    let code = raw.trim();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ClientError::validation(field, format!("{label} must be 3 characters")));
    }
    Ok(code.to_ascii_uppercase())
}

#[derive(Clone, Debug, Default)]
pub struct HomePage {
    pub last_search: Option<SearchFlightsParams>,
    /// `None` until a search has completed.
    pub flights: Option<Vec<Flight>>,
    pub status: PageStatus,
}

impl HomePage {
    /// Validate `form` and run the search.
    ///
    /// # Errors
    ///
    /// Validation errors are returned before any request; request errors are
    /// recorded in `status` and returned.
    pub async fn search(
        &mut self,
        api: &ApiClient,
        view: &ViewHandle,
        form: &SearchForm,
    ) -> Result<ActionOutcome, ClientError> {
        let params = form.validate().map_err(|e| self.status.reject(e))?;
        self.status.begin();
        let result = api.search_flights(&params).await;
        let Some(flights) = self.status.settle(view, result)? else {
            return Ok(ActionOutcome::Discarded);
        };
        self.flights = Some(flights);
        self.last_search = Some(params);
        Ok(ActionOutcome::Applied)
    }
}
