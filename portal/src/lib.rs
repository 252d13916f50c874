//! # portal
//!
//! Client library for the airport booking and operations API.
//!
//! The crate holds the session model (token decoding, persisted session,
//! route guards), a typed REST client that signs every request with the
//! current bearer token, and page controllers that drive each screen from
//! the API's data contracts. The `cli` crate is the front end built on it.

pub mod app;
pub mod config;
pub mod net;
pub mod pages;
pub mod routes;
pub mod state;
pub mod util;

#[cfg(test)]
pub(crate) mod test_support;

pub use app::App;
pub use config::ClientConfig;
pub use net::api::{ApiClient, ClientEvent};
pub use net::error::ClientError;
pub use routes::{Navigator, Route, ViewHandle};
pub use state::session::{Session, SessionStore};
