//! Talking to the booking backend: wire types, token decoding, the REST
//! client, and its error taxonomy.

pub mod api;
pub mod error;
pub mod token;
pub mod types;
