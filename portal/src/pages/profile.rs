//! Read-only account summary built from the session.

use crate::net::types::Role;
use crate::state::session::Session;
use crate::util::format::format_date;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfileView {
    pub full_name: String,
    pub email: String,
    pub role: Role,
    /// Token issue date, e.g. "Mar 1, 2026".
    pub signed_in_since: String,
}

impl ProfileView {
    /// `None` when signed out.
    #[must_use]
    pub fn from_session(session: &Session) -> Option<Self> {
        let identity = session.identity()?;
        Some(Self {
            full_name: identity.display_name.clone(),
            email: identity.email.clone(),
            role: identity.role,
            signed_in_since: format_date(identity.issued_at),
        })
    }
}
