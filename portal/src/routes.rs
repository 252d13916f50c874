//! Views, route guards, and the navigator.
//!
//! DESIGN
//! ======
//! Guards are pure functions of the current [`Session`]; they run before a
//! view is entered and either let navigation proceed or name a redirect.
//! The decoded role is only used to decide which views to offer. The server
//! enforces the real permission on every request.
//!
//! Each entered view gets a [`ViewHandle`]. Moving to another view makes all
//! earlier handles stale, which is how pages drop results of requests that
//! finish after the user has navigated away.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::state::session::Session;

// =============================================================================
// ROUTES
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
    Register,
    Bookings,
    BookFlight { flight_id: i64 },
    Profile,
    Admin,
}

impl Route {
    /// Guard that must pass before this route renders.
    #[must_use]
    pub fn guard(self) -> Guard {
        match self {
            Self::Home | Self::Login | Self::Register => Guard::Public,
            Self::Bookings | Self::BookFlight { .. } | Self::Profile => Guard::Authenticated,
            Self::Admin => Guard::Role,
        }
    }

    #[must_use]
    pub fn path(self) -> String {
        match self {
            Self::Home => "/".into(),
            Self::Login => "/login".into(),
            Self::Register => "/register".into(),
            Self::Bookings => "/bookings".into(),
            Self::BookFlight { flight_id } => format!("/book/{flight_id}"),
            Self::Profile => "/profile".into(),
            Self::Admin => "/admin".into(),
        }
    }

    /// Parse a path produced by [`path`](Self::path). Trailing slashes are
    /// ignored.
    #[must_use]
    pub fn parse(path: &str) -> Option<Self> {
        let trimmed = path.trim().trim_end_matches('/');
        match trimmed {
            "" => Some(Self::Home),
            "/login" => Some(Self::Login),
            "/register" => Some(Self::Register),
            "/bookings" => Some(Self::Bookings),
            "/profile" => Some(Self::Profile),
            "/admin" => Some(Self::Admin),
            other => other
                .strip_prefix("/book/")
                .and_then(|id| id.parse().ok())
                .map(|flight_id| Self::BookFlight { flight_id }),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

// =============================================================================
// GUARDS
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Guard {
    Public,
    Authenticated,
    /// Signed in with a staff or admin role.
    Role,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardOutcome {
    Proceed,
    Redirect(Route),
}

/// Passes iff signed in; otherwise sends the user to login.
#[must_use]
pub fn authenticated_guard(session: &Session) -> GuardOutcome {
    if session.is_authenticated() {
        GuardOutcome::Proceed
    } else {
        GuardOutcome::Redirect(Route::Login)
    }
}

/// Passes iff signed in as staff or admin. Signed-out users go to login;
/// signed-in users without the role go home.
#[must_use]
pub fn role_guard(session: &Session) -> GuardOutcome {
    match session.identity() {
        None => GuardOutcome::Redirect(Route::Login),
        Some(identity) if identity.role.is_operator() => GuardOutcome::Proceed,
        Some(_) => GuardOutcome::Redirect(Route::Home),
    }
}

impl Guard {
    #[must_use]
    pub fn check(self, session: &Session) -> GuardOutcome {
        match self {
            Self::Public => GuardOutcome::Proceed,
            Self::Authenticated => authenticated_guard(session),
            Self::Role => role_guard(session),
        }
    }
}

/// Views offered in the navigation bar for `session`.
#[must_use]
pub fn nav_links(session: &Session) -> Vec<Route> {
    match session.identity() {
        None => vec![Route::Home, Route::Login, Route::Register],
        Some(identity) => {
            let mut links = vec![Route::Home, Route::Bookings, Route::Profile];
            if identity.role.is_operator() {
                links.push(Route::Admin);
            }
            links
        }
    }
}

// =============================================================================
// NAVIGATOR
// =============================================================================

/// A completed navigation: what was asked for and where the user landed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavigationEvent {
    pub requested: Route,
    pub landed: Route,
}

impl NavigationEvent {
    #[must_use]
    pub fn was_redirected(&self) -> bool {
        self.requested != self.landed
    }
}

/// Proof that a view is still the one on screen.
#[derive(Clone, Debug)]
pub struct ViewHandle {
    generation: u64,
    live: Arc<AtomicU64>,
}

impl ViewHandle {
    /// False once the navigator has moved to another view.
    #[must_use]
    pub fn is_current(&self) -> bool {
        self.live.load(Ordering::Acquire) == self.generation
    }
}

/// Tracks the current view and applies guards on every navigation.
#[derive(Debug)]
pub struct Navigator {
    current: Route,
    generation: Arc<AtomicU64>,
    history: Vec<NavigationEvent>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: Route::Home,
            generation: Arc::new(AtomicU64::new(0)),
            history: Vec::new(),
        }
    }

    #[must_use]
    pub fn current(&self) -> Route {
        self.current
    }

    #[must_use]
    pub fn history(&self) -> &[NavigationEvent] {
        &self.history
    }

    /// Handle for the view currently on screen.
    #[must_use]
    pub fn handle(&self) -> ViewHandle {
        ViewHandle {
            generation: self.generation.load(Ordering::Acquire),
            live: self.generation.clone(),
        }
    }

    /// Navigate to `target`, following at most one guard redirect, and
    /// return a handle for the view that was entered.
    ///
    /// Redirect targets are public views, so a second guard never fires.
    pub fn navigate(&mut self, target: Route, session: &Session) -> ViewHandle {
        let landed = match target.guard().check(session) {
            GuardOutcome::Proceed => target,
            GuardOutcome::Redirect(to) => {
                tracing::debug!(requested = %target, redirect = %to, "navigation redirected");
                to
            }
        };
        self.current = landed;
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.history.push(NavigationEvent { requested: target, landed });
        self.handle()
    }
}
