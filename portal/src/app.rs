//! Composition root: storage, session, API client and navigator.
//!
//! The API client reports forced sign-outs as [`ClientEvent`]s; `App` drains
//! them and moves the navigator to the login view. Nothing else in the crate
//! navigates on its own.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::config::ClientConfig;
use crate::net::api::{ApiClient, ClientEvent};
use crate::net::error::ClientError;
use crate::routes::{Navigator, Route, ViewHandle};
use crate::state::session::{Session, SessionStore};
use crate::state::storage::{FileStorage, SessionStorage};

pub struct App {
    session: Arc<SessionStore>,
    api: ApiClient,
    navigator: Navigator,
    events: UnboundedReceiver<ClientEvent>,
}

impl App {
    /// Build the app with the session persisted under `config.session_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::with_storage(config, FileStorage::new(&config.session_dir))
    }

    /// Build the app over an arbitrary storage backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn with_storage(
        config: &ClientConfig,
        storage: impl SessionStorage + 'static,
    ) -> Result<Self, ClientError> {
        let session = Arc::new(SessionStore::open(storage));
        let (tx, rx) = mpsc::unbounded_channel();
        let api = ApiClient::new(config, session.clone(), tx)?;
        if let Some(identity) = session.current_session().identity() {
            tracing::info!(
                subject = %identity.subject_id,
                role = identity.role.as_str(),
                "session restored"
            );
        }
        Ok(Self {
            session,
            api,
            navigator: Navigator::new(),
            events: rx,
        })
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    #[must_use]
    pub fn session_store(&self) -> &Arc<SessionStore> {
        &self.session
    }

    #[must_use]
    pub fn session(&self) -> Session {
        self.session.current_session()
    }

    #[must_use]
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    #[must_use]
    pub fn current_route(&self) -> Route {
        self.navigator.current()
    }

    /// Apply pending client events, then navigate through `target`'s guard.
    pub fn navigate(&mut self, target: Route) -> ViewHandle {
        self.process_events();
        let session = self.session.current_session();
        self.navigator.navigate(target, &session)
    }

    /// Drain client events. Each forced sign-out moves to the login view
    /// once. Returns the number of events handled.
    pub fn process_events(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.events.try_recv() {
            match event {
                ClientEvent::Unauthorized => {
                    tracing::info!("session ended by server; returning to login");
                    self.navigator.navigate(Route::Login, &Session::Anonymous);
                }
            }
            handled += 1;
        }
        handled
    }

    /// Explicit sign-out: drop the session and show the login view.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted session could not be removed. The
    /// in-memory session is gone either way.
    pub fn logout(&mut self) -> Result<ViewHandle, ClientError> {
        let cleared = self.session.clear_session();
        let view = self.navigator.navigate(Route::Login, &Session::Anonymous);
        cleared?;
        Ok(view)
    }
}
