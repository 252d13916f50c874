//! Current authentication state with write-through persistence.
//!
//! ARCHITECTURE
//! ============
//! `SessionStore` is the single owner of the signed-in state. It is shared as
//! `Arc<SessionStore>` between the API client (which reads the token and
//! clears it on 401) and the composition root (which sets it on login).
//! Token and identity are stored as one JSON record under [`SESSION_KEY`],
//! so a durable write can never leave one without the other.
//!
//! Every mutation writes storage first and memory second. A failed durable
//! write leaves the previous session in place; a reload therefore always
//! observes exactly what the last successful mutation produced.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::storage::{SessionStorage, StorageError};
use crate::net::token::{self, DecodeError};
use crate::net::types::Identity;

/// Storage key holding the persisted session record.
pub const SESSION_KEY: &str = "auth-storage";

/// Signed-in state. An identity exists only alongside the token it was
/// decoded from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated { token: String, identity: Identity },
}

impl Session {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated { token, .. } => Some(token),
        }
    }

    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated { identity, .. } => Some(identity),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct PersistedSession {
    token: String,
    identity: Identity,
}

/// Session context shared by the API client, guards and pages.
pub struct SessionStore {
    current: RwLock<Session>,
    storage: Box<dyn SessionStorage>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.current_session().is_authenticated())
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Reconstruct the session persisted in `storage`.
    ///
    /// Records that fail to parse, whose token no longer decodes to the
    /// stored identity, or whose token has expired are removed and the store
    /// starts anonymous. Storage read failures also start anonymous.
    pub fn open(storage: impl SessionStorage + 'static) -> Self {
        Self::open_at(storage, OffsetDateTime::now_utc())
    }

    /// [`open`](Self::open) with an explicit clock for the expiry check.
    pub fn open_at(storage: impl SessionStorage + 'static, now: OffsetDateTime) -> Self {
        let storage: Box<dyn SessionStorage> = Box::new(storage);
        let restored = match storage.load(SESSION_KEY) {
            Ok(Some(raw)) => match restore(&raw, now) {
                Ok(session) => Some(session),
                Err(reason) => {
                    tracing::warn!(%reason, "discarding persisted session");
                    if let Err(e) = storage.remove(SESSION_KEY) {
                        tracing::warn!(error = %e, "failed to remove discarded session");
                    }
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "session storage unreadable; starting signed out");
                None
            }
        };

        Self {
            current: RwLock::new(restored.unwrap_or_default()),
            storage,
        }
    }

    /// Snapshot of the current session. Never touches storage.
    #[must_use]
    pub fn current_session(&self) -> Session {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Current bearer token, if signed in.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .token()
            .map(str::to_owned)
    }

    /// Persist and install a new session.
    ///
    /// # Errors
    ///
    /// Returns an error if the durable write fails; the previous session
    /// (in memory and on disk) is unchanged.
    pub fn set_session(&self, token: String, identity: Identity) -> Result<(), StorageError> {
        let record = PersistedSession { token, identity };
        let raw = serde_json::to_string(&record)?;
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        self.storage.save(SESSION_KEY, &raw)?;
        *current = Session::Authenticated {
            token: record.token,
            identity: record.identity,
        };
        tracing::debug!("session stored");
        Ok(())
    }

    /// Decode `token` and install it with its identity.
    ///
    /// # Errors
    ///
    /// A token that fails to decode leaves the store signed out and returns
    /// [`LoginTokenError::Decode`]; a storage failure returns
    /// [`LoginTokenError::Storage`].
    pub fn login_with_token(&self, token: &str) -> Result<Identity, LoginTokenError> {
        let identity = match token::decode(token) {
            Ok(identity) => identity,
            Err(e) => {
                self.clear_session()?;
                return Err(e.into());
            }
        };
        self.set_session(token.trim().to_owned(), identity.clone())?;
        Ok(identity)
    }

    /// Remove the session from storage and memory.
    ///
    /// Memory is cleared even when the durable removal fails, so the running
    /// client never keeps using a session it was told to drop.
    ///
    /// # Errors
    ///
    /// Returns the storage error after clearing memory.
    pub fn clear_session(&self) -> Result<(), StorageError> {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let removed = self.storage.remove(SESSION_KEY);
        *current = Session::Anonymous;
        tracing::debug!("session cleared");
        removed
    }
}

/// Failure of [`SessionStore::login_with_token`].
#[derive(Debug, thiserror::Error)]
pub enum LoginTokenError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

fn restore(raw: &str, now: OffsetDateTime) -> Result<Session, String> {
    let record: PersistedSession = serde_json::from_str(raw).map_err(|e| e.to_string())?;
    let decoded =
        token::decode_at(&record.token, record.identity.issued_at).map_err(|e| e.to_string())?;
    if decoded != record.identity {
        return Err("stored identity does not match its token".into());
    }
    if record.identity.is_expired(now) {
        return Err("token expired".into());
    }
    Ok(Session::Authenticated {
        token: record.token,
        identity: record.identity,
    })
}
