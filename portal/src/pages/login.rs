//! Sign-in and registration.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use super::PageStatus;
use crate::app::App;
use crate::net::error::ClientError;
use crate::net::types::{Identity, LoginRequest, RegisterRequest};
use crate::routes::Route;

const MIN_PASSWORD_LEN: usize = 6;

fn require_email(raw: &str) -> Result<String, ClientError> {
    let email = raw.trim();
    let well_formed = email.split_once('@').is_some_and(|(user, domain)| {
        !user.is_empty() && domain.contains('.') && !domain.starts_with('.')
    });
    if !well_formed {
        return Err(ClientError::validation("email", "Enter a valid email address"));
    }
    Ok(email.to_owned())
}

#[derive(Clone, Debug, Default)]
pub struct LoginPage {
    pub email: String,
    pub password: String,
    pub status: PageStatus,
}

impl LoginPage {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            status: PageStatus::default(),
        }
    }

    /// Exchange credentials for a token, install the session, and go home.
    ///
    /// # Errors
    ///
    /// Validation, request, token-decode, or storage failures. A token that
    /// cannot be decoded leaves the app signed out.
    pub async fn submit(&mut self, app: &mut App) -> Result<Identity, ClientError> {
        let email = require_email(&self.email).map_err(|e| self.status.reject(e))?;
        if self.password.is_empty() {
            return Err(self
                .status
                .reject(ClientError::validation("password", "Password is required")));
        }

        self.status.begin();
        let result = app
            .api()
            .login(&LoginRequest {
                email,
                password: self.password.clone(),
            })
            .await;
        self.status.loading = false;

        let identity = result
            .and_then(|resp| {
                app.session_store()
                    .login_with_token(&resp.token)
                    .map_err(ClientError::from)
            })
            .map_err(|e| self.status.reject(e))?;
        tracing::info!(subject = %identity.subject_id, role = identity.role.as_str(), "signed in");

        self.password.clear();
        self.status.error = None;
        app.navigate(Route::Home);
        Ok(identity)
    }
}

#[derive(Clone, Debug, Default)]
pub struct RegisterPage {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub status: PageStatus,
}

impl RegisterPage {
    /// Validate and build the request body.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Validation`] naming the first bad field.
    pub fn validate(&self) -> Result<RegisterRequest, ClientError> {
        let full_name = self.full_name.trim();
        if full_name.is_empty() {
            return Err(ClientError::validation("full_name", "Full name is required"));
        }
        let email = require_email(&self.email)?;
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ClientError::validation(
                "password",
                format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
            ));
        }
        Ok(RegisterRequest {
            full_name: full_name.to_owned(),
            email,
            password: self.password.clone(),
        })
    }

    /// Create the account and move to the login view.
    ///
    /// # Errors
    ///
    /// Validation or request failures.
    pub async fn submit(&mut self, app: &mut App) -> Result<(), ClientError> {
        let req = self.validate().map_err(|e| self.status.reject(e))?;
        self.status.begin();
        let result = app.api().register(&req).await;
        self.status.loading = false;
        let resp = result.map_err(|e| self.status.reject(e))?;

        tracing::info!(message = %resp.message, "account registered");
        self.password.clear();
        self.status.error = None;
        self.status.notice = Some("Registration successful! Please login.".into());
        app.navigate(Route::Login);
        Ok(())
    }
}
