use crate::db::admin_repository;
use crate::error::AppError;
use crate::operations::normalize::require_text;
use rusqlite::Connection;
use tracing::{info, warn};

/// Login state of the current session. Passed explicitly to whatever needs
/// to know it; there is no global flag.
///
/// Sessions do not expire and failed attempts are not counted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthGate {
    #[default]
    Anonymous,
    Authenticated { username: String },
}

impl AuthGate {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthGate::Authenticated { .. })
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            AuthGate::Authenticated { username } => Some(username),
            AuthGate::Anonymous => None,
        }
    }

    /// Checks the pair against the stored credential by exact string
    /// equality. On failure the gate stays (or becomes) `Anonymous`.
    pub fn login(&mut self, conn: &Connection, username: &str, password: &str) -> Result<(), AppError> {
        let credential = admin_repository::get_credential(conn)?;
        if credential.matches(username, password) {
            info!(username, "admin logged in");
            *self = AuthGate::Authenticated {
                username: username.to_string(),
            };
            Ok(())
        } else {
            warn!(username, "failed admin login");
            *self = AuthGate::Anonymous;
            Err(AppError::AuthFailed)
        }
    }

    pub fn logout(&mut self) {
        if let AuthGate::Authenticated { username } = self {
            info!(username = username.as_str(), "admin logged out");
        }
        *self = AuthGate::Anonymous;
    }

    /// Guard for admin-only actions.
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_authenticated() {
            Ok(())
        } else {
            Err(AppError::AuthFailed)
        }
    }
}

pub fn update_account(conn: &Connection, new_username: &str, new_password: &str) -> Result<(), AppError> {
    let username = require_text("username", new_username)?;
    // Passwords are taken verbatim; only emptiness is rejected.
    if new_password.is_empty() {
        return Err(AppError::empty("password"));
    }
    admin_repository::update_credential(conn, username, new_password)?;
    info!(username, "admin account updated");
    Ok(())
}
