//! Login sessions.
//!
//! A [`Session`] is the explicit `{role, username}` value produced by a
//! successful login. Role-gated operations take a session reference instead of
//! consulting any process-wide state.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Which credential store, and which set of operations, a login belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Manages the car inventory and views the audit logs.
    Admin,
    /// Rents and returns cars.
    User,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::User => write!(f, "user"),
        }
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            other => Err(Error::invalid_field(
                "role",
                format!("expected 'admin' or 'user', got '{other}'"),
            )),
        }
    }
}

/// An authenticated login.
///
/// Only [`Accounts::authenticate`](crate::accounts::Accounts::authenticate) creates
/// sessions; [`Session::logout`] consumes one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    role: Role,
    username: String,
}

impl Session {
    pub(crate) fn new(role: Role, username: impl Into<String>) -> Self {
        Self {
            role,
            username: username.into(),
        }
    }

    /// The role this session was opened for.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// The logged-in username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Check that this session holds `required`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Forbidden`] when the roles differ.
    pub fn require(&self, required: Role) -> Result<()> {
        if self.role == required {
            Ok(())
        } else {
            Err(Error::Forbidden {
                required,
                actual: self.role,
            })
        }
    }

    /// End the session.
    pub fn logout(self) {
        tracing::debug!(role = %self.role, username = %self.username, "Logged out");
    }
}
