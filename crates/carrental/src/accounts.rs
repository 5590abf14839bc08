//! Admin and user accounts.
//!
//! Credentials are plaintext `<username> <password>` lines, one store per
//! role. Registration rejects a username already present in the role's store;
//! login takes the first record matching both fields exactly.

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::record::{Credential, Record};
use crate::session::{Role, Session};
use crate::storage::{RecordStore, StoreName};

/// Registration and login against the credential stores.
#[derive(Debug, Clone, Copy)]
pub struct Accounts<'a> {
    store: &'a dyn RecordStore,
}

impl<'a> Accounts<'a> {
    /// Create an account service over `store`.
    #[must_use]
    pub fn new(store: &'a dyn RecordStore) -> Self {
        Self { store }
    }

    /// Register a new credential for `role`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyExists`] if a record in the role's store has
    /// this username, [`Error::InvalidField`] for unstorable values, or a
    /// store error.
    pub fn register(&self, role: Role, username: &str, password: &str) -> Result<()> {
        let credential = Credential::new(username, password)?;
        let store = StoreName::credentials(role);

        self.store.modify(store, &mut |lines| {
            // Only the first field matters here, so short lines still count.
            let taken = lines
                .iter()
                .any(|line| line.split_whitespace().next() == Some(username));
            if taken {
                return Err(Error::AlreadyExists {
                    role,
                    username: username.to_string(),
                });
            }
            lines.push(credential.to_line());
            Ok(())
        })?;

        info!(%role, username, "Registered account");
        Ok(())
    }

    /// Log in, returning a session for `role`.
    ///
    /// Records with fewer than two fields are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCredentials`] when no record matches, or a
    /// store error.
    pub fn authenticate(&self, role: Role, username: &str, password: &str) -> Result<Session> {
        let lines = self.store.read_all(StoreName::credentials(role))?;
        let found = lines
            .iter()
            .filter_map(|line| Credential::parse_line(line).ok())
            .find(|credential| credential.matches(username, password));

        if let Some(credential) = found {
            info!(%role, username, "Logged in");
            Ok(Session::new(role, credential.username))
        } else {
            warn!(%role, username, "Login rejected");
            Err(Error::InvalidCredentials { role })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteStore;

    #[test]
    fn test_register_then_authenticate() {
        let store = SqliteStore::open_in_memory().unwrap();
        let accounts = Accounts::new(&store);

        accounts.register(Role::User, "alice", "pw").unwrap();
        let session = accounts.authenticate(Role::User, "alice", "pw").unwrap();

        assert_eq!(session.role(), Role::User);
        assert_eq!(session.username(), "alice");
    }

    #[test]
    fn test_register_duplicate_keeps_original_password() {
        let store = SqliteStore::open_in_memory().unwrap();
        let accounts = Accounts::new(&store);

        accounts.register(Role::Admin, "alice", "pw").unwrap();
        let err = accounts.register(Role::Admin, "alice", "pw2").unwrap_err();

        assert!(matches!(err, Error::AlreadyExists { role: Role::Admin, .. }));
        assert_eq!(
            store.read_all(StoreName::Admins).unwrap(),
            vec!["alice pw".to_string()]
        );
        assert!(accounts.authenticate(Role::Admin, "alice", "pw").is_ok());
        assert!(accounts.authenticate(Role::Admin, "alice", "pw2").is_err());
    }

    #[test]
    fn test_wrong_password_is_invalid() {
        let store = SqliteStore::open_in_memory().unwrap();
        let accounts = Accounts::new(&store);
        accounts.register(Role::User, "alice", "pw").unwrap();

        assert!(matches!(
            accounts.authenticate(Role::User, "alice", "wrong"),
            Err(Error::InvalidCredentials { role: Role::User })
        ));
    }

    #[test]
    fn test_roles_are_disjoint() {
        let store = SqliteStore::open_in_memory().unwrap();
        let accounts = Accounts::new(&store);
        accounts.register(Role::Admin, "root", "pw").unwrap();

        assert!(accounts.authenticate(Role::User, "root", "pw").is_err());
        accounts.register(Role::User, "root", "other").unwrap();
        assert!(accounts.authenticate(Role::User, "root", "other").is_ok());
    }

    #[test]
    fn test_authenticate_first_match_skips_short_records() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .write_all(
                StoreName::Users,
                &[
                    "ghost".to_string(),
                    "bob pw extra".to_string(),
                    "bob pw".to_string(),
                ],
            )
            .unwrap();
        let accounts = Accounts::new(&store);

        let session = accounts.authenticate(Role::User, "bob", "pw").unwrap();
        assert_eq!(session.username(), "bob");
    }

    #[test]
    fn test_register_rejects_short_record_username() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.append(StoreName::Users, "ghost").unwrap();
        let accounts = Accounts::new(&store);

        assert!(matches!(
            accounts.register(Role::User, "ghost", "pw"),
            Err(Error::AlreadyExists { .. })
        ));
    }

    #[test]
    fn test_register_rejects_whitespace() {
        let store = SqliteStore::open_in_memory().unwrap();
        let accounts = Accounts::new(&store);

        assert!(matches!(
            accounts.register(Role::User, "alice", "two words"),
            Err(Error::InvalidField { field: "password", .. })
        ));
        assert!(store.read_all(StoreName::Users).unwrap().is_empty());
    }
}
