//! The rental desk: role-checked entry points over the services.
//!
//! [`RentalDesk`] owns the record store and hands out short-lived service
//! views. Operations that belong to a role take the caller's [`Session`] and
//! fail with [`Error::Forbidden`](crate::Error::Forbidden) for the other role.

use crate::accounts::Accounts;
use crate::config::Config;
use crate::error::Result;
use crate::inventory::Inventory;
use crate::record::{AuditEntry, Car};
use crate::rental::Rentals;
use crate::seed;
use crate::session::{Role, Session};
use crate::storage::{self, RecordStore};

/// Application state for one process.
#[derive(Debug)]
pub struct RentalDesk {
    store: Box<dyn RecordStore>,
    config: Config,
}

impl RentalDesk {
    /// Open the store configured in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be opened.
    pub fn open(config: Config) -> Result<Self> {
        let store = storage::open_store(&config)?;
        Ok(Self::with_store(store, config))
    }

    /// Wrap an already opened store.
    #[must_use]
    pub fn with_store(store: Box<dyn RecordStore>, config: Config) -> Self {
        Self { store, config }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The underlying record store.
    #[must_use]
    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }

    /// Inventory view honoring the configured removal rule.
    #[must_use]
    pub fn inventory(&self) -> Inventory<'_> {
        Inventory::new(self.store.as_ref(), self.config.inventory.removal)
    }

    /// Rental state machine view.
    #[must_use]
    pub fn rentals(&self) -> Rentals<'_> {
        Rentals::new(self.store.as_ref())
    }

    /// Account service view.
    #[must_use]
    pub fn accounts(&self) -> Accounts<'_> {
        Accounts::new(self.store.as_ref())
    }

    /// Create missing stores and merge the sample cars if enabled.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    pub fn bootstrap(&self) -> Result<usize> {
        seed::bootstrap(self.store(), &self.inventory(), self.config.seed.enabled)
    }

    /// Register an account.
    ///
    /// # Errors
    ///
    /// See [`Accounts::register`].
    pub fn signup(&self, role: Role, username: &str, password: &str) -> Result<()> {
        self.accounts().register(role, username, password)
    }

    /// Log in.
    ///
    /// # Errors
    ///
    /// See [`Accounts::authenticate`].
    pub fn login(&self, role: Role, username: &str, password: &str) -> Result<Session> {
        self.accounts().authenticate(role, username, password)
    }

    /// Admin: add a car.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for non-admins, otherwise see [`Inventory::add_car`].
    pub fn add_car(
        &self,
        session: &Session,
        model: &str,
        kind: &str,
        year: i32,
        rate: f64,
    ) -> Result<Car> {
        session.require(Role::Admin)?;
        self.inventory().add_car(model, kind, year, rate)
    }

    /// Admin: remove cars by model.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for non-admins, otherwise see [`Inventory::remove_car`].
    pub fn remove_car(&self, session: &Session, model: &str) -> Result<usize> {
        session.require(Role::Admin)?;
        self.inventory().remove_car(model)
    }

    /// Admin: list cars, optionally only the available ones.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for non-admins, or a store or parse error.
    pub fn cars(&self, session: &Session, available_only: bool) -> Result<Vec<Car>> {
        session.require(Role::Admin)?;
        if available_only {
            self.inventory().list_available()
        } else {
            self.inventory().list_all()
        }
    }

    /// Admin: the rental log.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for non-admins, or a store or parse error.
    pub fn waiting_log(&self, session: &Session) -> Result<Vec<AuditEntry>> {
        session.require(Role::Admin)?;
        self.rentals().waiting_log()
    }

    /// Admin: the return log.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for non-admins, or a store or parse error.
    pub fn returned_log(&self, session: &Session) -> Result<Vec<AuditEntry>> {
        session.require(Role::Admin)?;
        self.rentals().returned_log()
    }

    /// User: rent a car as the session's user.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for non-users, otherwise see [`Rentals::rent`].
    pub fn rent(&self, session: &Session, model: &str) -> Result<usize> {
        session.require(Role::User)?;
        self.rentals().rent(model, session.username())
    }

    /// User: return a car as the session's user.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for non-users, otherwise see [`Rentals::return_car`].
    pub fn return_car(&self, session: &Session, model: &str) -> Result<usize> {
        session.require(Role::User)?;
        self.rentals().return_car(model, session.username())
    }

    /// User: every car currently rented.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for non-users, or a store or parse error.
    pub fn bookings(&self, session: &Session) -> Result<Vec<Car>> {
        session.require(Role::User)?;
        self.inventory().list_rented()
    }
}
