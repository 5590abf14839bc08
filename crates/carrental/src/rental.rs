//! Rent and return transitions.
//!
//! A car moves `Available -> Rented` on rent and `Rented -> Available` on
//! return. Every record with the requested model in the source state is
//! transitioned, and one audit entry is appended per transitioned record.
//! When nothing matches, the car store is left untouched and no audit entry
//! is written.

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::record::{
    parse_all, validate_token, AuditAction, AuditEntry, Car, CarStatus, Record,
};
use crate::storage::{RecordStore, StoreName};

/// Rental state machine over the car store and the two audit logs.
#[derive(Debug, Clone, Copy)]
pub struct Rentals<'a> {
    store: &'a dyn RecordStore,
}

impl<'a> Rentals<'a> {
    /// Create a rental service over `store`.
    #[must_use]
    pub fn new(store: &'a dyn RecordStore) -> Self {
        Self { store }
    }

    /// Rent every available car with exactly this model on behalf of `actor`.
    ///
    /// Returns the number of records that became `Rented`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAvailable`] when no available car has this model.
    pub fn rent(&self, model: &str, actor: &str) -> Result<usize> {
        self.transition(model, actor, AuditAction::Rented)
    }

    /// Return every rented car with exactly this model on behalf of `actor`.
    ///
    /// Returns the number of records that became `Available`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotRented`] when no rented car has this model.
    pub fn return_car(&self, model: &str, actor: &str) -> Result<usize> {
        self.transition(model, actor, AuditAction::Returned)
    }

    /// Rental entries in the order they were written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedRecord`] or a store error.
    pub fn waiting_log(&self) -> Result<Vec<AuditEntry>> {
        self.log(AuditAction::Rented)
    }

    /// Return entries in the order they were written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedRecord`] or a store error.
    pub fn returned_log(&self) -> Result<Vec<AuditEntry>> {
        self.log(AuditAction::Returned)
    }

    fn log(&self, action: AuditAction) -> Result<Vec<AuditEntry>> {
        let store = action.store();
        let lines = self.store.read_all(store)?;
        parse_all(store, &lines)
    }

    fn transition(&self, model: &str, actor: &str, action: AuditAction) -> Result<usize> {
        validate_token("model", model)?;
        validate_token("actor", actor)?;

        let (from, to) = match action {
            AuditAction::Rented => (CarStatus::Available, CarStatus::Rented),
            AuditAction::Returned => (CarStatus::Rented, CarStatus::Available),
        };
        let mut moved = 0;

        let result = self.store.modify(StoreName::Cars, &mut |lines| {
            let mut cars = parse_all::<Car>(StoreName::Cars, lines)?;
            moved = 0;
            for car in cars
                .iter_mut()
                .filter(|car| car.model == model && car.status == from)
            {
                car.status = to;
                moved += 1;
            }
            if moved == 0 {
                return Err(unmatched(action, model));
            }
            *lines = cars.iter().map(Record::to_line).collect();
            Ok(())
        });

        if let Err(err) = result {
            if err.is_user_error() {
                warn!(model, actor, "Rejected {action} request: {err}");
            }
            return Err(err);
        }

        let entry = AuditEntry::new(actor, action, model).to_line();
        for _ in 0..moved {
            self.store.append(action.store(), &entry)?;
        }
        info!(model, actor, records = moved, "Car {action}");
        Ok(moved)
    }
}

fn unmatched(action: AuditAction, model: &str) -> Error {
    let model = model.to_string();
    match action {
        AuditAction::Rented => Error::NotAvailable { model },
        AuditAction::Returned => Error::NotRented { model },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RemovalMatch;
    use crate::inventory::Inventory;
    use crate::storage::{FlatFileStore, SqliteStore};

    #[test]
    fn test_rent_then_return_round_trip() {
        let store = SqliteStore::open_in_memory().unwrap();
        let inventory = Inventory::new(&store, RemovalMatch::Prefix);
        let rentals = Rentals::new(&store);
        inventory.add_car("Civic", "Sedan", 2018, 10000.0).unwrap();

        assert_eq!(rentals.rent("Civic", "bob").unwrap(), 1);
        assert_eq!(inventory.find("Civic").unwrap().status, CarStatus::Rented);

        assert_eq!(rentals.return_car("Civic", "bob").unwrap(), 1);
        assert_eq!(inventory.find("Civic").unwrap().status, CarStatus::Available);

        assert_eq!(
            rentals.waiting_log().unwrap(),
            vec![AuditEntry::new("bob", AuditAction::Rented, "Civic")]
        );
        assert_eq!(
            rentals.returned_log().unwrap(),
            vec![AuditEntry::new("bob", AuditAction::Returned, "Civic")]
        );
    }

    #[test]
    fn test_rent_unavailable_is_noop() {
        let store = SqliteStore::open_in_memory().unwrap();
        let inventory = Inventory::new(&store, RemovalMatch::Prefix);
        let rentals = Rentals::new(&store);
        inventory.add_car("Civic", "Sedan", 2018, 10000.0).unwrap();
        rentals.rent("Civic", "bob").unwrap();
        let before = store.read_all(StoreName::Cars).unwrap();

        let err = rentals.rent("Civic", "carol").unwrap_err();

        assert!(matches!(err, Error::NotAvailable { ref model } if model == "Civic"));
        assert_eq!(store.read_all(StoreName::Cars).unwrap(), before);
        assert_eq!(rentals.waiting_log().unwrap().len(), 1);
    }

    #[test]
    fn test_rent_unknown_model() {
        let store = SqliteStore::open_in_memory().unwrap();
        let rentals = Rentals::new(&store);

        assert!(matches!(
            rentals.rent("Tesla", "bob"),
            Err(Error::NotAvailable { .. })
        ));
        assert!(rentals.waiting_log().unwrap().is_empty());
    }

    #[test]
    fn test_return_not_rented_is_noop() {
        let store = SqliteStore::open_in_memory().unwrap();
        let inventory = Inventory::new(&store, RemovalMatch::Prefix);
        let rentals = Rentals::new(&store);
        inventory.add_car("City", "Sedan", 2019, 11000.0).unwrap();

        assert!(matches!(
            rentals.return_car("City", "bob"),
            Err(Error::NotRented { .. })
        ));
        assert!(rentals.returned_log().unwrap().is_empty());
        assert!(inventory.find("City").unwrap().is_available());
    }

    #[test]
    fn test_rent_transitions_every_duplicate() {
        let store = SqliteStore::open_in_memory().unwrap();
        let inventory = Inventory::new(&store, RemovalMatch::Prefix);
        let rentals = Rentals::new(&store);
        inventory.add_car("Alto", "Hatchback", 2020, 5000.0).unwrap();
        inventory.add_car("Yaris", "Sedan", 2022, 13000.0).unwrap();
        inventory.add_car("Alto", "Hatchback", 2021, 5500.0).unwrap();

        assert_eq!(rentals.rent("Alto", "bob").unwrap(), 2);

        assert!(inventory
            .list_all()
            .unwrap()
            .iter()
            .filter(|car| car.model == "Alto")
            .all(|car| car.status == CarStatus::Rented));
        assert_eq!(rentals.waiting_log().unwrap().len(), 2);
    }

    #[test]
    fn test_rent_requires_exact_model() {
        let store = SqliteStore::open_in_memory().unwrap();
        let inventory = Inventory::new(&store, RemovalMatch::Prefix);
        let rentals = Rentals::new(&store);
        inventory.add_car("Civic", "Sedan", 2018, 10000.0).unwrap();

        assert!(rentals.rent("Civ", "bob").is_err());
        assert!(inventory.find("Civic").unwrap().is_available());
    }

    #[test]
    fn test_audit_line_layout() {
        let dir = tempfile::tempdir().unwrap();
        let store = FlatFileStore::open(dir.path()).unwrap();
        let inventory = Inventory::new(&store, RemovalMatch::Prefix);
        let rentals = Rentals::new(&store);
        inventory.add_car("Tesla", "EV", 2024, 15000.0).unwrap();

        rentals.rent("Tesla", "bob").unwrap();
        rentals.return_car("Tesla", "bob").unwrap();

        assert_eq!(
            std::fs::read_to_string(dir.path().join("waiting.txt")).unwrap(),
            "bob rented Tesla\n"
        );
        assert_eq!(
            std::fs::read_to_string(dir.path().join("returned.txt")).unwrap(),
            "bob returned Tesla\n"
        );
    }
}
