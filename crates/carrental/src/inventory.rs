//! Car inventory: add, remove, list and seed.
//!
//! Every mutation is a full read-modify-write of the car store through
//! [`RecordStore::modify`], so concurrent mutations are serialized by the
//! store's lock.
//!
//! Removal and seeding only look at the first field of each line, the model.
//! A damaged line therefore never blocks bootstrap, and an admin can still
//! remove it.

use std::collections::HashSet;

use tracing::{debug, info};

use crate::config::RemovalMatch;
use crate::error::{Error, Result};
use crate::record::{parse_all, validate_token, Car, CarStatus, Record};
use crate::storage::{RecordStore, StoreName};

/// Operations on the car store.
#[derive(Debug, Clone, Copy)]
pub struct Inventory<'a> {
    store: &'a dyn RecordStore,
    removal: RemovalMatch,
}

impl<'a> Inventory<'a> {
    /// Create an inventory over `store` with the given removal rule.
    #[must_use]
    pub fn new(store: &'a dyn RecordStore, removal: RemovalMatch) -> Self {
        Self { store, removal }
    }

    /// Append a new car with status `Available`.
    ///
    /// Model uniqueness is not checked; adding an existing model creates a
    /// second record with that model.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidField`] for unstorable values, or a store error.
    pub fn add_car(&self, model: &str, kind: &str, year: i32, rate: f64) -> Result<Car> {
        let car = Car::new(model, kind, year, rate)?;
        self.store.append(StoreName::Cars, &car.to_line())?;
        info!(model = %car.model, "Added car");
        Ok(car)
    }

    /// Remove cars matching `model` and return how many were removed.
    ///
    /// With [`RemovalMatch::Prefix`] every car whose model starts with
    /// `model` goes, so `"C"` removes `Civic` and `City` alike. Zero matches
    /// is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidField`] for an empty or multi-word model, or a
    /// store error.
    pub fn remove_car(&self, model: &str) -> Result<usize> {
        validate_token("model", model)?;
        let removal = self.removal;
        let mut removed = 0;

        self.store.modify(StoreName::Cars, &mut |lines| {
            let before = lines.len();
            lines.retain(|line| !matches_removal(removal, model_field(line), model));
            removed = before - lines.len();
            Ok(())
        })?;

        info!(model, removed, match_rule = ?removal, "Removed cars");
        Ok(removed)
    }

    /// Every car, in store order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedRecord`] or a store error.
    pub fn list_all(&self) -> Result<Vec<Car>> {
        let lines = self.store.read_all(StoreName::Cars)?;
        let cars = parse_all(StoreName::Cars, &lines)?;
        debug!(count = cars.len(), "Listed cars");
        Ok(cars)
    }

    /// Cars that can be rented, in store order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedRecord`] or a store error.
    pub fn list_available(&self) -> Result<Vec<Car>> {
        self.list_with_status(CarStatus::Available)
    }

    /// Cars currently rented, in store order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedRecord`] or a store error.
    pub fn list_rented(&self) -> Result<Vec<Car>> {
        self.list_with_status(CarStatus::Rented)
    }

    fn list_with_status(&self, status: CarStatus) -> Result<Vec<Car>> {
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|car| car.status == status)
            .collect())
    }

    /// The first car whose model equals `model`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when no car has this model.
    pub fn find(&self, model: &str) -> Result<Car> {
        self.list_all()?
            .into_iter()
            .find(|car| car.model == model)
            .ok_or_else(|| Error::NotFound {
                model: model.to_string(),
            })
    }

    /// Merge `samples` into the store, skipping models already present.
    ///
    /// Existing records keep their order; new ones go at the end. Returns the
    /// number of cars added.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    pub fn seed(&self, samples: &[Car]) -> Result<usize> {
        let mut added = 0;

        self.store.modify(StoreName::Cars, &mut |lines| {
            let mut models: HashSet<String> = lines
                .iter()
                .map(|line| model_field(line).to_string())
                .collect();
            added = 0;
            for sample in samples {
                if models.insert(sample.model.clone()) {
                    lines.push(sample.to_line());
                    added += 1;
                }
            }
            Ok(())
        })?;

        if added > 0 {
            info!(added, "Seeded sample cars");
        }
        Ok(added)
    }
}

fn model_field(line: &str) -> &str {
    line.split_whitespace().next().unwrap_or_default()
}

fn matches_removal(rule: RemovalMatch, candidate: &str, requested: &str) -> bool {
    match rule {
        RemovalMatch::Prefix => candidate.starts_with(requested),
        RemovalMatch::Exact => candidate == requested,
    }
}
