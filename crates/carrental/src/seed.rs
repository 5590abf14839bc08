//! First-run bootstrap and the sample inventory.

use tracing::debug;

use crate::error::Result;
use crate::inventory::Inventory;
use crate::record::{Car, CarStatus};
use crate::storage::{self, RecordStore};

/// Sample fleet as `(model, type, year, rate)`.
const SAMPLES: [(&str, &str, i32, f64); 10] = [
    ("Mehran", "Hatchback", 2009, 5000.0),
    ("Corolla", "Sedan", 2015, 8000.0),
    ("Civic", "Sedan", 2018, 10000.0),
    ("Cultus", "Hatchback", 2017, 6000.0),
    ("City", "Sedan", 2019, 11000.0),
    ("BRV", "SUV", 2021, 18000.0),
    ("Yaris", "Sedan", 2022, 13000.0),
    ("Alto", "Hatchback", 2020, 5000.0),
    ("Fortuner", "SUV", 2023, 25000.0),
    ("Sportage", "SUV", 2021, 22000.0),
];

/// The sample cars, all `Available`.
#[must_use]
pub fn sample_cars() -> Vec<Car> {
    SAMPLES
        .iter()
        .map(|&(model, kind, year, rate)| Car {
            model: model.to_string(),
            kind: kind.to_string(),
            year,
            rate,
            status: CarStatus::Available,
        })
        .collect()
}

/// Create every store and, when `with_samples` is set, merge the sample cars.
///
/// Returns the number of sample cars added.
///
/// # Errors
///
/// Returns a store error. Malformed car lines are left in place.
pub fn bootstrap(
    store: &dyn RecordStore,
    inventory: &Inventory<'_>,
    with_samples: bool,
) -> Result<usize> {
    storage::ensure_all(store)?;
    if !with_samples {
        debug!("Sample cars disabled");
        return Ok(0);
    }
    inventory.seed(&sample_cars())
}
