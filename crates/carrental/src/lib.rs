//! `carrental` - car rental inventory and bookings
//!
//! Admins manage a car inventory and review rental logs; users rent and return
//! cars. State lives in line-oriented record stores, either flat text files or
//! a `SQLite` database.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod accounts;
pub mod cli;
pub mod config;
pub mod desk;
pub mod error;
pub mod inventory;
pub mod logging;
pub mod record;
pub mod rental;
pub mod seed;
pub mod session;
pub mod storage;

pub use accounts::Accounts;
pub use config::Config;
pub use desk::RentalDesk;
pub use error::{Error, Result};
pub use inventory::Inventory;
pub use logging::init_logging;
pub use record::{AuditAction, AuditEntry, Car, CarStatus, Credential};
pub use rental::Rentals;
pub use session::{Role, Session};
pub use storage::{FlatFileStore, RecordStore, SqliteStore, StoreName};
