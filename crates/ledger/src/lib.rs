//! Book catalog and rental ledger for bookrent.
//!
//! The [`RentalDesk`] owns both tables and is the only thing that mutates them.
//! Rent and return run as critical sections under a single lock.

pub mod catalog;
pub mod desk;
pub mod error;
pub mod ledger;
pub mod model;

pub use catalog::{Catalog, CatalogError};
pub use desk::{RentalDesk, RentalReceipt};
pub use error::RentalError;
pub use ledger::Ledger;
pub use model::{ActiveRental, Book, Rental};
