//! Append-only record of every rental ever made.

use std::collections::HashMap;

use time::OffsetDateTime;
use uuid::Uuid;

use crate::model::Rental;

/// Rentals in creation order, indexed by id. Records are never removed.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    rentals: Vec<Rental>,
    index: HashMap<Uuid, usize>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new outstanding rental and return it.
    pub fn open(
        &mut self,
        user_id: impl Into<String>,
        book_id: impl Into<String>,
        at: OffsetDateTime,
    ) -> &Rental {
        let rental = Rental::new(user_id, book_id, at);
        let slot = self.rentals.len();
        self.index.insert(rental.id, slot);
        self.rentals.push(rental);
        &self.rentals[slot]
    }

    pub fn get(&self, id: &Uuid) -> Option<&Rental> {
        self.index.get(id).map(|&slot| &self.rentals[slot])
    }

    pub(crate) fn get_mut(&mut self, id: &Uuid) -> Option<&mut Rental> {
        self.index.get(id).map(|&slot| &mut self.rentals[slot])
    }

    /// Whether `user_id` currently holds an unreturned copy of `book_id`.
    pub fn has_outstanding(&self, user_id: &str, book_id: &str) -> bool {
        self.rentals
            .iter()
            .any(|r| r.is_outstanding() && r.user_id == user_id && r.book_id == book_id)
    }

    /// Unreturned rentals of one user, oldest first.
    pub fn outstanding_for<'a>(&'a self, user_id: &'a str) -> impl Iterator<Item = &'a Rental> {
        self.rentals
            .iter()
            .filter(move |r| r.is_outstanding() && r.user_id == user_id)
    }

    pub fn len(&self) -> usize {
        self.rentals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rentals.is_empty()
    }
}
