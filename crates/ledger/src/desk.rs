//! The rental desk: every read and every transition over the catalog and ledger.

use std::sync::{Mutex, MutexGuard, PoisonError};

use time::OffsetDateTime;
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::error::RentalError;
use crate::ledger::Ledger;
use crate::model::{ActiveRental, Book, Rental};

/// Outcome of a successful rent or return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RentalReceipt {
    pub rental_id: Uuid,
    /// The book as it stands after the transition
    pub book: Book,
}

#[derive(Debug, Default)]
struct Tables {
    catalog: Catalog,
    ledger: Ledger,
}

/// Owns the catalog and the ledger.
///
/// All access goes through one mutex, so a rent or return validates and applies
/// without any other request observing it half done. The guard is never held
/// across an await point.
#[derive(Debug, Default)]
pub struct RentalDesk {
    tables: Mutex<Tables>,
}

impl RentalDesk {
    pub fn new(catalog: Catalog) -> Self {
        Self::with_ledger(catalog, Ledger::new())
    }

    /// Start from an existing ledger. Copy counts are taken as-is from `catalog`.
    pub fn with_ledger(catalog: Catalog, ledger: Ledger) -> Self {
        Self {
            tables: Mutex::new(Tables { catalog, ledger }),
        }
    }

    // Transitions check every precondition before touching either table, so a
    // panic can never leave a half-applied change behind a poisoned lock.
    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Every book in the catalog, ordered by ISBN.
    pub fn list_books(&self) -> Vec<Book> {
        self.tables().catalog.books().cloned().collect()
    }

    pub fn book(&self, book_id: &str) -> Result<Book, RentalError> {
        self.tables()
            .catalog
            .get(book_id)
            .cloned()
            .ok_or_else(RentalError::book_not_found)
    }

    pub fn rental(&self, rental_id: &Uuid) -> Option<Rental> {
        self.tables().ledger.get(rental_id).cloned()
    }

    /// Lend one copy of `book_id` to `user_id`.
    pub fn rent(&self, book_id: &str, user_id: &str) -> Result<RentalReceipt, RentalError> {
        let mut guard = self.tables();
        let Tables { catalog, ledger } = &mut *guard;

        let book = catalog
            .get_mut(book_id)
            .ok_or_else(RentalError::book_not_found)?;
        if book.available_copies == 0 {
            tracing::debug!(book_id, user_id, "rent refused: no copies available");
            return Err(RentalError::no_copies_available());
        }
        if ledger.has_outstanding(user_id, book_id) {
            tracing::debug!(book_id, user_id, "rent refused: already rented");
            return Err(RentalError::already_rented());
        }

        let rental_id = ledger.open(user_id, book_id, OffsetDateTime::now_utc()).id;
        book.available_copies -= 1;

        tracing::info!(
            rental_id = %rental_id,
            book_id,
            user_id,
            available_copies = book.available_copies,
            "book rented"
        );

        Ok(RentalReceipt {
            rental_id,
            book: book.clone(),
        })
    }

    /// Books `user_id` holds right now, in the order they were rented.
    pub fn active_rentals(&self, user_id: &str) -> Vec<ActiveRental> {
        let tables = self.tables();
        tables
            .ledger
            .outstanding_for(user_id)
            .filter_map(|rental| {
                let book = tables.catalog.get(&rental.book_id)?;
                Some(ActiveRental {
                    book: book.clone(),
                    rental_id: rental.id,
                    rented_at: rental.rented_at,
                })
            })
            .collect()
    }

    /// Close rental `rental_id` on behalf of `user_id`.
    ///
    /// Availability goes up by one without comparing against `total_copies`.
    pub fn return_rental(
        &self,
        rental_id: &str,
        user_id: &str,
    ) -> Result<RentalReceipt, RentalError> {
        let rental_id = Uuid::parse_str(rental_id).map_err(|_| RentalError::rental_not_found())?;

        let mut guard = self.tables();
        let Tables { catalog, ledger } = &mut *guard;

        let rental = ledger
            .get_mut(&rental_id)
            .ok_or_else(RentalError::rental_not_found)?;
        if rental.user_id != user_id {
            tracing::debug!(rental_id = %rental_id, user_id, "return refused: not the renter");
            return Err(RentalError::belongs_to_another_user());
        }
        if !rental.is_outstanding() {
            tracing::debug!(rental_id = %rental_id, user_id, "return refused: already returned");
            return Err(RentalError::already_returned());
        }
        let book = catalog
            .get_mut(&rental.book_id)
            .ok_or_else(RentalError::rented_book_missing)?;

        rental.returned_at = Some(OffsetDateTime::now_utc());
        book.available_copies = book.available_copies.saturating_add(1);

        tracing::info!(
            rental_id = %rental_id,
            book_id = %book.isbn,
            user_id,
            available_copies = book.available_copies,
            "book returned"
        );

        Ok(RentalReceipt {
            rental_id,
            book: book.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(isbn: &str, copies: u32) -> Book {
        Book {
            isbn: isbn.to_string(),
            title: format!("Book {isbn}"),
            author: "Anonymous".to_string(),
            published_year: Some(1999),
            total_copies: copies,
            available_copies: copies,
            description: None,
        }
    }

    fn desk() -> RentalDesk {
        RentalDesk::new(Catalog::from_books([book("123", 2), book("456", 1)]))
    }

    fn available(desk: &RentalDesk, isbn: &str) -> u32 {
        desk.book(isbn).unwrap().available_copies
    }

    #[test]
    fn rent_decrements_availability_and_opens_rental() {
        let desk = desk();

        let receipt = desk.rent("123", "alice").unwrap();

        assert_eq!(receipt.book.available_copies, 1);
        assert_eq!(available(&desk, "123"), 1);
        let rental = desk.rental(&receipt.rental_id).unwrap();
        assert_eq!(rental.user_id, "alice");
        assert_eq!(rental.book_id, "123");
        assert!(rental.is_outstanding());
    }

    #[test]
    fn rent_unknown_book_is_not_found() {
        let desk = desk();
        assert_eq!(
            desk.rent("999", "alice"),
            Err(RentalError::NotFound("Book was not found".to_string()))
        );
    }

    #[test]
    fn user_cannot_hold_two_copies_of_the_same_book() {
        let desk = desk();
        desk.rent("123", "alice").unwrap();

        let err = desk.rent("123", "alice").unwrap_err();

        assert_eq!(err.message(), "Book already rented by this user");
        assert!(matches!(err, RentalError::InvalidState(_)));
        assert_eq!(available(&desk, "123"), 1);
    }

    #[test]
    fn availability_is_checked_before_duplicate_rental() {
        let desk = desk();
        desk.rent("456", "alice").unwrap();

        let err = desk.rent("456", "alice").unwrap_err();

        assert_eq!(
            err.message(),
            "There are no copies of this book available for rent"
        );
    }

    #[test]
    fn full_rental_scenario() {
        let desk = desk();

        let alice = desk.rent("123", "alice").unwrap();
        assert_eq!(alice.book.available_copies, 1);

        assert!(matches!(
            desk.rent("123", "alice"),
            Err(RentalError::InvalidState(_))
        ));

        let bob = desk.rent("123", "bob").unwrap();
        assert_eq!(bob.book.available_copies, 0);

        let carol = desk.rent("123", "carol").unwrap_err();
        assert_eq!(carol, RentalError::no_copies_available());

        let returned = desk
            .return_rental(&alice.rental_id.to_string(), "alice")
            .unwrap();
        assert_eq!(returned.rental_id, alice.rental_id);
        assert_eq!(returned.book.available_copies, 1);

        let again = desk
            .return_rental(&alice.rental_id.to_string(), "alice")
            .unwrap_err();
        assert_eq!(again, RentalError::already_returned());
        assert_eq!(available(&desk, "123"), 1);
    }

    #[test]
    fn return_sets_returned_at_once() {
        let desk = desk();
        let receipt = desk.rent("123", "alice").unwrap();
        let id = receipt.rental_id.to_string();

        desk.return_rental(&id, "alice").unwrap();
        let first = desk.rental(&receipt.rental_id).unwrap().returned_at;
        assert!(first.is_some());

        desk.return_rental(&id, "alice").unwrap_err();
        assert_eq!(desk.rental(&receipt.rental_id).unwrap().returned_at, first);
    }

    #[test]
    fn return_by_another_user_is_forbidden_and_changes_nothing() {
        let desk = desk();
        let receipt = desk.rent("123", "alice").unwrap();

        let err = desk
            .return_rental(&receipt.rental_id.to_string(), "mallory")
            .unwrap_err();

        assert_eq!(
            err,
            RentalError::Forbidden("Unauthorized: This rental belongs to another user".to_string())
        );
        assert_eq!(available(&desk, "123"), 1);
        assert!(desk.rental(&receipt.rental_id).unwrap().is_outstanding());
    }

    #[test]
    fn ownership_is_checked_before_returned_flag() {
        let desk = desk();
        let receipt = desk.rent("123", "alice").unwrap();
        let id = receipt.rental_id.to_string();
        desk.return_rental(&id, "alice").unwrap();

        let err = desk.return_rental(&id, "bob").unwrap_err();
        assert!(matches!(err, RentalError::Forbidden(_)));
    }

    #[test]
    fn unknown_or_malformed_rental_id_is_not_found() {
        let desk = desk();
        assert_eq!(
            desk.return_rental(&Uuid::new_v4().to_string(), "alice"),
            Err(RentalError::rental_not_found())
        );
        assert_eq!(
            desk.return_rental("not-a-uuid", "alice"),
            Err(RentalError::rental_not_found())
        );
    }

    #[test]
    fn rent_again_after_return_opens_a_new_rental() {
        let desk = desk();
        let first = desk.rent("123", "alice").unwrap();
        desk.return_rental(&first.rental_id.to_string(), "alice")
            .unwrap();

        let second = desk.rent("123", "alice").unwrap();

        assert_ne!(first.rental_id, second.rental_id);
        assert!(!desk.rental(&first.rental_id).unwrap().is_outstanding());
        assert!(desk.rental(&second.rental_id).unwrap().is_outstanding());
    }

    #[test]
    fn active_rentals_track_outstanding_rentals_only() {
        let desk = desk();
        assert!(desk.active_rentals("alice").is_empty());

        let receipt = desk.rent("123", "alice").unwrap();
        desk.rent("456", "bob").unwrap();

        let active = desk.active_rentals("alice");
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].book.isbn, "123");
        assert_eq!(active[0].rental_id, receipt.rental_id);
        assert_eq!(
            active[0].rented_at,
            desk.rental(&receipt.rental_id).unwrap().rented_at
        );

        desk.return_rental(&receipt.rental_id.to_string(), "alice")
            .unwrap();
        assert!(desk.active_rentals("alice").is_empty());
    }

    #[test]
    fn active_rentals_skip_books_missing_from_catalog() {
        let mut ledger = Ledger::new();
        ledger.open("alice", "gone", OffsetDateTime::now_utc());
        ledger.open("alice", "123", OffsetDateTime::now_utc());
        let desk = RentalDesk::with_ledger(Catalog::from_books([book("123", 2)]), ledger);

        let active = desk.active_rentals("alice");
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].book.isbn, "123");
    }

    #[test]
    fn return_of_rental_for_missing_book_is_not_found() {
        let mut ledger = Ledger::new();
        let id = ledger.open("alice", "gone", OffsetDateTime::now_utc()).id;
        let desk = RentalDesk::with_ledger(Catalog::default(), ledger);

        let err = desk.return_rental(&id.to_string(), "alice").unwrap_err();

        assert_eq!(err, RentalError::NotFound("Book not found".to_string()));
        assert!(desk.rental(&id).unwrap().is_outstanding());
    }

    // Known edge case: return does not cap availability at total_copies.
    #[test]
    fn return_on_inconsistent_ledger_can_exceed_total_copies() {
        let mut ledger = Ledger::new();
        let id = ledger.open("alice", "123", OffsetDateTime::now_utc()).id;
        let desk = RentalDesk::with_ledger(Catalog::from_books([book("123", 2)]), ledger);

        let receipt = desk.return_rental(&id.to_string(), "alice").unwrap();

        assert_eq!(receipt.book.total_copies, 2);
        assert_eq!(receipt.book.available_copies, 3);
    }

    #[test]
    fn concurrent_rents_never_oversell() {
        use std::sync::Arc;
        use std::thread;

        let desk = Arc::new(desk());
        let handles: Vec<_> = (0..16)
            .map(|n| {
                let desk = Arc::clone(&desk);
                thread::spawn(move || desk.rent("123", &format!("user-{n}")).is_ok())
            })
            .collect();

        let successes = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .filter(|ok| *ok)
            .count();

        assert_eq!(successes, 2);
        assert_eq!(available(&desk, "123"), 0);
    }
}
