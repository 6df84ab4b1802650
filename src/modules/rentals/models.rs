use bookrent_ledger::{Book, RentalReceipt};
use serde::Serialize;
use uuid::Uuid;

/// Response body for a successful rent or return.
#[derive(Debug, Clone, Serialize)]
pub struct RentalConfirmation {
    pub message: String,
    pub rental_id: Uuid,
    /// The book after the transition
    pub book: Book,
}

impl RentalConfirmation {
    pub fn rented(receipt: RentalReceipt) -> Self {
        Self::new("Book rented successfully", receipt)
    }

    pub fn returned(receipt: RentalReceipt) -> Self {
        Self::new("Book returned successfully", receipt)
    }

    fn new(message: &str, receipt: RentalReceipt) -> Self {
        Self {
            message: message.to_string(),
            rental_id: receipt.rental_id,
            book: receipt.book,
        }
    }
}
