use thiserror::Error;

/// Why a catalog lookup or rental transition was refused.
///
/// The message is meant for API callers and never carries internal detail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RentalError {
    /// A book or rental does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The request breaks a rental rule (no copies left, already rented, already returned).
    #[error("{0}")]
    InvalidState(String),

    /// The rental belongs to someone else.
    #[error("{0}")]
    Forbidden(String),
}

impl RentalError {
    pub(crate) fn book_not_found() -> Self {
        Self::NotFound("Book was not found".to_string())
    }

    pub(crate) fn rented_book_missing() -> Self {
        Self::NotFound("Book not found".to_string())
    }

    pub(crate) fn rental_not_found() -> Self {
        Self::NotFound("Rental not found".to_string())
    }

    pub(crate) fn no_copies_available() -> Self {
        Self::InvalidState("There are no copies of this book available for rent".to_string())
    }

    pub(crate) fn already_rented() -> Self {
        Self::InvalidState("Book already rented by this user".to_string())
    }

    pub(crate) fn already_returned() -> Self {
        Self::InvalidState("Book already returned".to_string())
    }

    pub(crate) fn belongs_to_another_user() -> Self {
        Self::Forbidden("Unauthorized: This rental belongs to another user".to_string())
    }

    pub fn message(&self) -> &str {
        match self {
            Self::NotFound(message) | Self::InvalidState(message) | Self::Forbidden(message) => {
                message
            }
        }
    }
}
