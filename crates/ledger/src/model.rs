use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// A catalog entry, keyed by ISBN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Catalog key
    pub isbn: String,
    /// Title of the book
    pub title: String,
    /// Author of the book
    pub author: String,
    /// Year of first publication, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_year: Option<i32>,
    /// Copies owned by the library
    pub total_copies: u32,
    /// Copies not currently on loan
    pub available_copies: u32,
    /// Free-form blurb
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One rent transaction. Outstanding while `returned_at` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rental {
    pub id: Uuid,
    pub user_id: String,
    pub book_id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub rented_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub returned_at: Option<OffsetDateTime>,
}

impl Rental {
    pub fn new(user_id: impl Into<String>, book_id: impl Into<String>, at: OffsetDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            book_id: book_id.into(),
            rented_at: at,
            returned_at: None,
        }
    }

    pub fn is_outstanding(&self) -> bool {
        self.returned_at.is_none()
    }
}

/// A book currently held by a user, annotated with the rental that holds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveRental {
    #[serde(flatten)]
    pub book: Book,
    pub rental_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub rented_at: OffsetDateTime,
}
