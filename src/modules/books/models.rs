use bookrent_ledger::Book;
use serde::Serialize;

/// Response body for `GET /v1/books`.
#[derive(Debug, Clone, Serialize)]
pub struct BookList {
    pub books: Vec<Book>,
}

/// Response body for `GET /v1/books/{book_id}`.
#[derive(Debug, Clone, Serialize)]
pub struct BookDetail {
    pub book: Book,
}
