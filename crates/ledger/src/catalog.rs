//! The book catalog and its JSON loader.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::model::Book;

/// Reasons a catalog file could not be turned into a [`Catalog`].
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed catalog document")]
    Parse(#[from] serde_json::Error),
}

/// On-disk layout: `{ "books": [ ... ] }`.
#[derive(Debug, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    books: Vec<CatalogEntry>,
}

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    isbn: String,
    title: String,
    author: String,
    #[serde(default, alias = "publishedYear")]
    published_year: Option<i32>,
    #[serde(alias = "totalCopies")]
    total_copies: u32,
    #[serde(default, alias = "availableCopies")]
    available_copies: Option<u32>,
    #[serde(default)]
    description: Option<String>,
}

impl From<CatalogEntry> for Book {
    fn from(entry: CatalogEntry) -> Self {
        Self {
            available_copies: entry.available_copies.unwrap_or(entry.total_copies),
            isbn: entry.isbn,
            title: entry.title,
            author: entry.author,
            published_year: entry.published_year,
            total_copies: entry.total_copies,
            description: entry.description,
        }
    }
}

/// Books keyed by ISBN. Iteration order is ISBN order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    books: BTreeMap<String, Book>,
}

impl Catalog {
    /// Build a catalog from already normalized books. A repeated ISBN replaces the earlier entry.
    pub fn from_books(books: impl IntoIterator<Item = Book>) -> Self {
        Self {
            books: books
                .into_iter()
                .map(|book| (book.isbn.clone(), book))
                .collect(),
        }
    }

    /// Parse a catalog document, defaulting `available_copies` to `total_copies`.
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_str(raw)?;
        Ok(Self::from_books(document.books.into_iter().map(Book::from)))
    }

    /// Read and parse a catalog file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// Like [`Catalog::load`], but a failure is logged and yields an empty catalog.
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(catalog) => {
                tracing::info!(path = %path.display(), books = catalog.len(), "catalog loaded");
                catalog
            }
            Err(err) => {
                tracing::error!(
                    path = %path.display(),
                    error = ?err,
                    "failed to load catalog; starting with no books"
                );
                Self::default()
            }
        }
    }

    pub fn get(&self, isbn: &str) -> Option<&Book> {
        self.books.get(isbn)
    }

    pub(crate) fn get_mut(&mut self, isbn: &str) -> Option<&mut Book> {
        self.books.get_mut(isbn)
    }

    pub fn contains(&self, isbn: &str) -> bool {
        self.books.contains_key(isbn)
    }

    pub fn books(&self) -> impl Iterator<Item = &Book> {
        self.books.values()
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn available_copies_default_to_total() {
        let catalog = Catalog::from_json(
            r#"{"books": [{"isbn": "123", "title": "Dune", "author": "Frank Herbert", "total_copies": 3}]}"#,
        )
        .unwrap();

        let book = catalog.get("123").unwrap();
        assert_eq!(book.total_copies, 3);
        assert_eq!(book.available_copies, 3);
    }

    #[test]
    fn explicit_available_copies_are_kept() {
        let catalog = Catalog::from_json(
            r#"{"books": [{"isbn": "1", "title": "T", "author": "A", "total_copies": 3, "available_copies": 1}]}"#,
        )
        .unwrap();

        assert_eq!(catalog.get("1").unwrap().available_copies, 1);
    }

    #[test]
    fn camel_case_field_names_are_normalized() {
        let catalog = Catalog::from_json(
            r#"{"books": [{"isbn": "1", "title": "T", "author": "A", "totalCopies": 4, "publishedYear": 1965}]}"#,
        )
        .unwrap();

        let book = catalog.get("1").unwrap();
        assert_eq!(book.total_copies, 4);
        assert_eq!(book.available_copies, 4);
        assert_eq!(book.published_year, Some(1965));
    }

    #[test]
    fn missing_books_key_is_an_empty_catalog() {
        let catalog = Catalog::from_json("{}").unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn later_duplicate_isbn_wins() {
        let catalog = Catalog::from_json(
            r#"{"books": [
                {"isbn": "1", "title": "First", "author": "A", "total_copies": 1},
                {"isbn": "1", "title": "Second", "author": "A", "total_copies": 1}
            ]}"#,
        )
        .unwrap();

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("1").unwrap().title, "Second");
    }

    #[test]
    fn entry_without_copy_count_is_rejected() {
        let result = Catalog::from_json(r#"{"books": [{"isbn": "1", "title": "T", "author": "A"}]}"#);
        assert!(matches!(result, Err(CatalogError::Parse(_))));
    }

    #[test]
    fn missing_file_degrades_to_empty_catalog() {
        let catalog = Catalog::load_or_empty("definitely/not/here/books.json");
        assert!(catalog.is_empty());
    }

    #[test]
    fn books_iterate_in_isbn_order() {
        let catalog = Catalog::from_json(
            r#"{"books": [
                {"isbn": "b", "title": "B", "author": "A", "total_copies": 1},
                {"isbn": "a", "title": "A", "author": "A", "total_copies": 1}
            ]}"#,
        )
        .unwrap();

        let isbns: Vec<_> = catalog.books().map(|book| book.isbn.as_str()).collect();
        assert_eq!(isbns, ["a", "b"]);
    }
}
