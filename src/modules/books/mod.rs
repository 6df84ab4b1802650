pub mod models;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use bookrent_http::error::AppError;
use bookrent_kernel::{InitCtx, Module};
use bookrent_ledger::RentalDesk;
use serde_json::json;

use crate::modules::rentals::models::RentalConfirmation;
use crate::utils::UserParams;

use models::{BookDetail, BookList};

/// Catalog browsing and renting, mounted at `/v1/books`
pub struct BooksModule {
    desk: Arc<RentalDesk>,
}

impl BooksModule {
    pub fn new(desk: Arc<RentalDesk>) -> Self {
        Self { desk }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    fn mount_path(&self) -> String {
        "/v1/books".to_string()
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let books = self.desk.list_books().len();
        if books == 0 {
            tracing::warn!(
                module = self.name(),
                catalog = %ctx.settings.catalog.path.display(),
                "catalog is empty; every book lookup will return 404"
            );
        }
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            books,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(list_books))
            .route("/{book_id}", get(get_book))
            .route("/{book_id}/rent", post(rent_book))
            .with_state(Arc::clone(&self.desk))
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "Every book in the catalog",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/BookList"
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
                "/{book_id}": {
                    "get": {
                        "summary": "Book details",
                        "tags": ["Books"],
                        "parameters": [
                            {
                                "name": "book_id",
                                "in": "path",
                                "required": true,
                                "schema": { "type": "string" }
                            }
                        ],
                        "responses": {
                            "200": {
                                "description": "The book",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/BookDetail"
                                        }
                                    }
                                }
                            },
                            "404": {
                                "description": "Book was not found",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorResponse"
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
                "/{book_id}/rent": {
                    "post": {
                        "summary": "Rent a copy of a book",
                        "tags": ["Books"],
                        "parameters": [
                            {
                                "name": "book_id",
                                "in": "path",
                                "required": true,
                                "schema": { "type": "string" }
                            },
                            {
                                "name": "user_id",
                                "in": "query",
                                "required": true,
                                "schema": { "type": "string" }
                            }
                        ],
                        "responses": {
                            "200": {
                                "description": "Book rented",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/RentalConfirmation"
                                        }
                                    }
                                }
                            },
                            "400": {
                                "description": "No copies available, or already rented by this user",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorResponse"
                                        }
                                    }
                                }
                            },
                            "404": {
                                "description": "Book was not found",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorResponse"
                                        }
                                    }
                                }
                            },
                            "422": {
                                "description": "Missing user_id",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorResponse"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "isbn": {
                                "type": "string",
                                "description": "Catalog key"
                            },
                            "title": {
                                "type": "string"
                            },
                            "author": {
                                "type": "string"
                            },
                            "published_year": {
                                "type": "integer"
                            },
                            "total_copies": {
                                "type": "integer",
                                "minimum": 0
                            },
                            "available_copies": {
                                "type": "integer",
                                "minimum": 0,
                                "description": "Copies not currently on loan"
                            },
                            "description": {
                                "type": "string"
                            }
                        },
                        "required": ["isbn", "title", "author", "total_copies", "available_copies"]
                    },
                    "BookList": {
                        "type": "object",
                        "properties": {
                            "books": {
                                "type": "array",
                                "items": { "$ref": "#/components/schemas/Book" }
                            }
                        },
                        "required": ["books"]
                    },
                    "BookDetail": {
                        "type": "object",
                        "properties": {
                            "book": { "$ref": "#/components/schemas/Book" }
                        },
                        "required": ["book"]
                    },
                    "RentalConfirmation": {
                        "type": "object",
                        "properties": {
                            "message": { "type": "string" },
                            "rental_id": { "type": "string", "format": "uuid" },
                            "book": { "$ref": "#/components/schemas/Book" }
                        },
                        "required": ["message", "rental_id", "book"]
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

async fn list_books(State(desk): State<Arc<RentalDesk>>) -> Json<BookList> {
    Json(BookList {
        books: desk.list_books(),
    })
}

async fn get_book(
    State(desk): State<Arc<RentalDesk>>,
    Path(book_id): Path<String>,
) -> Result<Json<BookDetail>, AppError> {
    let book = desk.book(&book_id)?;
    Ok(Json(BookDetail { book }))
}

async fn rent_book(
    State(desk): State<Arc<RentalDesk>>,
    Path(book_id): Path<String>,
    Query(params): Query<UserParams>,
) -> Result<Json<RentalConfirmation>, AppError> {
    let user_id = params.require_user_id()?;
    let receipt = desk.rent(&book_id, user_id)?;
    Ok(Json(RentalConfirmation::rented(receipt)))
}

/// Create a books module over the shared rental desk
pub fn create_module(desk: Arc<RentalDesk>) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(desk))
}
