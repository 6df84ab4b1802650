pub mod models;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{Path, Query, State},
    routing::post,
    Json, Router,
};
use bookrent_http::error::AppError;
use bookrent_kernel::{InitCtx, Module};
use bookrent_ledger::RentalDesk;
use serde_json::json;

use crate::utils::UserParams;

use models::RentalConfirmation;

/// Returning rented books, mounted at `/v1/rentals`
pub struct RentalsModule {
    desk: Arc<RentalDesk>,
}

impl RentalsModule {
    pub fn new(desk: Arc<RentalDesk>) -> Self {
        Self { desk }
    }
}

#[async_trait]
impl Module for RentalsModule {
    fn name(&self) -> &'static str {
        "rentals"
    }

    fn mount_path(&self) -> String {
        "/v1/rentals".to_string()
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "rentals module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/{rental_id}/return", post(return_book))
            .with_state(Arc::clone(&self.desk))
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/{rental_id}/return": {
                    "post": {
                        "summary": "Return a rented book",
                        "tags": ["Rentals"],
                        "parameters": [
                            {
                                "name": "rental_id",
                                "in": "path",
                                "required": true,
                                "schema": { "type": "string", "format": "uuid" }
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
                                "description": "Book returned",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/RentalConfirmation"
                                        }
                                    }
                                }
                            },
                            "400": {
                                "description": "Book already returned",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorResponse"
                                        }
                                    }
                                }
                            },
                            "403": {
                                "description": "Rental belongs to another user",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorResponse"
                                        }
                                    }
                                }
                            },
                            "404": {
                                "description": "Rental not found",
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
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "rentals module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "rentals module stopped");
        Ok(())
    }
}

async fn return_book(
    State(desk): State<Arc<RentalDesk>>,
    Path(rental_id): Path<String>,
    Query(params): Query<UserParams>,
) -> Result<Json<RentalConfirmation>, AppError> {
    let user_id = params.require_user_id()?;
    let receipt = desk.return_rental(&rental_id, user_id)?;
    Ok(Json(RentalConfirmation::returned(receipt)))
}

/// Create a rentals module over the shared rental desk
pub fn create_module(desk: Arc<RentalDesk>) -> Arc<dyn Module> {
    Arc::new(RentalsModule::new(desk))
}
