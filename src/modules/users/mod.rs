use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use bookrent_kernel::{InitCtx, Module};
use bookrent_ledger::{ActiveRental, RentalDesk};
use serde::Serialize;
use serde_json::json;

/// Response body for `GET /v1/users/{user_id}/books`.
#[derive(Debug, Clone, Serialize)]
pub struct UserBooks {
    pub books: Vec<ActiveRental>,
}

/// Per-user views of the ledger, mounted at `/v1/users`
pub struct UsersModule {
    desk: Arc<RentalDesk>,
}

impl UsersModule {
    pub fn new(desk: Arc<RentalDesk>) -> Self {
        Self { desk }
    }
}

#[async_trait]
impl Module for UsersModule {
    fn name(&self) -> &'static str {
        "users"
    }

    fn mount_path(&self) -> String {
        "/v1/users".to_string()
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "users module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/{user_id}/books", get(list_user_books))
            .with_state(Arc::clone(&self.desk))
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/{user_id}/books": {
                    "get": {
                        "summary": "Books a user currently has on loan",
                        "tags": ["Users"],
                        "parameters": [
                            {
                                "name": "user_id",
                                "in": "path",
                                "required": true,
                                "schema": { "type": "string" }
                            }
                        ],
                        "responses": {
                            "200": {
                                "description": "Outstanding rentals, oldest first; empty for unknown users",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/UserBooks"
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
                    "ActiveRental": {
                        "allOf": [
                            { "$ref": "#/components/schemas/Book" },
                            {
                                "type": "object",
                                "properties": {
                                    "rental_id": {
                                        "type": "string",
                                        "format": "uuid"
                                    },
                                    "rented_at": {
                                        "type": "string",
                                        "format": "date-time"
                                    }
                                },
                                "required": ["rental_id", "rented_at"]
                            }
                        ]
                    },
                    "UserBooks": {
                        "type": "object",
                        "properties": {
                            "books": {
                                "type": "array",
                                "items": { "$ref": "#/components/schemas/ActiveRental" }
                            }
                        },
                        "required": ["books"]
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "users module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "users module stopped");
        Ok(())
    }
}

async fn list_user_books(
    State(desk): State<Arc<RentalDesk>>,
    Path(user_id): Path<String>,
) -> Json<UserBooks> {
    Json(UserBooks {
        books: desk.active_rentals(&user_id),
    })
}

/// Create a users module over the shared rental desk
pub fn create_module(desk: Arc<RentalDesk>) -> Arc<dyn Module> {
    Arc::new(UsersModule::new(desk))
}
