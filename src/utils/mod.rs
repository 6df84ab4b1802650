//! Request helpers shared by the HTTP modules.

use bookrent_http::error::AppError;
use serde::Deserialize;

/// The caller-supplied `?user_id=` query parameter.
///
/// Deserializes even when absent so the handler can answer with the
/// standard validation envelope instead of axum's plain-text rejection.
#[derive(Debug, Default, Deserialize)]
pub struct UserParams {
    pub user_id: Option<String>,
}

impl UserParams {
    /// The user id, or a 422 validation error when it was not supplied.
    pub fn require_user_id(&self) -> Result<&str, AppError> {
        self.user_id
            .as_deref()
            .ok_or_else(|| AppError::missing_param("user_id"))
    }
}
