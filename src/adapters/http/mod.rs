pub mod routes;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::error;

use crate::adapters::http::state::HttpState;
use crate::domain::errors::DomainError;

/// Tamaño máximo del cuerpo para la subida de imágenes.
const MAX_IMAGE_BYTES: usize = 20 * 1024 * 1024;

pub fn router(state: HttpState) -> Router {
    Router::new()
        .route("/api/process", post(routes::process_image))
        .route("/api/stats", get(routes::get_stats))
        .route("/api/history/clear", post(routes::clear_history))
        .route("/api/export/document", post(routes::export_document))
        .route("/api/export/spreadsheet", post(routes::export_spreadsheet))
        .layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES))
        .with_state(state)
}

/// Envoltorio HTTP de `DomainError`: cada fallo se reporta explícitamente
/// con su código; nunca se disfraza de éxito vacío.
pub struct ApiError(DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self.0 {
            DomainError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
            DomainError::DetectionFailure(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "DETECTION_FAILURE")
            }
            DomainError::StoreUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "STORE_UNAVAILABLE")
            }
            DomainError::ExportFailure(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "EXPORT_FAILURE")
            }
        };

        error!(code, message = %self.0, "Fallo en la operación");

        let body = Json(json!({
            "error_code": code,
            "message": self.0.to_string(),
        }));
        (status, body).into_response()
    }
}
