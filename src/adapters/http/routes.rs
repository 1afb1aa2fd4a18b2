use axum::{body::Bytes, extract::State, Json};

use crate::adapters::http::ApiError;
use crate::adapters::http::state::HttpState;
use crate::application::dto::{ExportResponse, ProcessImageResponse, StatsDto};
use crate::domain::errors::DomainError;

/// Procesa una imagen: decodifica el cuerpo, ejecuta la detección y
/// devuelve las cajas (para que el front-end las dibuje) junto con la
/// vista de estadísticas ya actualizada.
pub async fn process_image(
    State(st): State<HttpState>,
    body: Bytes,
) -> Result<Json<ProcessImageResponse>, ApiError> {
    // La decodificación es la frontera: a partir de aquí el pipeline solo
    // ve imágenes RGB de 3 canales ya decodificadas.
    let image = image::load_from_memory(&body)
        .map_err(|e| DomainError::InvalidInput(format!("imagen no decodificable: {e}")))?
        .to_rgb8();

    let (detections, stats) = st.detection.process_image(image).await?;
    Ok(Json(ProcessImageResponse {
        detections,
        stats: stats.into(),
    }))
}

pub async fn get_stats(State(st): State<HttpState>) -> Result<Json<StatsDto>, ApiError> {
    let stats = st.detection.summarize().await?;
    Ok(Json(stats.into()))
}

pub async fn clear_history(State(st): State<HttpState>) -> Result<Json<StatsDto>, ApiError> {
    let stats = st.detection.clear_history().await?;
    Ok(Json(stats.into()))
}

pub async fn export_document(
    State(st): State<HttpState>,
) -> Result<Json<ExportResponse>, ApiError> {
    let path = st.reports.export_document().await?;
    Ok(Json(ExportResponse {
        path: path.display().to_string(),
    }))
}

pub async fn export_spreadsheet(
    State(st): State<HttpState>,
) -> Result<Json<ExportResponse>, ApiError> {
    let path = st.reports.export_spreadsheet().await?;
    Ok(Json(ExportResponse {
        path: path.display().to_string(),
    }))
}
