use serde::{Deserialize, Serialize};

use crate::domain::{
    detection::Detection,
    event::DetectionEvent,
    stats::StatsView,
};

/// Evento tal y como lo consume el front-end: timestamp ya formateado
/// con precisión de segundos (`YYYY-MM-DD HH:MM:SS`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDto {
    pub id: i64,
    pub filename: String,
    pub datetime: String,
    pub target_count: u32,
}

impl From<&DetectionEvent> for EventDto {
    fn from(event: &DetectionEvent) -> Self {
        Self {
            id: event.id,
            filename: event.filename.clone(),
            datetime: event.timestamp_text(),
            target_count: event.target_count,
        }
    }
}

/// Vista de estadísticas para presentación. La media llega redondeada a
/// dos decimales (half-up); `mean`/`max` ausentes señalan explícitamente
/// el estado "sin datos", que no debe confundirse con cero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsDto {
    pub total: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
    pub recent: Vec<EventDto>,
}

impl From<StatsView> for StatsDto {
    fn from(view: StatsView) -> Self {
        Self {
            total: view.aggregate.total,
            mean: view.aggregate.display_mean(),
            max: view.aggregate.max,
            recent: view.recent.iter().map(EventDto::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessImageResponse {
    pub detections: Vec<Detection>,
    pub stats: StatsDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportResponse {
    pub path: String,
}
