use serde::{Deserialize, Serialize};

use super::event::DetectionEvent;

/// Métricas agregadas sobre el historial completo, calculadas en una sola
/// pasada. `mean` y `max` son `None` cuando el historial está vacío:
/// "sin datos" no es lo mismo que "datos que promedian cero".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryAggregate {
    pub total: u64,
    pub mean: Option<f64>,
    pub max: Option<u32>,
}

impl HistoryAggregate {
    /// Media redondeada a dos decimales para presentación. Convención:
    /// redondeo half-up (la media exacta se conserva en `mean`).
    pub fn display_mean(&self) -> Option<f64> {
        self.mean.map(|m| (m * 100.0).round() / 100.0)
    }
}

/// Vista estructurada que consume cualquier front-end: los últimos
/// eventos más las métricas agregadas. Su renderizado (HTML, texto...)
/// queda fuera del núcleo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsView {
    pub recent: Vec<DetectionEvent>,
    pub aggregate: HistoryAggregate,
}

impl StatsView {
    pub fn has_data(&self) -> bool {
        self.aggregate.total > 0
    }
}
