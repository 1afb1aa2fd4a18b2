use std::sync::Arc;

use crate::application::services::{DetectionService, ReportService};

/// Estado compartido para los manejadores HTTP de Axum.
/// Siguiendo la Arquitectura Hexagonal, el estado contiene los servicios
/// (Casos de Uso); los manejadores no conocen adaptadores concretos.
#[derive(Clone)]
pub struct HttpState {
    /// Pipeline de detección: procesar imagen, estadísticas, vaciado.
    pub detection: Arc<DetectionService>,
    /// Generación de reportes exportables sobre el historial.
    pub reports: Arc<ReportService>,
}
