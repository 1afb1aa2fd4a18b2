use async_trait::async_trait;
use image::RgbImage;
use std::path::Path;

use crate::domain::{
    detection::Detection,
    errors::DomainResult,
    event::{DetectionEvent, NewEvent},
    stats::HistoryAggregate,
};

/// Capacidad de detección opaca: dada una imagen decodificada, devuelve
/// cero o más detecciones etiquetadas. Cualquier modelo que cumpla este
/// contrato es intercambiable (incluidos dobles de prueba). Un error del
/// modelo se propaga como `DetectionFailure`; nunca se devuelve una lista
/// vacía para encubrir un fallo.
#[async_trait]
pub trait DetectorPort: Send + Sync {
    async fn detect(&self, image: RgbImage) -> DomainResult<Vec<Detection>>;
}

/// Log duradero y ordenado de eventos de detección. Cada operación se
/// ejecuta dentro de su propia sección crítica (ningún lock sobrevive a
/// la llamada); la inferencia nunca ocurre con un lock del store en mano.
#[async_trait]
pub trait HistoryStorePort: Send + Sync {
    /// Asigna el siguiente id, persiste el evento de forma atómica y
    /// devuelve el id asignado. Los ids nunca se reutilizan.
    async fn append(&self, event: NewEvent) -> DomainResult<i64>;

    /// Los `n` eventos más recientes, del más nuevo al más viejo.
    /// Longitud = min(n, total almacenado).
    async fn recent(&self, n: u32) -> DomainResult<Vec<DetectionEvent>>;

    /// Historial completo en orden de id descendente (el mismo orden que
    /// consumen los exportadores).
    async fn all(&self) -> DomainResult<Vec<DetectionEvent>>;

    /// Total / media / máximo de `target_count` en una sola pasada.
    async fn aggregate(&self) -> DomainResult<HistoryAggregate>;

    /// Vacía el historial de forma atómica. No reinicia el contador de
    /// ids: los siguientes continúan desde la marca previa.
    async fn clear(&self) -> DomainResult<()>;
}

/// Renderiza el historial completo a un artefacto en disco. Función pura
/// del contenido recibido; no toca el store. Un fallo de escritura se
/// propaga como `ExportFailure`.
pub trait ReportWriterPort: Send + Sync {
    fn write(&self, events: &[DetectionEvent], path: &Path) -> DomainResult<()>;
}
