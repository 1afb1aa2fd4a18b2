use thiserror::Error;

/// Taxonomía de fallos del pipeline. Ninguno se convierte silenciosamente
/// en un resultado vacío: "no se detectó nada" y "la detección falló"
/// son estados distintos y deben seguir siéndolo.
#[derive(Debug, Error)]
pub enum DomainError {
    /// El modelo no pudo procesar la imagen (entrada malformada,
    /// capacidad no disponible). No se reintenta automáticamente.
    #[error("Fallo de detección: {0}")]
    DetectionFailure(String),

    /// La capa de persistencia no pudo completar la operación. La
    /// operación que lo provocó se considera fallida por completo,
    /// nunca parcialmente aplicada.
    #[error("Historial no disponible: {0}")]
    StoreUnavailable(String),

    /// La generación de un reporte no pudo completarse; ningún artefacto
    /// parcial se devuelve como salida válida.
    #[error("Fallo de exportación: {0}")]
    ExportFailure(String),

    /// Petición malformada en la frontera HTTP.
    #[error("Entrada inválida: {0}")]
    InvalidInput(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
