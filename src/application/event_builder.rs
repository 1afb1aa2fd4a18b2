use chrono::{Local, NaiveDateTime, Timelike};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use crate::domain::detection::Detection;
use crate::domain::event::NewEvent;

/// Reloj inyectable para que el builder sea determinista en tests.
pub trait Clock: Send + Sync {
    /// Instante actual con precisión de segundos.
    fn now(&self) -> NaiveDateTime;
}

/// Reloj de producción: hora local del proceso, truncada a segundos.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        let now = Local::now().naive_local();
        now.with_nanosecond(0).unwrap_or(now)
    }
}

/// Convierte la salida del adaptador de detección en un `NewEvent`:
/// cuenta las detecciones cuya etiqueta coincide exactamente (sensible a
/// mayúsculas) con la clase objetivo, captura el timestamp del reloj y
/// genera un nombre de fichero único dentro de la ejecución del proceso.
/// No tiene modos de fallo.
pub struct EventBuilder {
    target_label: String,
    clock: Arc<dyn Clock>,
    seq: AtomicU32,
}

impl EventBuilder {
    pub fn new(target_label: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            target_label: target_label.into(),
            clock,
            seq: AtomicU32::new(0),
        }
    }

    pub fn build(&self, detections: &[Detection]) -> NewEvent {
        let timestamp = self.clock.now();
        // El sufijo de secuencia evita colisiones entre dos eventos
        // creados dentro del mismo segundo.
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        let filename = format!("image_{}_{:03}.jpg", timestamp.format("%H%M%S"), seq);

        let target_count = detections
            .iter()
            .filter(|d| d.label == self.target_label)
            .count() as u32;

        NewEvent {
            filename,
            timestamp,
            target_count,
        }
    }
}
