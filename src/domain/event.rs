use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Formato con precisión de segundos usado en la tabla y en los reportes.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Evento persistido en el historial. Inmutable una vez creado:
/// el `id` lo asigna el store al insertar y nunca se reutiliza,
/// ni siquiera después de vaciar el historial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionEvent {
    pub id: i64,
    pub filename: String,
    pub timestamp: NaiveDateTime,
    pub target_count: u32,
}

impl DetectionEvent {
    /// Representación textual del timestamp tal y como se persiste y exporta.
    pub fn timestamp_text(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Evento recién construido, todavía sin `id`. Solo el EventBuilder
/// produce valores de este tipo; el store los convierte en
/// `DetectionEvent` al asignarles un id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub filename: String,
    pub timestamp: NaiveDateTime,
    pub target_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn timestamp_text_uses_second_precision() {
        let event = DetectionEvent {
            id: 1,
            filename: "image_101530_000.jpg".into(),
            timestamp: NaiveDate::from_ymd_opt(2026, 8, 25)
                .unwrap()
                .and_hms_opt(10, 15, 30)
                .unwrap(),
            target_count: 2,
        };
        assert_eq!(event.timestamp_text(), "2026-08-25 10:15:30");
    }
}
