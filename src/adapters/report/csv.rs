use std::path::Path;

use crate::application::ports::ReportWriterPort;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::event::DetectionEvent;

/// Cabecera fija del artefacto tabular.
pub const HEADER: [&str; 3] = ["Filename", "Datetime", "TargetCount"];

/// Exportador tabular: CSV con cabecera fija y una fila por evento, en
/// el mismo orden que el exportador de documento (más reciente primero).
/// La codificación es sin pérdidas: releer el fichero reproduce cada
/// campo exactamente.
pub struct CsvReportWriter;

impl ReportWriterPort for CsvReportWriter {
    fn write(&self, events: &[DetectionEvent], path: &Path) -> DomainResult<()> {
        let mut writer = csv::Writer::from_path(path).map_err(export_err)?;

        writer.write_record(HEADER).map_err(export_err)?;
        for event in events {
            writer
                .write_record([
                    event.filename.as_str(),
                    &event.timestamp_text(),
                    &event.target_count.to_string(),
                ])
                .map_err(export_err)?;
        }

        writer
            .flush()
            .map_err(|e| DomainError::ExportFailure(e.to_string()))?;
        Ok(())
    }
}

fn export_err(e: csv::Error) -> DomainError {
    DomainError::ExportFailure(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn events() -> Vec<DetectionEvent> {
        // Orden descendente de id, como sale de `all()`.
        (0..3u32)
            .map(|i| DetectionEvent {
                id: (3 - i) as i64,
                filename: format!("image_1015{:02}_{i:03}.jpg", 30 + i),
                timestamp: NaiveDate::from_ymd_opt(2026, 8, 25)
                    .unwrap()
                    .and_hms_opt(10, 15, 30 + i)
                    .unwrap(),
                target_count: 5 - i,
            })
            .collect()
    }

    #[test]
    fn round_trip_reproduces_every_field_exactly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        let events = events();

        CsvReportWriter.write(&events, &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        assert_eq!(
            reader.headers().unwrap(),
            &csv::StringRecord::from(HEADER.to_vec())
        );

        let rows: Vec<csv::StringRecord> =
            reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), events.len());

        for (row, event) in rows.iter().zip(&events) {
            assert_eq!(&row[0], event.filename.as_str());
            assert_eq!(&row[1], event.timestamp_text().as_str());
            assert_eq!(&row[2], event.target_count.to_string().as_str());
        }
    }

    #[test]
    fn empty_history_writes_only_the_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");

        CsvReportWriter.write(&[], &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        assert_eq!(reader.records().count(), 0);
    }
}
