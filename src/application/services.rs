use image::RgbImage;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::application::event_builder::EventBuilder;
use crate::application::ports::{DetectorPort, HistoryStorePort, ReportWriterPort};
use crate::domain::{detection::Detection, errors::DomainResult, stats::StatsView};

/// Cuántos eventos recientes muestra la vista de estadísticas.
pub const RECENT_LIMIT: u32 = 5;

/// Orquestador del pipeline de eventos de detección:
/// imagen → detecciones → evento → historial → estadísticas.
#[derive(Clone)]
pub struct DetectionService {
    detector: Arc<dyn DetectorPort>,
    builder: Arc<EventBuilder>,
    store: Arc<dyn HistoryStorePort>,
}

impl DetectionService {
    pub fn new(
        detector: Arc<dyn DetectorPort>,
        builder: Arc<EventBuilder>,
        store: Arc<dyn HistoryStorePort>,
    ) -> Self {
        Self {
            detector,
            builder,
            store,
        }
    }

    /// Procesa una imagen de principio a fin. La inferencia corre fuera
    /// de cualquier sección crítica del store; el append posterior es la
    /// única escritura. Un resultado sin detecciones de la clase objetivo
    /// sigue generando un evento con `target_count = 0`.
    pub async fn process_image(
        &self,
        image: RgbImage,
    ) -> DomainResult<(Vec<Detection>, StatsView)> {
        let detections = self.detector.detect(image).await?;
        let event = self.builder.build(&detections);
        let target_count = event.target_count;
        let id = self.store.append(event).await?;

        info!(
            id,
            target_count,
            total_detections = detections.len(),
            "Evento de detección registrado"
        );

        let stats = self.summarize().await?;
        Ok((detections, stats))
    }

    /// Lectura pura: últimos eventos + métricas agregadas. Segura de
    /// llamar repetidamente y en paralelo con appends.
    pub async fn summarize(&self) -> DomainResult<StatsView> {
        let recent = self.store.recent(RECENT_LIMIT).await?;
        let aggregate = self.store.aggregate().await?;
        Ok(StatsView { recent, aggregate })
    }

    /// Vacía el historial (los ids futuros siguen creciendo) y devuelve
    /// la vista resultante, ya sin datos.
    pub async fn clear_history(&self) -> DomainResult<StatsView> {
        self.store.clear().await?;
        info!("Historial vaciado");
        self.summarize().await
    }
}

/// Generación de reportes sobre el historial completo. Ambos exportadores
/// leen el mismo `all()` y por tanto comparten orden (más reciente
/// primero); ninguno muta el store.
#[derive(Clone)]
pub struct ReportService {
    store: Arc<dyn HistoryStorePort>,
    document: Arc<dyn ReportWriterPort>,
    spreadsheet: Arc<dyn ReportWriterPort>,
    export_dir: PathBuf,
}

impl ReportService {
    pub fn new(
        store: Arc<dyn HistoryStorePort>,
        document: Arc<dyn ReportWriterPort>,
        spreadsheet: Arc<dyn ReportWriterPort>,
        export_dir: PathBuf,
    ) -> Self {
        Self {
            store,
            document,
            spreadsheet,
            export_dir,
        }
    }

    /// Documento paginado (PDF) con una línea por evento.
    pub async fn export_document(&self) -> DomainResult<PathBuf> {
        let events = self.store.all().await?;
        let path = self.export_dir.join("report.pdf");
        self.document.write(&events, &path)?;
        info!(path = %path.display(), rows = events.len(), "Reporte PDF generado");
        Ok(path)
    }

    /// Artefacto tabular (CSV) con cabecera fija y una fila por evento.
    pub async fn export_spreadsheet(&self) -> DomainResult<PathBuf> {
        let events = self.store.all().await?;
        let path = self.export_dir.join("report.csv");
        self.spreadsheet.write(&events, &path)?;
        info!(path = %path.display(), rows = events.len(), "Reporte CSV generado");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::report::csv::CsvReportWriter;
    use crate::adapters::report::pdf::{render_lines, PdfReportWriter};
    use crate::adapters::sqlite::history_repo::SqliteHistoryStore;
    use crate::application::event_builder::{Clock, SystemClock};
    use crate::domain::errors::DomainError;
    use crate::domain::event::NewEvent;
    use async_trait::async_trait;
    use chrono::NaiveDate;

    /// Doble de prueba del puerto de detección: devuelve siempre el
    /// mismo conjunto de etiquetas, o falla si así se configura.
    struct FakeDetector {
        labels: Vec<&'static str>,
        fail: bool,
    }

    #[async_trait]
    impl DetectorPort for FakeDetector {
        async fn detect(&self, _image: RgbImage) -> DomainResult<Vec<Detection>> {
            if self.fail {
                return Err(DomainError::DetectionFailure("modelo caído".into()));
            }
            Ok(self
                .labels
                .iter()
                .map(|label| Detection {
                    x1: 0.0,
                    y1: 0.0,
                    x2: 1.0,
                    y2: 1.0,
                    score: 0.8,
                    class_id: 0,
                    label: (*label).into(),
                })
                .collect())
        }
    }

    async fn service(labels: Vec<&'static str>, fail: bool) -> DetectionService {
        let store = SqliteHistoryStore::open_in_memory().await.unwrap();
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        DetectionService::new(
            Arc::new(FakeDetector { labels, fail }),
            Arc::new(EventBuilder::new("skateboard", clock)),
            Arc::new(store),
        )
    }

    fn blank_image() -> RgbImage {
        RgbImage::new(4, 4)
    }

    #[tokio::test]
    async fn process_image_persists_event_and_returns_stats() {
        let svc = service(vec!["skateboard", "person", "skateboard"], false).await;
        let (detections, stats) = svc.process_image(blank_image()).await.unwrap();

        assert_eq!(detections.len(), 3);
        assert_eq!(stats.aggregate.total, 1);
        assert_eq!(stats.aggregate.mean, Some(2.0));
        assert_eq!(stats.aggregate.max, Some(2));
        assert_eq!(stats.recent.len(), 1);
        assert_eq!(stats.recent[0].target_count, 2);
    }

    #[tokio::test]
    async fn zero_target_detections_still_create_an_event() {
        let svc = service(vec!["person", "dog"], false).await;
        let (_, stats) = svc.process_image(blank_image()).await.unwrap();

        assert_eq!(stats.aggregate.total, 1);
        assert_eq!(stats.recent[0].target_count, 0);
        // Cero no es "sin datos": la media existe y vale 0.
        assert_eq!(stats.aggregate.mean, Some(0.0));
    }

    #[tokio::test]
    async fn detection_failure_does_not_append_anything() {
        let svc = service(vec![], true).await;
        let err = svc.process_image(blank_image()).await.unwrap_err();
        assert!(matches!(err, DomainError::DetectionFailure(_)));

        let stats = svc.summarize().await.unwrap();
        assert_eq!(stats.aggregate.total, 0);
    }

    fn stored_event(count: u32) -> NewEvent {
        NewEvent {
            filename: format!("image_101530_{count:03}.jpg"),
            timestamp: NaiveDate::from_ymd_opt(2026, 8, 25)
                .unwrap()
                .and_hms_opt(10, 15, 30)
                .unwrap(),
            target_count: count,
        }
    }

    #[tokio::test]
    async fn both_exporters_emit_one_row_per_event_in_store_order() {
        let store = Arc::new(SqliteHistoryStore::open_in_memory().await.unwrap());
        for count in [1u32, 4, 2] {
            store.append(stored_event(count)).await.unwrap();
        }

        let dir = tempfile::tempdir().unwrap();
        let reports = ReportService::new(
            store.clone(),
            Arc::new(PdfReportWriter),
            Arc::new(CsvReportWriter),
            dir.path().to_path_buf(),
        );

        let all = store.all().await.unwrap();
        let document = reports.export_document().await.unwrap();
        let spreadsheet = reports.export_spreadsheet().await.unwrap();

        // El documento sale del mismo listado: una línea por evento, en
        // el mismo orden descendente que `all()`.
        assert!(std::fs::metadata(&document).unwrap().len() > 0);
        let lines = render_lines(&all);
        assert_eq!(lines.len(), all.len());
        for (line, event) in lines.iter().zip(&all) {
            assert!(line.contains(&event.filename));
        }

        let mut reader = csv::Reader::from_path(&spreadsheet).unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), all.len());
        for (row, event) in rows.iter().zip(&all) {
            assert_eq!(&row[0], event.filename.as_str());
        }
    }

    #[tokio::test]
    async fn clear_history_yields_the_no_data_state() {
        let svc = service(vec!["skateboard"], false).await;
        svc.process_image(blank_image()).await.unwrap();

        let stats = svc.clear_history().await.unwrap();
        assert_eq!(stats.aggregate.total, 0);
        assert_eq!(stats.aggregate.mean, None);
        assert_eq!(stats.aggregate.max, None);
        assert!(stats.recent.is_empty());
    }
}
