mod adapters;
mod application;
mod domain;

use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;

use crate::adapters::{
    http::{router, state::HttpState},
    onnx::detector::OnnxDetector,
    report::{csv::CsvReportWriter, pdf::PdfReportWriter},
    sqlite::history_repo::SqliteHistoryStore,
};
use crate::application::event_builder::{EventBuilder, SystemClock};
use crate::application::services::{DetectionService, ReportService};
use crate::domain::model::{ModelId, YoloParams};

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Inicializar logs (RUST_LOG=info por defecto)
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let model_path = env_or("SKATE_MODEL", "models/yolo11n.onnx");
    let db_path = PathBuf::from(env_or("SKATE_DB", "history.db"));
    let export_dir = PathBuf::from(env_or("SKATE_EXPORT_DIR", "."));
    let target_label = env_or("SKATE_TARGET_LABEL", "skateboard");

    tracing::info!("🔧 Inicializando adaptadores de infraestructura...");

    // 2. Instanciar Adaptadores (Capa de Infraestructura)
    // Usamos Arc porque serán compartidos entre servicios y el servidor HTTP.
    let detector = Arc::new(OnnxDetector::load(
        &ModelId {
            name: "yolo".into(),
            onnx_path: model_path,
        },
        YoloParams::default(),
    )?);
    let store = Arc::new(SqliteHistoryStore::open(&db_path).await?);
    let builder = Arc::new(EventBuilder::new(target_label, Arc::new(SystemClock)));

    // 3. Instanciar Servicios (Capa de Aplicación - Casos de Uso)
    let detection_service = Arc::new(DetectionService::new(
        detector,
        builder,
        store.clone(),
    ));
    let report_service = Arc::new(ReportService::new(
        store,
        Arc::new(PdfReportWriter),
        Arc::new(CsvReportWriter),
        export_dir,
    ));

    // 4. Configurar el Estado de la API
    let state = HttpState {
        detection: detection_service,
        reports: report_service,
    };

    // 5. Configurar el Router de Axum y Archivos Estáticos
    let app = router(state).fallback_service(ServeDir::new("static"));

    // 6. Lanzar el Servidor
    let port: u16 = env_or("PORT", "7860").parse()?;
    let addr = format!("0.0.0.0:{}", port);

    tracing::info!("🚀 Servidor de detección iniciado en http://{}", addr);
    tracing::info!("📂 Archivos estáticos servidos desde la carpeta './static'");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
