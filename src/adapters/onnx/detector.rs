use async_trait::async_trait;
use image::RgbImage;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::info;

use crate::adapters::onnx::yolo_engine::OnnxYoloEngine;
use crate::application::ports::DetectorPort;
use crate::domain::detection::Detection;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::model::{ModelId, YoloParams};

/// Adaptador del puerto de detección sobre el motor YOLO/ONNX.
/// La inferencia es pesada: se despacha a un hilo bloqueante de Tokio y
/// nunca se ejecuta dentro de una sección crítica del historial.
pub struct OnnxDetector {
    engine: Arc<Mutex<OnnxYoloEngine>>,
    params: YoloParams,
}

impl OnnxDetector {
    /// Valida la ruta del modelo y carga la sesión ONNX una sola vez al
    /// arranque del proceso.
    pub fn load(model: &ModelId, params: YoloParams) -> anyhow::Result<Self> {
        if model.onnx_path.trim().is_empty() {
            anyhow::bail!("onnx_path vacío");
        }
        if !Path::new(&model.onnx_path).exists() {
            anyhow::bail!("modelo no encontrado: {}", model.onnx_path);
        }

        let engine = OnnxYoloEngine::load(&model.onnx_path)?;
        info!(model = %model.name, path = %model.onnx_path, "Modelo YOLO cargado");

        Ok(Self {
            engine: Arc::new(Mutex::new(engine)),
            params,
        })
    }
}

#[async_trait]
impl DetectorPort for OnnxDetector {
    async fn detect(&self, image: RgbImage) -> DomainResult<Vec<Detection>> {
        let engine = self.engine.clone();
        let params = self.params.clone();

        tokio::task::spawn_blocking(move || {
            let mut engine = engine
                .lock()
                .map_err(|_| DomainError::DetectionFailure("motor de inferencia envenenado".into()))?;
            engine
                .infer(&image, &params)
                .map_err(|e| DomainError::DetectionFailure(e.to_string()))
        })
        .await
        .map_err(|e| DomainError::DetectionFailure(format!("tarea de inferencia abortada: {e}")))?
    }
}
