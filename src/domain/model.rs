use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelId {
    pub name: String,      // nombre lógico, p.ej. "yolo11n"
    pub onnx_path: String, // ruta en el sistema de ficheros
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YoloParams {
    pub input_size: u32,       // 640 típico
    pub conf_threshold: f32,   // 0..1
    pub max_detections: usize, // p.ej. 300
}

impl Default for YoloParams {
    fn default() -> Self {
        Self {
            input_size: 640,
            conf_threshold: 0.25,
            max_detections: 100,
        }
    }
}
