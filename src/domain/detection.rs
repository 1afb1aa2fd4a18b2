use serde::{Deserialize, Serialize};

/// Una detección individual producida por el modelo: caja en coordenadas
/// de la imagen original, confianza en [0,1] y etiqueta de clase.
/// La geometría solo la consume el front-end para dibujar las cajas;
/// el núcleo del pipeline únicamente mira la etiqueta.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub score: f32,
    pub class_id: usize,
    pub label: String,
}
