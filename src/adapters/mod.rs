pub mod http;
pub mod onnx;
pub mod report;
pub mod sqlite;
