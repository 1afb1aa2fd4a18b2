pub mod detection;
pub mod errors;
pub mod event;
pub mod model;
pub mod stats;
