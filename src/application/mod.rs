pub mod dto;
pub mod event_builder;
pub mod ports;
pub mod services;
