// Application layer - Console state, geometry and the actor that drives them
pub mod chart;
pub mod console;
pub mod console_service;
pub mod error;
pub mod gauge;
pub mod history_source;
pub mod indicators;
pub mod projector;
pub mod sample_store;
pub mod selection;
