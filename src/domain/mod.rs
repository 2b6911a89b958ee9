// Domain layer - Console data model
pub mod channel;
pub mod console;
pub mod geometry;
pub mod reading;
pub mod sample;
