// Presentation layer - HTTP adapter over the console service
pub mod app_state;
pub mod handlers;
