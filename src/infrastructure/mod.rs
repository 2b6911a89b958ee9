// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod event_stream;
pub mod ha_history;
