// Application state for HTTP handlers
use crate::application::console_service::ConsoleService;

#[derive(Clone)]
pub struct AppState {
    pub console: ConsoleService,
}
