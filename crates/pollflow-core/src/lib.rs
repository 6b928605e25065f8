pub mod assistant;
pub mod backend;
pub mod error;
pub mod id;
pub mod local;
pub mod report;
pub mod results;
pub mod session;

use std::sync::Arc;

pub use error::CoreError;

/// Shared state handed to every request handler. The backend and assistant
/// are chosen once at startup from configuration; handlers never know which
/// implementation they are talking to.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn backend::PollBackend>,
    pub assistant: Arc<dyn assistant::Assistant>,
}
