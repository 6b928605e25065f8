pub mod client;
pub mod remote;

use thiserror::Error;

pub use client::UpstreamClient;
pub use remote::{RemoteAssistant, RemoteBackend};

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream request failed: {0}")]
    Http(String),
    #[error("upstream returned status {0}")]
    Status(u16),
    #[error("not found")]
    NotFound,
    #[error("invalid upstream response: {0}")]
    InvalidResponse(String),
}
