//! Host errors.

use artcanvas_render::RendererError;
use thiserror::Error;

/// Errors surfaced by the headless host.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Render error: {0}")]
    Render(#[from] RendererError),
    #[error("No layer at index {0}")]
    UnknownLayer(usize),
}

pub type AppResult<T> = Result<T, AppError>;
