//! Art Canvas Application
//!
//! Headless host for the drawing engine: loads configuration, replays
//! scripted input sessions through the redraw loop and exports the result.

mod app;
mod config;
mod error;
mod session;

pub use app::{App, ReplayReport};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use session::{Session, SessionAction};
