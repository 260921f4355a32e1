//! Scripted input sessions.
//!
//! A session is a JSON list of actions standing in for what a windowed host
//! would feed the engine: pointer and key events, toolbar clicks, resizes and
//! display refreshes.

use crate::config::hex_color;
use crate::error::AppResult;
use artcanvas_core::color::SerializableColor;
use artcanvas_core::input::{KeyEvent, Modifiers, PointerEvent};
use artcanvas_core::shapes::ShapeKind;
use artcanvas_core::tools::ToolKind;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One scripted step. Layers are addressed by their position in the list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SessionAction {
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp { x: f64, y: f64 },
    PointerLeave,
    Key {
        key: String,
        #[serde(default)]
        modifiers: Modifiers,
    },
    SelectTool { tool: ToolKind },
    SelectShape { shape: Option<ShapeKind> },
    SetColor {
        #[serde(with = "hex_color")]
        color: SerializableColor,
    },
    SetWidth { width: f64 },
    Undo,
    Redo,
    Clear,
    AddLayer,
    DeleteLayer { index: usize },
    ToggleLayer { index: usize },
    SetLayerOpacity { index: usize, opacity: f64 },
    RenameLayer { index: usize, name: String },
    SetActiveLayer { index: usize },
    SetZoom { zoom: f64 },
    ZoomIn,
    ZoomOut,
    ResetView,
    ScrubTo { index: usize },
    ExitScrub,
    Resize {
        width: f64,
        height: f64,
        #[serde(default = "default_scale_factor")]
        scale_factor: f64,
    },
    /// Display refresh: paint the pending frame, if any.
    Frame,
}

fn default_scale_factor() -> f64 {
    1.0
}

impl SessionAction {
    /// Pointer event carried by this action, if it is one.
    pub fn pointer_event(&self) -> Option<PointerEvent> {
        match *self {
            SessionAction::PointerDown { x, y } => Some(PointerEvent::Down {
                position: Point::new(x, y),
            }),
            SessionAction::PointerMove { x, y } => Some(PointerEvent::Move {
                position: Point::new(x, y),
            }),
            SessionAction::PointerUp { x, y } => Some(PointerEvent::Up {
                position: Point::new(x, y),
            }),
            SessionAction::PointerLeave => Some(PointerEvent::Leave),
            _ => None,
        }
    }

    /// Key event carried by this action, if it is one.
    pub fn key_event(&self) -> Option<KeyEvent> {
        match self {
            SessionAction::Key { key, modifiers } => Some(KeyEvent::new(key.clone(), *modifiers)),
            _ => None,
        }
    }
}

/// A scripted session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub actions: Vec<SessionAction>,
}

impl Session {
    pub fn from_json_str(text: &str) -> AppResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let session = Self::from_json_str(&text)?;
        log::debug!(
            "Loaded session with {} actions from {:?}",
            session.actions.len(),
            path.as_ref()
        );
        Ok(session)
    }
}
