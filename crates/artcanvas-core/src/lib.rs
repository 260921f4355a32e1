//! Art Canvas Core Library
//!
//! Platform-agnostic drawing engine: strokes, shapes, layers, the view
//! transform and a bounded, scrubbable undo history.

pub mod camera;
pub mod canvas;
pub mod color;
pub mod history;
pub mod input;
pub mod layers;
pub mod scheduler;
pub mod shapes;
pub mod shortcuts;
pub mod stroke;
pub mod tools;

pub use camera::Camera;
pub use canvas::{Canvas, CanvasConfig, CanvasStats, Viewport};
pub use color::{ColorParseError, DEFAULT_COLOR, PALETTE, SerializableColor};
pub use history::{DEFAULT_HISTORY_CAPACITY, History, HistoryRing, HistoryStats};
pub use input::{KeyEvent, Modifiers, PointerEvent};
pub use layers::{Layer, LayerId, LayerRegistry, LayerRegistryError};
pub use scheduler::{FrameHandle, RedrawScheduler};
pub use shapes::{Shape, ShapeId, ShapeKind};
pub use shortcuts::{Shortcut, ShortcutAction, ShortcutRegistry};
pub use stroke::{ActiveStroke, Segment, Stroke, StrokeId};
pub use tools::{Mode, ToolKind, ToolManager, ToolState};
