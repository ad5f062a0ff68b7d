//! Isometric tile-map renderer for Macroquad, with a pan/zoom camera and a
//! priority-ordered pointer dispatch chain driven by one frame loop.

pub mod backend;
mod camera;
mod config;
mod context;
mod controller;
mod dispatch;
mod error;
mod geom;
pub mod ir_map;
mod layer;
pub mod loader {
    pub mod json_loader;
}
mod map;
pub mod render;
mod tileset;

pub use backend::{EventSource, InputEvent, KeyCode, MouseButton, RenderBackend};
pub use camera::{Camera, MAX_ZOOM, MIN_ZOOM};
pub use config::EngineConfig;
pub use context::{pacing_delay, FrameControl, FrameStats, GameContext, RunState};
pub use controller::CameraController;
pub use dispatch::{EventDispatcher, PointerClickable, PointerMovable};
pub use error::{BackendError, EngineError, Result};
pub use geom::{cartesian_to_isometric, Point, Rect, Rgba, Visibility};
pub use layer::Layer;
pub use map::{MapDimensions, TileMap};
pub use render::{render_tilemap, Renderable, ScaleGuard};
pub use tileset::TileSet;
