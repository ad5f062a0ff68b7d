//! The two capabilities the engine needs from a graphics backend: somewhere
//! to draw, and somewhere to read input from.

mod mq;

pub use mq::{load_tilemap, load_tileset_texture, MacroquadBackend, MacroquadEvents};

use crate::error::BackendError;
use crate::geom::{Rect, Rgba};
use std::collections::VecDeque;

/// Drawing surface.
pub trait RenderBackend {
    /// Decoded image handle owned by tilesets and widgets.
    type Texture;

    /// Copies `src` from `texture` into `dest`, both in unscaled pixels.
    fn draw_image(
        &mut self,
        texture: &Self::Texture,
        src: Rect,
        dest: Rect,
    ) -> Result<(), BackendError>;

    /// Scales every subsequent draw. `(1.0, 1.0)` is identity.
    fn set_scale(&mut self, sx: f32, sy: f32) -> Result<(), BackendError>;

    fn clear(&mut self, color: Rgba) -> Result<(), BackendError>;

    fn present(&mut self) -> Result<(), BackendError>;

    /// Visible area in the current (scaled) coordinate space.
    fn viewport(&self) -> Rect;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    Other(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Escape,
    Other(u32),
}

/// Input as delivered by an [`EventSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    PointerMove {
        x: i32,
        y: i32,
    },
    PointerButton {
        x: i32,
        y: i32,
        button: MouseButton,
        pressed: bool,
    },
    Key {
        code: KeyCode,
        pressed: bool,
    },
    Quit,
}

/// Pending input, drained once per frame until it returns `None`.
pub trait EventSource {
    fn poll_event(&mut self) -> Option<InputEvent>;
}

impl EventSource for VecDeque<InputEvent> {
    fn poll_event(&mut self) -> Option<InputEvent> {
        self.pop_front()
    }
}
