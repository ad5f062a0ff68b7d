use super::{EventSource, InputEvent, KeyCode, MouseButton, RenderBackend};
use crate::config::EngineConfig;
use crate::error::{BackendError, EngineError, Result};
use crate::geom::{Rect, Rgba};
use crate::loader::json_loader::decode_map_file_to_ir;
use crate::map::TileMap;
use macroquad::color::{Color, WHITE};
use macroquad::input::{
    is_key_pressed, is_key_released, is_mouse_button_pressed, is_mouse_button_released,
    is_quit_requested, mouse_position, prevent_quit, KeyCode as MqKeyCode,
    MouseButton as MqMouseButton,
};
use macroquad::math::{vec2, Rect as MqRect};
use macroquad::texture::{draw_texture_ex, load_texture, DrawTextureParams, FilterMode, Texture2D};
use macroquad::window::{clear_background, screen_height, screen_width, Conf};
use std::collections::VecDeque;
use std::path::Path;
use tracing::debug;

impl From<&EngineConfig> for Conf {
    fn from(cfg: &EngineConfig) -> Self {
        Conf {
            window_title: cfg.title.clone(),
            window_width: cfg.window_width,
            window_height: cfg.window_height,
            ..Default::default()
        }
    }
}

fn to_color(c: Rgba) -> Color {
    Color::from_rgba(c.r, c.g, c.b, c.a)
}

/// Draws through macroquad's immediate-mode texture calls.
///
/// The global scale is kept here and multiplied into every destination, so
/// callers work in unscaled coordinates and [`RenderBackend::viewport`]
/// reports the screen in those coordinates.
#[derive(Debug)]
pub struct MacroquadBackend {
    scale: (f32, f32),
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self { scale: (1.0, 1.0) }
    }
}

impl MacroquadBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RenderBackend for MacroquadBackend {
    type Texture = Texture2D;

    fn draw_image(&mut self, texture: &Texture2D, src: Rect, dest: Rect) -> Result<(), BackendError> {
        if !dest.has_area() {
            return Ok(());
        }
        let (sx, sy) = self.scale;
        draw_texture_ex(
            texture,
            dest.x as f32 * sx,
            dest.y as f32 * sy,
            WHITE,
            DrawTextureParams {
                source: Some(MqRect::new(
                    src.x as f32,
                    src.y as f32,
                    src.width as f32,
                    src.height as f32,
                )),
                dest_size: Some(vec2(dest.width as f32 * sx, dest.height as f32 * sy)),
                ..Default::default()
            },
        );
        Ok(())
    }

    fn set_scale(&mut self, sx: f32, sy: f32) -> Result<(), BackendError> {
        if !(sx > 0.0 && sy > 0.0) {
            return Err(BackendError(format!("invalid render scale {sx}x{sy}")));
        }
        self.scale = (sx, sy);
        Ok(())
    }

    fn clear(&mut self, color: Rgba) -> Result<(), BackendError> {
        clear_background(to_color(color));
        Ok(())
    }

    /// Macroquad presents on `next_frame().await`.
    fn present(&mut self) -> Result<(), BackendError> {
        Ok(())
    }

    fn viewport(&self) -> Rect {
        let (sx, sy) = self.scale;
        Rect::new(0, 0, (screen_width() / sx) as i32, (screen_height() / sy) as i32)
    }
}

/// Turns macroquad's per-frame input state into [`InputEvent`]s.
///
/// The first poll of a frame snapshots the input state; the poll that
/// returns `None` re-arms the snapshot for the next frame.
#[derive(Debug)]
pub struct MacroquadEvents {
    pending: VecDeque<InputEvent>,
    last_pointer: Option<(i32, i32)>,
    gathered: bool,
}

impl MacroquadEvents {
    /// Takes over the window close button so it arrives as [`InputEvent::Quit`].
    pub fn new() -> Self {
        prevent_quit();
        Self {
            pending: VecDeque::new(),
            last_pointer: None,
            gathered: false,
        }
    }

    fn gather(&mut self) {
        let (mx, my) = mouse_position();
        let (x, y) = (mx as i32, my as i32);
        if self.last_pointer != Some((x, y)) {
            self.last_pointer = Some((x, y));
            self.pending.push_back(InputEvent::PointerMove { x, y });
        }

        for (mq, button) in [
            (MqMouseButton::Left, MouseButton::Left),
            (MqMouseButton::Middle, MouseButton::Middle),
            (MqMouseButton::Right, MouseButton::Right),
        ] {
            if is_mouse_button_pressed(mq) {
                self.pending.push_back(InputEvent::PointerButton { x, y, button, pressed: true });
            }
            if is_mouse_button_released(mq) {
                self.pending.push_back(InputEvent::PointerButton { x, y, button, pressed: false });
            }
        }

        if is_key_pressed(MqKeyCode::Escape) {
            self.pending.push_back(InputEvent::Key { code: KeyCode::Escape, pressed: true });
        }
        if is_key_released(MqKeyCode::Escape) {
            self.pending.push_back(InputEvent::Key { code: KeyCode::Escape, pressed: false });
        }

        if is_quit_requested() {
            self.pending.push_back(InputEvent::Quit);
        }
    }
}

impl Default for MacroquadEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for MacroquadEvents {
    fn poll_event(&mut self) -> Option<InputEvent> {
        if !self.gathered {
            self.gather();
            self.gathered = true;
        }
        let event = self.pending.pop_front();
        if event.is_none() {
            self.gathered = false;
        }
        event
    }
}

pub async fn load_tileset_texture(path: &Path) -> Result<Texture2D> {
    let texture_error = |reason: String| EngineError::Texture {
        path: path.to_path_buf(),
        reason,
    };
    let s = path
        .to_str()
        .ok_or_else(|| texture_error("path is not valid UTF-8".into()))?;
    let tex = load_texture(s)
        .await
        .map_err(|e| texture_error(format!("{e:?}")))?;
    tex.set_filter(FilterMode::Nearest);
    Ok(tex)
}

/// Loads a Tiled JSON map and every tileset image it references.
pub async fn load_tilemap(path: impl AsRef<Path>) -> Result<TileMap<Texture2D>> {
    let ir = decode_map_file_to_ir(path)?;

    let mut textures = Vec::with_capacity(ir.tilesets.len());
    for t in &ir.tilesets {
        debug!(image = %t.image.display(), "loading tileset texture");
        textures.push(load_tileset_texture(&t.image).await?);
    }

    let mut textures = textures.into_iter();
    TileMap::from_ir(ir, |t| {
        textures.next().ok_or_else(|| EngineError::Texture {
            path: t.image.clone(),
            reason: "texture was not loaded".into(),
        })
    })
}
