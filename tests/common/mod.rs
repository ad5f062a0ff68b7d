#![allow(dead_code)]

use isoframe::{BackendError, Layer, MapDimensions, Rect, RenderBackend, Rgba, TileMap, TileSet};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Clear(Rgba),
    Scale(f32, f32),
    Draw { texture: String, src: Rect, dest: Rect },
    Present,
}

/// In-memory backend that records every call.
#[derive(Debug)]
pub struct RecordingBackend {
    pub calls: Vec<Call>,
    pub screen: Rect,
    /// Fail the n-th draw (0-based).
    pub fail_draw_at: Option<usize>,
    scale: (f32, f32),
    draws: usize,
}

impl RecordingBackend {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            calls: Vec::new(),
            screen: Rect::new(0, 0, width, height),
            fail_draw_at: None,
            scale: (1.0, 1.0),
            draws: 0,
        }
    }

    pub fn draws(&self) -> Vec<(String, Rect, Rect)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Draw { texture, src, dest } => Some((texture.clone(), *src, *dest)),
                _ => None,
            })
            .collect()
    }
}

impl RenderBackend for RecordingBackend {
    type Texture = String;

    fn draw_image(&mut self, texture: &String, src: Rect, dest: Rect) -> Result<(), BackendError> {
        let n = self.draws;
        self.draws += 1;
        if self.fail_draw_at == Some(n) {
            return Err(BackendError(format!("draw {n} failed")));
        }
        self.calls.push(Call::Draw {
            texture: texture.clone(),
            src,
            dest,
        });
        Ok(())
    }

    fn set_scale(&mut self, sx: f32, sy: f32) -> Result<(), BackendError> {
        self.scale = (sx, sy);
        self.calls.push(Call::Scale(sx, sy));
        Ok(())
    }

    fn clear(&mut self, color: Rgba) -> Result<(), BackendError> {
        self.calls.push(Call::Clear(color));
        Ok(())
    }

    fn present(&mut self) -> Result<(), BackendError> {
        self.calls.push(Call::Present);
        Ok(())
    }

    fn viewport(&self) -> Rect {
        let (sx, sy) = self.scale;
        Rect::new(
            self.screen.x,
            self.screen.y,
            (self.screen.width as f32 / sx) as i32,
            (self.screen.height as f32 / sy) as i32,
        )
    }
}

pub fn tileset(name: &str, min: u32, max: u32, columns: u32) -> TileSet<String> {
    TileSet::new(name, min, max, columns, 64, 32, name.to_owned()).expect("valid tileset")
}

/// 64x32 isometric map of `width` columns with the given layers.
pub fn map(width: u32, layers: Vec<Layer>, tilesets: Vec<TileSet<String>>) -> TileMap<String> {
    let cells = layers.first().map_or(0, |l| l.tile_ids.len()) as u32;
    let height = if width == 0 { 0 } else { cells / width };
    TileMap::new(
        MapDimensions {
            tile_w: 64,
            tile_h: 32,
            width,
            height,
        },
        layers,
        tilesets,
    )
    .expect("valid map")
}
