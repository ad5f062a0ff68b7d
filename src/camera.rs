use crate::geom::Rect;

pub const MIN_ZOOM: f32 = 0.1;
pub const MAX_ZOOM: f32 = 10.0;

/// Pan offset and zoom factor shared by the map renderer and the input
/// listeners that drive it.
///
/// Translation is applied per rect; zoom is applied once per pass as a
/// backend-global scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    translation_x: i32,
    translation_y: i32,
    zoom: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            translation_x: 0,
            translation_y: 0,
            zoom: 1.0,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.translation_x = self.translation_x.saturating_add(dx);
        self.translation_y = self.translation_y.saturating_add(dy);
    }

    pub fn set_translation(&mut self, x: i32, y: i32) {
        self.translation_x = x;
        self.translation_y = y;
    }

    pub fn translation(&self) -> (i32, i32) {
        (self.translation_x, self.translation_y)
    }

    /// Sets the zoom, clamped into `[MIN_ZOOM, MAX_ZOOM]`. NaN is ignored.
    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom.is_nan() {
            return;
        }
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn apply_translation(&self, x: i32, y: i32) -> (i32, i32) {
        (x + self.translation_x, y + self.translation_y)
    }

    pub fn apply_to_rect(&self, rect: Rect) -> Rect {
        rect.translated(self.translation_x, self.translation_y)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
