use crate::backend::MouseButton;
use crate::context::FrameControl;
use crate::dispatch::{PointerClickable, PointerMovable};
use crate::geom::Point;

/// Zoom change per pixel of vertical drag.
pub const ZOOM_PER_PIXEL: f32 = 0.01;

/// Mouse-driven camera: drag with the left button to pan, drag vertically
/// with the right button to zoom, click the middle button to reset zoom.
///
/// While zooming, every move adds `ZOOM_PER_PIXEL * (start_y - y)` to the
/// current zoom, so holding the pointer above the drag start keeps zooming in.
///
/// Register it first so widgets added afterwards get the pointer before it
/// does; it then only sees events nothing on top of the map consumed.
#[derive(Debug, Default, Clone, Copy)]
pub struct CameraController {
    pan_from: Option<Point>,
    zoom_from: Option<i32>,
}

impl CameraController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_panning(&self) -> bool {
        self.pan_from.is_some()
    }

    pub fn is_zooming(&self) -> bool {
        self.zoom_from.is_some()
    }
}

impl PointerMovable for CameraController {
    fn on_pointer_move(&mut self, ctl: &mut FrameControl<'_>, x: i32, y: i32) -> bool {
        if let Some(from) = self.pan_from {
            ctl.camera.translate(x.saturating_sub(from.x), y.saturating_sub(from.y));
            self.pan_from = Some(Point::new(x, y));
            return true;
        }
        if let Some(start_y) = self.zoom_from {
            let zoom = ctl.camera.zoom() + ZOOM_PER_PIXEL * start_y.saturating_sub(y) as f32;
            ctl.camera.set_zoom(zoom);
        }
        false
    }
}

impl PointerClickable for CameraController {
    fn on_pointer_button(
        &mut self,
        ctl: &mut FrameControl<'_>,
        x: i32,
        y: i32,
        button: MouseButton,
        pressed: bool,
    ) -> bool {
        match button {
            MouseButton::Left => {
                self.pan_from = pressed.then(|| Point::new(x, y));
                true
            }
            MouseButton::Right => {
                self.zoom_from = pressed.then_some(y);
                true
            }
            MouseButton::Middle => {
                ctl.camera.set_zoom(1.0);
                false
            }
            MouseButton::Other(_) => false,
        }
    }
}
