pub mod cull;

use crate::backend::RenderBackend;
use crate::camera::Camera;
use crate::error::{BackendError, EngineError, Result};
use crate::map::TileMap;
use std::cell::RefCell;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;
use tracing::warn;

/// Something the frame driver draws once per frame, in registration order.
pub trait Renderable<B: RenderBackend> {
    fn render(&mut self, backend: &mut B, camera: &Camera) -> Result<()>;
}

impl<B: RenderBackend, T: Renderable<B>> Renderable<B> for Rc<RefCell<T>> {
    fn render(&mut self, backend: &mut B, camera: &Camera) -> Result<()> {
        self.borrow_mut().render(backend, camera)
    }
}

impl<B: RenderBackend> Renderable<B> for TileMap<B::Texture> {
    fn render(&mut self, backend: &mut B, camera: &Camera) -> Result<()> {
        render_tilemap(self, camera, backend).map(|_| ())
    }
}

/// Holds a non-identity backend scale and restores identity when dropped,
/// including when a draw in between fails.
pub struct ScaleGuard<'a, B: RenderBackend> {
    backend: &'a mut B,
}

impl<'a, B: RenderBackend> ScaleGuard<'a, B> {
    pub fn new(backend: &'a mut B, scale: f32) -> Result<Self, BackendError> {
        backend.set_scale(scale, scale)?;
        Ok(Self { backend })
    }
}

impl<B: RenderBackend> Deref for ScaleGuard<'_, B> {
    type Target = B;

    fn deref(&self) -> &B {
        self.backend
    }
}

impl<B: RenderBackend> DerefMut for ScaleGuard<'_, B> {
    fn deref_mut(&mut self) -> &mut B {
        self.backend
    }
}

impl<B: RenderBackend> Drop for ScaleGuard<'_, B> {
    fn drop(&mut self) {
        if let Err(e) = self.backend.set_scale(1.0, 1.0) {
            warn!(error = %e, "failed to reset render scale");
        }
    }
}

/// Draws every visible layer of `map` in load order and returns the number
/// of draw calls issued.
///
/// The camera zoom is applied as one backend scale for the whole pass; the
/// camera translation is applied to each tile. Tiles outside the viewport
/// padded by one tile are skipped without a draw call.
pub fn render_tilemap<B: RenderBackend>(
    map: &TileMap<B::Texture>,
    camera: &Camera,
    backend: &mut B,
) -> Result<usize> {
    let mut backend = ScaleGuard::new(backend, camera.zoom())?;
    let (tile_w, tile_h) = map.tile_size();
    let view = cull::expanded_viewport(backend.viewport(), tile_w as i32, tile_h as i32);

    let mut draws = 0;
    for layer in map.layers().iter().filter(|l| l.visibility.is_visible()) {
        for (index, tile_id) in layer.tiles() {
            let dest = camera.apply_to_rect(map.tile_world_rect(index));
            if !dest.has_area() || !cull::is_visible(&dest, &view) {
                continue;
            }

            let (ts, src) = map
                .resolve_tileset(tile_id)
                .and_then(|ts| Some((ts, ts.tile_rect(tile_id)?)))
                .ok_or_else(|| EngineError::UnresolvedTile {
                    layer: layer.name.clone(),
                    index,
                    tile_id,
                })?;
            backend.draw_image(ts.image(), src, dest)?;
            draws += 1;
        }
    }
    Ok(draws)
}
