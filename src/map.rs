use crate::error::{EngineError, Result};
use crate::geom::{cartesian_to_isometric, Rect};
use crate::ir_map::{IrMap, IrTileset};
use crate::layer::Layer;
use crate::tileset::TileSet;
use tracing::{debug, info};

/// Tile and grid size of a map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapDimensions {
    pub tile_w: u32,
    pub tile_h: u32,
    pub width: u32,
    pub height: u32,
}

/// An isometric tile map: ordered layers plus the tilesets their IDs resolve to.
///
/// Construction validates the whole map, so every non-zero ID in every layer
/// resolves to exactly one tileset for the lifetime of the value. Tile IDs
/// and dimensions are read-only after that; only layer visibility changes.
/// Dropping the map drops the tileset images with it.
#[derive(Debug)]
pub struct TileMap<T> {
    tile_w: u32,
    tile_h: u32,
    width: u32,
    height: u32,
    layers: Vec<Layer>,
    tilesets: Vec<TileSet<T>>,
}

impl<T> TileMap<T> {
    pub fn new(
        dims: MapDimensions,
        layers: Vec<Layer>,
        mut tilesets: Vec<TileSet<T>>,
    ) -> Result<Self> {
        tilesets.sort_by_key(|t| t.min_tile_id());

        for pair in tilesets.windows(2) {
            if pair[1].min_tile_id() <= pair[0].max_tile_id() {
                return Err(EngineError::OverlappingTilesets {
                    first: pair[0].name().to_owned(),
                    second: pair[1].name().to_owned(),
                    tile_id: pair[1].min_tile_id(),
                });
            }
        }

        let limit = i32::MAX as u64;
        if u64::from(dims.width.max(1)) * u64::from(dims.tile_w) > limit
            || u64::from(dims.height.max(1)) * u64::from(dims.tile_h) > limit
        {
            return Err(EngineError::InvalidMap(format!(
                "{}x{} tiles of {}x{} pixels exceed the i32 coordinate range",
                dims.width, dims.height, dims.tile_w, dims.tile_h
            )));
        }

        let expected = dims.width as usize * dims.height as usize;
        for layer in &layers {
            if layer.tile_ids.len() != expected {
                return Err(EngineError::InvalidLayerSize {
                    layer: layer.name.clone(),
                    expected,
                    actual: layer.tile_ids.len(),
                });
            }
        }

        let map = Self {
            tile_w: dims.tile_w,
            tile_h: dims.tile_h,
            width: dims.width,
            height: dims.height,
            layers,
            tilesets,
        };

        for layer in &map.layers {
            for (index, tile_id) in layer.tiles() {
                if map.resolve_tileset(tile_id).is_none() {
                    return Err(EngineError::UnresolvedTile {
                        layer: layer.name.clone(),
                        index,
                        tile_id,
                    });
                }
            }
        }

        info!(
            width = map.width,
            height = map.height,
            layers = map.layers.len(),
            tilesets = map.tilesets.len(),
            "tile map ready"
        );
        Ok(map)
    }

    /// Builds a map from a loaded description, decoding one image per tileset
    /// through `load_image`. The first image error aborts construction.
    pub fn from_ir<F>(ir: IrMap, mut load_image: F) -> Result<Self>
    where
        F: FnMut(&IrTileset) -> Result<T>,
    {
        let mut tilesets = Vec::with_capacity(ir.tilesets.len());
        for t in &ir.tilesets {
            let last_gid = t.last_gid().ok_or_else(|| EngineError::InvalidTileset {
                name: t.name.clone(),
                reason: format!(
                    "{} tiles starting at id {} do not fit the tile id range",
                    t.tilecount, t.first_gid
                ),
            })?;
            let image = load_image(t)?;
            debug!(
                name = %t.name,
                first_gid = t.first_gid,
                last_gid,
                image = %t.image.display(),
                "registered tileset"
            );
            let tileset = TileSet::new(
                t.name.clone(),
                t.first_gid,
                last_gid,
                t.columns,
                t.tile_w,
                t.tile_h,
                image,
            )?
            .with_spacing(t.spacing, t.margin)?;
            tilesets.push(tileset);
        }

        let layers = ir
            .layers
            .into_iter()
            .map(|l| {
                let mut layer = Layer::new(l.name, l.data);
                if !l.visible {
                    layer.visibility.hide();
                }
                layer
            })
            .collect();

        Self::new(
            MapDimensions {
                tile_w: ir.tile_w,
                tile_h: ir.tile_h,
                width: ir.width,
                height: ir.height,
            },
            layers,
            tilesets,
        )
    }

    pub fn dimensions(&self) -> MapDimensions {
        MapDimensions {
            tile_w: self.tile_w,
            tile_h: self.tile_h,
            width: self.width,
            height: self.height,
        }
    }

    pub fn tile_size(&self) -> (u32, u32) {
        (self.tile_w, self.tile_h)
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn tilesets(&self) -> &[TileSet<T>] {
        &self.tilesets
    }

    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name == name)
    }

    /// Shows or hides the named layer. Returns `false` if there is no such layer.
    pub fn set_layer_visible(&mut self, name: &str, visible: bool) -> bool {
        match self.layers.iter_mut().find(|l| l.name == name) {
            Some(layer) => {
                if visible {
                    layer.visibility.show();
                } else {
                    layer.visibility.hide();
                }
                true
            }
            None => false,
        }
    }

    /// First tileset whose ID range contains `tile_id`.
    pub fn resolve_tileset(&self, tile_id: u32) -> Option<&TileSet<T>> {
        self.tilesets.iter().find(|ts| ts.contains(tile_id))
    }

    /// Isometric world rectangle of the cell at linear `index`, before the
    /// camera is applied.
    pub fn tile_world_rect(&self, index: usize) -> Rect {
        let width = self.width.max(1) as usize;
        let col = (index % width) as i32;
        let row = (index / width) as i32;
        let (tw, th) = (self.tile_w as i32, self.tile_h as i32);
        let (x, y) = cartesian_to_isometric(col * tw, row * th, tw, th);
        Rect::new(x, y, tw, th)
    }
}
