// src/ir_map.rs
use std::path::PathBuf;

/// Canonical, format-agnostic map description, as produced by a loader and
/// consumed by [`TileMap::from_ir`](crate::TileMap::from_ir).
#[derive(Debug, Clone, PartialEq)]
pub struct IrMap {
    pub tile_w: u32,
    pub tile_h: u32,
    pub width: u32,
    pub height: u32,
    pub tilesets: Vec<IrTileset>, // sorted by first_gid
    pub layers: Vec<IrLayer>,     // draw order: array order
}

/// One image atlas with a regular grid.
#[derive(Debug, Clone, PartialEq)]
pub struct IrTileset {
    pub name: String,
    pub first_gid: u32,
    pub tilecount: u32,
    pub columns: u32,
    pub tile_w: u32,
    pub tile_h: u32,
    pub spacing: u32,
    pub margin: u32,
    pub image: PathBuf, // already resolved against the tileset's directory
}

impl IrTileset {
    /// Last global ID of the range, or `None` for an empty tileset or one
    /// whose range runs past `u32::MAX`.
    pub fn last_gid(&self) -> Option<u32> {
        self.first_gid
            .checked_add(self.tilecount)?
            .checked_sub(1)
            .filter(|&last| last >= self.first_gid)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IrLayer {
    pub name: String,
    pub visible: bool,
    pub data: Vec<u32>, // GIDs with flip flags already stripped
}
