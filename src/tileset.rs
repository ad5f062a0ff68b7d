use crate::error::{EngineError, Result};
use crate::geom::Rect;

/// A contiguous range of global tile IDs backed by one grid-laid image.
///
/// `T` is the backend's decoded image handle; the tileset owns it for the
/// lifetime of the map. Fields are fixed at construction so every tile's
/// source rectangle is known to fit the `i32` coordinate space.
#[derive(Debug, Clone)]
pub struct TileSet<T> {
    name: String,
    min_tile_id: u32,
    max_tile_id: u32,
    columns: u32,
    tile_width: u32,
    tile_height: u32,
    spacing: u32,
    margin: u32,
    image: T,
}

impl<T> TileSet<T> {
    pub fn new(
        name: impl Into<String>,
        min_tile_id: u32,
        max_tile_id: u32,
        columns: u32,
        tile_width: u32,
        tile_height: u32,
        image: T,
    ) -> Result<Self> {
        let name = name.into();
        let invalid = |reason: String| EngineError::InvalidTileset {
            name: name.clone(),
            reason,
        };
        if min_tile_id == 0 {
            return Err(invalid("tile id 0 is reserved for empty cells".into()));
        }
        if min_tile_id > max_tile_id {
            return Err(invalid(format!(
                "min tile id {min_tile_id} is above max tile id {max_tile_id}"
            )));
        }
        if columns == 0 || tile_width == 0 || tile_height == 0 {
            return Err(invalid(format!(
                "columns and tile size must be positive (columns={columns}, tile={tile_width}x{tile_height})"
            )));
        }
        let ts = Self {
            name,
            min_tile_id,
            max_tile_id,
            columns,
            tile_width,
            tile_height,
            spacing: 0,
            margin: 0,
            image,
        };
        ts.check_extent()?;
        Ok(ts)
    }

    /// Sets the gap between tiles and the border around the grid, in pixels.
    pub fn with_spacing(mut self, spacing: u32, margin: u32) -> Result<Self> {
        self.spacing = spacing;
        self.margin = margin;
        self.check_extent()?;
        Ok(self)
    }

    // The bottom-right corner of the last tile must be addressable as i32.
    fn check_extent(&self) -> Result<()> {
        let local = u64::from(self.max_tile_id - self.min_tile_id);
        let cols = u64::from(self.columns);
        let last_col = local.min(cols - 1);
        let last_row = local / cols;
        let end = |index: u64, size: u32| {
            u64::from(self.margin) + index * (u64::from(size) + u64::from(self.spacing)) + u64::from(size)
        };
        let (x_end, y_end) = (end(last_col, self.tile_width), end(last_row, self.tile_height));
        let limit = i32::MAX as u64;
        if x_end > limit || y_end > limit {
            return Err(EngineError::InvalidTileset {
                name: self.name.clone(),
                reason: format!("tile grid extends to {x_end}x{y_end} pixels, beyond the i32 range"),
            });
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn min_tile_id(&self) -> u32 {
        self.min_tile_id
    }

    pub fn max_tile_id(&self) -> u32 {
        self.max_tile_id
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn tile_size(&self) -> (u32, u32) {
        (self.tile_width, self.tile_height)
    }

    pub fn spacing(&self) -> u32 {
        self.spacing
    }

    pub fn margin(&self) -> u32 {
        self.margin
    }

    pub fn image(&self) -> &T {
        &self.image
    }

    #[inline]
    pub fn contains(&self, tile_id: u32) -> bool {
        (self.min_tile_id..=self.max_tile_id).contains(&tile_id)
    }

    /// Source rectangle of `tile_id` inside this tileset's image, or `None`
    /// if the ID is outside the tileset's range.
    pub fn tile_rect(&self, tile_id: u32) -> Option<Rect> {
        if !self.contains(tile_id) {
            return None;
        }
        let local = u64::from(tile_id - self.min_tile_id);
        let cols = u64::from(self.columns);
        let (col, row) = (local % cols, local / cols);
        // check_extent bounds both origins by i32::MAX.
        let x = u64::from(self.margin) + col * (u64::from(self.tile_width) + u64::from(self.spacing));
        let y = u64::from(self.margin) + row * (u64::from(self.tile_height) + u64::from(self.spacing));
        Some(Rect::new(
            x as i32,
            y as i32,
            self.tile_width as i32,
            self.tile_height as i32,
        ))
    }
}
