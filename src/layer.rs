use crate::geom::Visibility;

/// One plane of global tile IDs covering the whole map, row-major.
///
/// `0` marks an empty cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    pub name: String,
    pub tile_ids: Vec<u32>,
    pub visibility: Visibility,
}

impl Layer {
    pub fn new(name: impl Into<String>, tile_ids: Vec<u32>) -> Self {
        Layer {
            name: name.into(),
            tile_ids,
            visibility: Visibility::default(),
        }
    }

    /// Non-empty cells as `(linear index, tile id)`.
    pub fn tiles(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.tile_ids
            .iter()
            .copied()
            .enumerate()
            .filter(|&(_, id)| id != 0)
    }
}
