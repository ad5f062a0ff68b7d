use std::io;
use std::path::PathBuf;

/// Convenience alias used across the crate.
pub type Result<T, E = EngineError> = std::result::Result<T, E>;

/// Failure reported by a [`RenderBackend`](crate::RenderBackend) call.
#[derive(Debug, thiserror::Error)]
#[error("backend error: {0}")]
pub struct BackendError(pub String);

/// Errors raised while building or driving the engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A non-zero tile ID that no tileset range covers.
    #[error("layer '{layer}' tile #{index}: id {tile_id} has no tileset; are the map and tilesets configured properly?")]
    UnresolvedTile {
        layer: String,
        index: usize,
        tile_id: u32,
    },

    /// Two tilesets claim the same tile ID.
    #[error("tilesets '{first}' and '{second}' overlap at tile id {tile_id}")]
    OverlappingTilesets {
        first: String,
        second: String,
        tile_id: u32,
    },

    /// A tileset with unusable geometry or an inverted ID range.
    #[error("invalid tileset '{name}': {reason}")]
    InvalidTileset { name: String, reason: String },

    /// A layer whose tile count does not match the map dimensions.
    #[error("layer '{layer}' has {actual} tiles, expected {expected}")]
    InvalidLayerSize {
        layer: String,
        expected: usize,
        actual: usize,
    },

    /// Map data that cannot be decoded into tile IDs.
    #[error("invalid map: {0}")]
    InvalidMap(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("failed to load texture {}: {reason}", path.display())]
    Texture { path: PathBuf, reason: String },

    #[error(transparent)]
    Backend(#[from] BackendError),
}
