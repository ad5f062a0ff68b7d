// src/loader/json_loader.rs
use crate::error::{EngineError, Result};
use crate::ir_map::*;
use serde::Deserialize;
use serde_json::{Map as JsonObject, Value as JsonValue};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const FLIP_H: u32 = 0x8000_0000; // bit 31
pub const FLIP_V: u32 = 0x4000_0000; // bit 30
pub const FLIP_D: u32 = 0x2000_0000; // bit 29
pub const GID_MASK: u32 = 0x1FFF_FFFF; // keep lower 29 bits

#[derive(Deserialize)]
struct JsonMap {
    width: u32,
    height: u32,
    tilewidth: u32,
    tileheight: u32,
    #[serde(default)]
    orientation: Option<String>,
    #[serde(default)]
    layers: Vec<JsonLayer>,
    #[serde(default)]
    tilesets: Vec<JsonTilesetRef>,
}

#[derive(Deserialize)]
struct JsonLayer {
    #[serde(default)]
    name: String,
    #[serde(rename = "type")]
    kind: Option<String>, // "tilelayer" expected here
    #[serde(default = "default_true")]
    visible: bool,
    #[serde(default)]
    encoding: Option<String>,
    #[serde(default)]
    data: Option<JsonLayerData>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonLayerData {
    Ids(Vec<u32>),
    Text(String),
}

fn default_true() -> bool {
    true
}

/// Either `{firstgid, source}` or an embedded tileset with `firstgid`.
#[derive(Deserialize)]
struct JsonTilesetRef {
    firstgid: u32,
    #[serde(default)]
    source: Option<String>,
    #[serde(flatten)]
    inline: JsonObject<String, JsonValue>,
}

#[derive(Deserialize)]
struct JsonTileset {
    #[serde(default)]
    name: String,
    tilewidth: u32,
    tileheight: u32,
    tilecount: u32,
    columns: u32,
    #[serde(default)]
    spacing: u32,
    #[serde(default)]
    margin: u32,
    image: String,
}

fn parse_csv_ids(layer: &str, text: &str) -> Result<Vec<u32>> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u32>().map_err(|e| {
                EngineError::InvalidMap(format!("layer '{layer}': bad tile id '{s}': {e}"))
            })
        })
        .collect()
}

fn layer_to_ir(l: JsonLayer) -> Result<Option<IrLayer>> {
    let kind = l.kind.as_deref().unwrap_or("tilelayer");
    if kind != "tilelayer" {
        debug!(layer = %l.name, kind, "skipping non-tile layer");
        return Ok(None);
    }

    let raw = match (l.data, l.encoding.as_deref()) {
        (None, _) => Vec::new(),
        (Some(JsonLayerData::Ids(ids)), _) => ids,
        (Some(JsonLayerData::Text(text)), None | Some("csv")) => parse_csv_ids(&l.name, &text)?,
        (Some(JsonLayerData::Text(_)), Some(other)) => {
            return Err(EngineError::UnsupportedFormat(format!(
                "layer '{}' uses {other} encoding; only csv/array data is supported",
                l.name
            )));
        }
    };

    Ok(Some(IrLayer {
        name: l.name,
        visible: l.visible,
        data: raw.into_iter().map(|gid| gid & GID_MASK).collect(),
    }))
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let txt = std::fs::read_to_string(path).map_err(|source| EngineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&txt).map_err(|source| EngineError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn tileset_to_ir(ts: JsonTilesetRef, map_dir: &Path, map_path: &Path) -> Result<IrTileset> {
    let (def, image_dir) = match ts.source {
        Some(source) => {
            if !source.ends_with(".json") {
                return Err(EngineError::UnsupportedFormat(format!(
                    "external tileset must be JSON: {source}"
                )));
            }
            let ts_path = map_dir.join(&source);
            let def: JsonTileset = read_json(&ts_path)?;
            let dir = ts_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| map_dir.to_path_buf());
            (def, dir)
        }
        None => {
            let def: JsonTileset = serde_json::from_value(JsonValue::Object(ts.inline))
                .map_err(|source| EngineError::Json {
                    path: map_path.to_path_buf(),
                    source,
                })?;
            (def, map_dir.to_path_buf())
        }
    };

    Ok(IrTileset {
        name: def.name,
        first_gid: ts.firstgid,
        tilecount: def.tilecount,
        columns: def.columns,
        tile_w: def.tilewidth,
        tile_h: def.tileheight,
        spacing: def.spacing,
        margin: def.margin,
        image: image_dir.join(def.image),
    })
}

fn json_map_to_ir(j: JsonMap, map_dir: &Path, map_path: &Path) -> Result<IrMap> {
    if let Some(o) = j.orientation.as_deref() {
        if o != "isometric" {
            warn!(orientation = o, "map is not isometric; it will still be drawn as one");
        }
    }

    let mut tilesets = j
        .tilesets
        .into_iter()
        .map(|ts| tileset_to_ir(ts, map_dir, map_path))
        .collect::<Result<Vec<_>>>()?;
    tilesets.sort_by_key(|t| t.first_gid);

    let mut layers = Vec::with_capacity(j.layers.len());
    for l in j.layers {
        if let Some(layer) = layer_to_ir(l)? {
            layers.push(layer);
        }
    }

    Ok(IrMap {
        tile_w: j.tilewidth,
        tile_h: j.tileheight,
        width: j.width,
        height: j.height,
        tilesets,
        layers,
    })
}

/// Decodes map JSON held in memory. External tilesets and images are
/// resolved against `base_dir`.
pub fn decode_map_str_to_ir(json: &str, base_dir: &Path) -> Result<IrMap> {
    let pseudo = base_dir.join("<inline>");
    let j: JsonMap = serde_json::from_str(json).map_err(|source| EngineError::Json {
        path: pseudo.clone(),
        source,
    })?;
    json_map_to_ir(j, base_dir, &pseudo)
}

/// Decodes a Tiled JSON map file and the external tilesets it references.
pub fn decode_map_file_to_ir(path: impl AsRef<Path>) -> Result<IrMap> {
    let p = path.as_ref();
    if p.extension().and_then(|e| e.to_str()) != Some("json") {
        return Err(EngineError::UnsupportedFormat(p.display().to_string()));
    }

    let j: JsonMap = read_json(p)?;
    let map_dir = p
        .parent()
        .map(|d| d.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./"));

    let ir = json_map_to_ir(j, &map_dir, p)?;
    debug!(
        path = %p.display(),
        layers = ir.layers.len(),
        tilesets = ir.tilesets.len(),
        "decoded map"
    );
    Ok(ir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir() -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock went backwards")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("isoframe_loader_{nanos}"));
        fs::create_dir_all(&dir).expect("failed to create temp dir");
        dir
    }

    #[test]
    fn decodes_embedded_tileset_and_array_data() {
        let json = r#"{
          "width": 2, "height": 2,
          "tilewidth": 64, "tileheight": 32,
          "orientation": "isometric",
          "layers": [
            { "type": "tilelayer", "name": "ground", "data": [1, 0, 2, 0] },
            { "type": "objectgroup", "name": "spawns", "objects": [] }
          ],
          "tilesets": [
            { "firstgid": 1, "name": "terrain", "tilewidth": 64, "tileheight": 32,
              "tilecount": 2, "columns": 2, "image": "terrain.png" }
          ]
        }"#;

        let ir = decode_map_str_to_ir(json, Path::new("assets")).expect("decode");
        assert_eq!((ir.width, ir.height, ir.tile_w, ir.tile_h), (2, 2, 64, 32));
        assert_eq!(ir.layers.len(), 1);
        assert_eq!(ir.layers[0].data, vec![1, 0, 2, 0]);
        assert_eq!(ir.tilesets[0].name, "terrain");
        assert_eq!(ir.tilesets[0].last_gid(), Some(2));
        assert_eq!((ir.tilesets[0].spacing, ir.tilesets[0].margin), (0, 0));
        assert_eq!(ir.tilesets[0].image, Path::new("assets").join("terrain.png"));
    }

    #[test]
    fn parses_csv_text_data_and_strips_flip_flags() {
        let json = r#"{
          "width": 3, "height": 1, "tilewidth": 8, "tileheight": 8,
          "layers": [ { "name": "L", "encoding": "csv", "data": " 1,\n 2147483650 , 0\n" } ],
          "tilesets": []
        }"#;
        let ir = decode_map_str_to_ir(json, Path::new(".")).unwrap();
        assert_eq!(ir.layers[0].data, vec![1, 2, 0]);
    }

    #[test]
    fn rejects_base64_layers() {
        let json = r#"{
          "width": 1, "height": 1, "tilewidth": 8, "tileheight": 8,
          "layers": [ { "name": "L", "encoding": "base64", "data": "AQAAAA==" } ]
        }"#;
        let err = decode_map_str_to_ir(json, Path::new(".")).unwrap_err();
        assert!(matches!(err, EngineError::UnsupportedFormat(_)));
    }

    #[test]
    fn bad_csv_token_is_an_invalid_map() {
        let json = r#"{
          "width": 2, "height": 1, "tilewidth": 8, "tileheight": 8,
          "layers": [ { "name": "L", "data": "1,x" } ]
        }"#;
        let err = decode_map_str_to_ir(json, Path::new(".")).unwrap_err();
        assert!(matches!(err, EngineError::InvalidMap(_)));
    }

    #[test]
    fn resolves_external_tileset_image_relative_to_tileset_file() {
        let dir = temp_dir();
        fs::create_dir_all(dir.join("tilesets")).unwrap();
        let map_path = dir.join("map.json");

        fs::write(
            &map_path,
            r#"{
              "width": 1, "height": 1, "tilewidth": 16, "tileheight": 16,
              "layers": [ { "type": "tilelayer", "name": "g", "data": [5] } ],
              "tilesets": [ { "firstgid": 5, "source": "tilesets/walls.json" } ]
            }"#,
        )
        .unwrap();
        fs::write(
            dir.join("tilesets").join("walls.json"),
            r#"{ "name": "walls", "tilewidth": 16, "tileheight": 16,
                 "tilecount": 4, "columns": 2, "spacing": 1, "margin": 2,
                 "image": "walls.png" }"#,
        )
        .unwrap();

        let ir = decode_map_file_to_ir(&map_path).expect("decode");
        let ts = &ir.tilesets[0];
        assert_eq!((ts.first_gid, ts.last_gid()), (5, Some(8)));
        assert_eq!((ts.spacing, ts.margin), (1, 2));
        assert_eq!(ts.image, dir.join("tilesets").join("walls.png"));
    }

    #[test]
    fn returns_typed_error_for_malformed_json() {
        let dir = temp_dir();
        let map_path = dir.join("map.json");
        fs::write(&map_path, "{ not json").unwrap();

        let err = decode_map_file_to_ir(&map_path).unwrap_err();
        assert!(matches!(err, EngineError::Json { .. }));
    }

    #[test]
    fn returns_typed_error_for_missing_tileset_file() {
        let dir = temp_dir();
        let map_path = dir.join("map.json");
        fs::write(
            &map_path,
            r#"{ "width": 1, "height": 1, "tilewidth": 16, "tileheight": 16,
                 "layers": [], "tilesets": [ { "firstgid": 1, "source": "missing.json" } ] }"#,
        )
        .unwrap();

        let err = decode_map_file_to_ir(&map_path).unwrap_err();
        assert!(matches!(err, EngineError::Io { .. }));
    }

    #[test]
    fn non_json_map_is_unsupported() {
        let err = decode_map_file_to_ir("level.tmx").unwrap_err();
        assert!(matches!(err, EngineError::UnsupportedFormat(p) if p == "level.tmx"));
    }
}
