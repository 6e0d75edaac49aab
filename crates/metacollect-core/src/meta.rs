//! TEMCA metafile data model and parsing.
//!
//! A metafile is a two-element JSON array: a `metadata` block with session
//! identifiers and calibration, followed by a `data` block listing one record
//! per captured tile. Tile records carry extra capture-time keys beyond the
//! ones modeled here; unknown fields are ignored on parse.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Expected image file extension, stripped when deriving tile ids.
pub const IMAGE_EXTENSION: &str = ".tif";

/// Match quality sentinel: no match is possible for this tile edge.
pub const NO_MATCH_QUALITY: f64 = -1.0;

/// Edge position code attached to a raw match record.
///
/// `Invalid` and `Center` appear in the metafile encoding but never resolve
/// to a neighbor; they are kept as explicitly-rejected variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Direction {
    Invalid,
    Center,
    Left,
    Top,
    Right,
}

impl TryFrom<u8> for Direction {
    type Error = String;

    fn try_from(code: u8) -> std::result::Result<Self, String> {
        match code {
            0 => Ok(Self::Invalid),
            1 => Ok(Self::Center),
            2 => Ok(Self::Left),
            3 => Ok(Self::Top),
            4 => Ok(Self::Right),
            other => Err(format!("unknown edge position code {other}")),
        }
    }
}

impl From<Direction> for u8 {
    fn from(direction: Direction) -> u8 {
        match direction {
            Direction::Invalid => 0,
            Direction::Center => 1,
            Direction::Left => 2,
            Direction::Top => 3,
            Direction::Right => 4,
        }
    }
}

/// High-magnification calibration for the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    pub nm_per_pix: f64,
    pub angle: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CalibrationBlock {
    highmag: Calibration,
}

/// Session metadata block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    pub temca_id: String,
    pub session_id: String,
    pub specimen_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tape_id: Option<String>,
    calibration: CalibrationBlock,
}

impl Metadata {
    /// High-magnification calibration values.
    pub fn calibration(&self) -> &Calibration {
        &self.calibration.highmag
    }
}

/// Capture-time image metadata for one tile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageMeta {
    /// Integer (col, row) address in the capture grid.
    pub raster_pos: [u32; 2],
    /// Physical stage coordinates at capture time.
    pub stage_pos: [f64; 2],
}

/// A raw feature match recorded against an unnamed neighbor tile.
///
/// `p*` are point coordinates on this tile, `q*` the corresponding points on
/// the neighbor implied by `position`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMatch {
    pub position: Direction,
    pub match_quality: f64,
    #[serde(rename = "pX")]
    pub p_x: Vec<f64>,
    #[serde(rename = "pY")]
    pub p_y: Vec<f64>,
    #[serde(rename = "qX")]
    pub q_x: Vec<f64>,
    #[serde(rename = "qY")]
    pub q_y: Vec<f64>,
}

impl RawMatch {
    /// Whether the capture-time matcher flagged this edge as unmatchable.
    pub fn is_no_match(&self) -> bool {
        self.match_quality == NO_MATCH_QUALITY
    }
}

/// One captured tile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileRecord {
    pub img_path: String,
    pub img_meta: ImageMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matcher: Option<Vec<RawMatch>>,
}

impl TileRecord {
    /// Tile identifier: the image path with its extension stripped.
    pub fn id(&self) -> &str {
        tile_id(&self.img_path)
    }

    /// Raster position as (col, row).
    pub fn raster_pos(&self) -> (u32, u32) {
        (self.img_meta.raster_pos[0], self.img_meta.raster_pos[1])
    }
}

/// Derive a tile id from an image path by stripping the expected extension.
///
/// Paths without the extension pass through unchanged.
pub fn tile_id(img_path: &str) -> &str {
    img_path.strip_suffix(IMAGE_EXTENSION).unwrap_or(img_path)
}

/// Parsed metafile: session metadata plus the ordered tile list.
#[derive(Debug, Clone)]
pub struct SectionMeta {
    pub metadata: Metadata,
    pub tiles: Vec<TileRecord>,
}

#[derive(Debug, Deserialize)]
struct MetadataBlock {
    metadata: Metadata,
}

#[derive(Debug, Deserialize)]
struct DataBlock {
    data: Vec<TileRecord>,
}

/// Load and parse a metafile from disk.
///
/// Fails with [`Error::MetafileRead`] / [`Error::MetafileParse`] naming the
/// offending path; never returns a partially-parsed session.
pub fn load_metafile(path: &Path) -> Result<SectionMeta> {
    let raw = std::fs::read_to_string(path).map_err(|source| Error::MetafileRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_metafile(&raw).map_err(|reason| Error::MetafileParse {
        path: path.to_path_buf(),
        reason,
    })
}

/// Parse metafile JSON into a [`SectionMeta`].
pub fn parse_metafile(raw: &str) -> std::result::Result<SectionMeta, String> {
    let blocks: Vec<serde_json::Value> = serde_json::from_str(raw).map_err(|e| e.to_string())?;
    if blocks.len() < 2 {
        return Err(format!(
            "expected [metadata, data] top-level blocks, found {} block(s)",
            blocks.len()
        ));
    }

    let metadata: MetadataBlock = serde_json::from_value(blocks[0].clone())
        .map_err(|e| format!("metadata block: {e}"))?;
    let data: DataBlock =
        serde_json::from_value(blocks[1].clone()).map_err(|e| format!("data block: {e}"))?;

    Ok(SectionMeta {
        metadata: metadata.metadata,
        tiles: data.data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_META: &str = r#"[
        {"metadata": {
            "temca_id": "3",
            "session_id": "000000",
            "specimen_id": "17797_1R",
            "calibration": {"highmag": {"nm_per_pix": 4.0, "angle": 0.014}}
        }},
        {"data": [
            {"img_path": "tile_001.tif",
             "img_meta": {"raster_pos": [0, 0], "stage_pos": [10.5, -3.25]},
             "matcher": [
                {"position": 4, "match_quality": 12.5,
                 "pX": [1.0, 2.0], "pY": [3.0, 4.0],
                 "qX": [5.0, 6.0], "qY": [7.0, 8.0]}
             ]},
            {"img_path": "tile_002.tif",
             "img_meta": {"raster_pos": [1, 0], "stage_pos": [20.5, -3.25]}}
        ]}
    ]"#;

    #[test]
    fn direction_codes_round_trip() {
        for code in 0u8..=4 {
            let dir = Direction::try_from(code).expect("valid code");
            assert_eq!(u8::from(dir), code);
        }
        assert!(Direction::try_from(5).is_err());
    }

    #[test]
    fn direction_deserializes_from_integer() {
        let dir: Direction = serde_json::from_str("4").expect("valid json");
        assert_eq!(dir, Direction::Right);
        let bad: serde_json::Result<Direction> = serde_json::from_str("7");
        assert!(bad.is_err());
    }

    #[test]
    fn parses_minimal_metafile() {
        let meta = parse_metafile(MINIMAL_META).expect("valid metafile");
        assert_eq!(meta.metadata.session_id, "000000");
        assert_eq!(meta.metadata.tape_id, None);
        assert_eq!(meta.metadata.calibration().nm_per_pix, 4.0);
        assert_eq!(meta.tiles.len(), 2);

        let first = &meta.tiles[0];
        assert_eq!(first.raster_pos(), (0, 0));
        let matches = first.matcher.as_ref().expect("matcher present");
        assert_eq!(matches[0].position, Direction::Right);
        assert_eq!(matches[0].p_x, vec![1.0, 2.0]);

        assert!(meta.tiles[1].matcher.is_none());
    }

    #[test]
    fn missing_data_block_is_rejected() {
        let raw = r#"[{"metadata": {
            "temca_id": "3", "session_id": "0", "specimen_id": "s",
            "calibration": {"highmag": {"nm_per_pix": 4.0, "angle": 0.0}}
        }}]"#;
        let err = parse_metafile(raw).expect_err("expected error");
        assert!(err.contains("top-level blocks"));
    }

    #[test]
    fn non_json_input_is_rejected() {
        assert!(parse_metafile("not json").is_err());
    }

    #[test]
    fn tile_id_strips_expected_extension() {
        assert_eq!(tile_id("tile_001.tif"), "tile_001");
        assert_eq!(tile_id("tile_001.png"), "tile_001.png");
        assert_eq!(tile_id("tile_001"), "tile_001");
    }

    #[test]
    fn no_match_sentinel_is_exact() {
        let raw = r#"{"position": 2, "match_quality": -1,
                      "pX": [], "pY": [], "qX": [], "qY": []}"#;
        let m: RawMatch = serde_json::from_str(raw).expect("valid json");
        assert!(m.is_no_match());

        let raw = r#"{"position": 2, "match_quality": -0.5,
                      "pX": [], "pY": [], "qX": [], "qY": []}"#;
        let m: RawMatch = serde_json::from_str(raw).expect("valid json");
        assert!(!m.is_no_match());
    }
}
