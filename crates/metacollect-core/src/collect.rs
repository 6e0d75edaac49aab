//! Correspondence extraction and collection assembly.
//!
//! Walks the tile list in metafile order, resolves each raw match to a
//! concrete neighbor through the [`GridIndex`], and flattens the survivors
//! into the render collection schema. Matches flagged with the no-match
//! sentinel or pointing at an unoccupied/out-of-bounds cell are dropped
//! silently; the capture system over-reports candidate edges for border
//! tiles and that is a data-quality note, not a failure.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::grid::GridIndex;
use crate::meta::SectionMeta;

/// Point payload of one correspondence: two 2xN coordinate arrays
/// (`[xs, ys]`) and a per-point weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchPoints {
    pub p: [Vec<f64>; 2],
    pub q: [Vec<f64>; 2],
    pub w: Vec<f64>,
    pub match_count: usize,
}

/// A pairwise point correspondence between two adjacent tiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correspondence {
    #[serde(rename = "pId")]
    pub p_id: String,
    #[serde(rename = "qId")]
    pub q_id: String,
    #[serde(rename = "pGroupId")]
    pub p_group_id: String,
    #[serde(rename = "qGroupId")]
    pub q_group_id: String,
    pub matches: MatchPoints,
}

/// Per-tile stage position entry for the richer collection payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileSpec {
    #[serde(rename = "tileId")]
    pub tile_id: String,
    pub xstage: f64,
    pub ystage: f64,
}

/// Everything derived from one session.
///
/// Consumers persist only `correspondences`; the calibration and tilespecs
/// ride along for callers that want them (the downstream solver takes its
/// tile positions from a separately produced stack specification).
#[derive(Debug, Clone, Serialize)]
pub struct SectionCollection {
    pub correspondences: Vec<Correspondence>,
    pub calibration: crate::meta::Calibration,
    pub tilespecs: Vec<TileSpec>,
}

/// Build the correspondence collection for one parsed session.
///
/// Iteration order is metafile order, so output order is stable across runs
/// on the same input.
pub fn build_collection(meta: &SectionMeta) -> Result<SectionCollection> {
    let grid = GridIndex::build(&meta.tiles)?;
    tracing::info!(
        "grid bounds: {} cols x {} rows, {} tiles",
        grid.max_col() + 1,
        grid.max_row() + 1,
        meta.tiles.len()
    );

    let group_id = &meta.metadata.session_id;

    let mut correspondences = Vec::new();
    let mut tilespecs = Vec::with_capacity(meta.tiles.len());
    let mut sentinel_drops = 0usize;
    let mut boundary_drops = 0usize;

    for tile in &meta.tiles {
        let p_id = tile.id();
        tilespecs.push(TileSpec {
            tile_id: p_id.to_string(),
            xstage: tile.img_meta.stage_pos[0],
            ystage: tile.img_meta.stage_pos[1],
        });

        let Some(matches) = &tile.matcher else {
            continue;
        };

        let (col, row) = tile.raster_pos();
        for (match_index, m) in matches.iter().enumerate() {
            if m.is_no_match() {
                sentinel_drops += 1;
                continue;
            }

            let Some(neighbor_idx) = grid.neighbor(col, row, m.position)? else {
                boundary_drops += 1;
                continue;
            };

            let n = m.p_x.len();
            if m.p_y.len() != n || m.q_x.len() != n || m.q_y.len() != n {
                return Err(Error::ShapeMismatch {
                    tile: p_id.to_string(),
                    match_index,
                    p_x: m.p_x.len(),
                    p_y: m.p_y.len(),
                    q_x: m.q_x.len(),
                    q_y: m.q_y.len(),
                });
            }

            let q_id = meta.tiles[neighbor_idx].id();
            correspondences.push(Correspondence {
                p_id: p_id.to_string(),
                q_id: q_id.to_string(),
                p_group_id: group_id.clone(),
                q_group_id: group_id.clone(),
                matches: MatchPoints {
                    p: [m.p_x.clone(), m.p_y.clone()],
                    q: [m.q_x.clone(), m.q_y.clone()],
                    w: vec![1.0; n],
                    match_count: n,
                },
            });
        }
    }

    tracing::debug!(
        "{} correspondences; dropped {} no-match edges, {} unresolved neighbors",
        correspondences.len(),
        sentinel_drops,
        boundary_drops
    );

    Ok(SectionCollection {
        correspondences,
        calibration: meta.metadata.calibration().clone(),
        tilespecs,
    })
}
