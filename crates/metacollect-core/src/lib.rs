//! metacollect-core — TEMCA metafile to point-match collection conversion.
//!
//! A TEMCA capture session produces a metafile: a flat list of image tiles,
//! each tagged with a `(col, row)` raster position and a set of raw feature
//! matches against unnamed neighbors. The stages here turn that into a
//! collection of pairwise point correspondences a montage solver can consume:
//!
//! 1. **Meta** – serde data model of the metafile, parsing, tile id munging.
//! 2. **Grid** – raster-position index over the (possibly sparse) capture
//!    grid, with directional neighbor resolution at grid boundaries.
//! 3. **Collect** – per-tile match resolution and correspondence flattening
//!    into the render collection schema.

pub mod collect;
pub mod error;
pub mod grid;
pub mod meta;

pub use collect::{build_collection, Correspondence, MatchPoints, SectionCollection, TileSpec};
pub use error::{Error, Result};
pub use grid::GridIndex;
pub use meta::{load_metafile, tile_id, Calibration, Direction, Metadata, SectionMeta, TileRecord};
