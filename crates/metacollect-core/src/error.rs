//! Error types for metafile conversion.

use std::path::PathBuf;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Conversion error taxonomy.
///
/// Per-match resolution failures (missing neighbor, no-match sentinel) are
/// recovered by omission during extraction and never surface here.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No `_meta*` file in the session directory
    #[error("no metafile found in {dir}")]
    MetafileNotFound { dir: PathBuf },

    /// Metafile could not be read
    #[error("cannot read metafile {path}: {source}")]
    MetafileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Metafile is not valid JSON or is missing a required top-level block
    #[error("cannot parse metafile {path}: {reason}")]
    MetafileParse { path: PathBuf, reason: String },

    /// Two tiles claim the same raster position
    #[error("duplicate raster position ({col}, {row}): '{first}' and '{second}'")]
    DuplicateRasterPos {
        col: u32,
        row: u32,
        first: String,
        second: String,
    },

    /// Direction code that never resolves to a neighbor (INVALID or CENTER)
    #[error("direction code {code} is not a neighbor direction")]
    UnsupportedDirection { code: u8 },

    /// A match record's coordinate arrays have unequal lengths
    #[error(
        "tile '{tile}' match {match_index}: coordinate arrays have mismatched lengths \
         (pX={p_x}, pY={p_y}, qX={q_x}, qY={q_y})"
    )]
    ShapeMismatch {
        tile: String,
        match_index: usize,
        p_x: usize,
        p_y: usize,
        q_x: usize,
        q_y: usize,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
