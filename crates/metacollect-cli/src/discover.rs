//! Session-directory file discovery.
//!
//! A session directory holds exactly one `_meta*` metafile and optionally a
//! companion `_montage*` file. The capture system occasionally leaves more
//! than one candidate behind; candidates are sorted by name and the last one
//! wins, which keeps the ambiguity deterministic.

use std::path::{Path, PathBuf};

use metacollect_core::{Error, Result};

const META_PREFIX: &str = "_meta";
const MONTAGE_PREFIX: &str = "_montage";

/// Locate the metafile and optional montage file in `dir`.
pub fn find_meta_and_montage(dir: &Path) -> Result<(PathBuf, Option<PathBuf>)> {
    let meta = last_with_prefix(dir, META_PREFIX)?.ok_or_else(|| Error::MetafileNotFound {
        dir: dir.to_path_buf(),
    })?;
    let montage = last_with_prefix(dir, MONTAGE_PREFIX)?;
    Ok((meta, montage))
}

fn last_with_prefix(dir: &Path, prefix: &str) -> Result<Option<PathBuf>> {
    let mut names: Vec<String> = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if name.starts_with(prefix) {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names.pop().map(|name| dir.join(name)))
}
