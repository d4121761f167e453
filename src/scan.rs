//! One-shot listing of the image directory.

use std::path::{Path, PathBuf};

use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::config::ClassifyMode;
use crate::error::Error;
use crate::naming::{EntryKind, classify};

/// Directory entries grouped by classification, each group sorted by file name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    pub originals: Vec<PathBuf>,
    pub derivatives: Vec<PathBuf>,
    pub strays: Vec<PathBuf>,
}

impl Listing {
    pub fn is_empty(&self) -> bool {
        self.originals.is_empty() && self.derivatives.is_empty() && self.strays.is_empty()
    }
}

/// List the regular files directly inside `dir` and classify them.
///
/// Subdirectories are skipped, never descended into.
///
/// # Errors
/// Returns [`Error::BadDir`] if `dir` is missing or not a directory, and
/// [`Error::Io`] if an entry cannot be read.
pub fn list_dir(dir: &Path, ext: &str, mode: ClassifyMode) -> Result<Listing, Error> {
    if !dir.is_dir() {
        return Err(Error::BadDir(dir.to_string_lossy().into_owned()));
    }

    let mut listing = Listing::default();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            Error::io(path, e.into())
        })?;
        if !entry.file_type().is_file() {
            trace!(path = %entry.path().display(), "scan: skipping non-file");
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        let path = entry.path().to_path_buf();
        match classify(&name, ext, mode) {
            EntryKind::Original => listing.originals.push(path),
            EntryKind::Derivative(kind) => {
                trace!(path = %path.display(), %kind, "scan: derivative");
                listing.derivatives.push(path);
            }
            EntryKind::Stray => listing.strays.push(path),
            EntryKind::Staging => {
                debug!(path = %path.display(), "scan: ignoring leftover staging file");
            }
        }
    }

    debug!(
        dir = %dir.display(),
        originals = listing.originals.len(),
        derivatives = listing.derivatives.len(),
        strays = listing.strays.len(),
        "scan complete"
    );
    Ok(listing)
}
