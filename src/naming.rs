//! Derivative naming and classification of directory entries.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::ClassifyMode;

/// Leftover of an old bug that suffixed thumbnails twice.
const STRAY_MARKER: &str = "thumb.thumb";

/// Prefix of derivatives still being encoded when atomic writes are on.
pub const STAGING_PREFIX: &str = ".thumbnailer-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DerivativeKind {
    Full,
    Thumb,
}

impl DerivativeKind {
    pub const ALL: [Self; 2] = [Self::Full, Self::Thumb];

    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Thumb => "thumb",
        }
    }
}

impl fmt::Display for DerivativeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Unprocessed image awaiting derivatives.
    Original,
    Derivative(DerivativeKind),
    /// Name contains `thumb.thumb`.
    Stray,
    /// Unfinished staging file left behind by an interrupted run.
    Staging,
}

/// `<dir>/<stem>.<kind>.<ext>` for the given original.
#[must_use]
pub fn derived_path(original: &Path, kind: DerivativeKind, ext: &str) -> PathBuf {
    let stem = original
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    original.with_file_name(format!("{stem}.{}.{ext}", kind.suffix()))
}

/// Classify a bare file name.
#[must_use]
pub fn classify(file_name: &str, ext: &str, mode: ClassifyMode) -> EntryKind {
    if file_name.starts_with(STAGING_PREFIX) {
        return EntryKind::Staging;
    }
    if file_name.contains(STRAY_MARKER) {
        return EntryKind::Stray;
    }
    match mode {
        ClassifyMode::Strict => {
            let lower = file_name.to_ascii_lowercase();
            let ext = ext.to_ascii_lowercase();
            DerivativeKind::ALL
                .into_iter()
                .find(|kind| lower.ends_with(&format!(".{}.{ext}", kind.suffix())))
                .map_or(EntryKind::Original, EntryKind::Derivative)
        }
        ClassifyMode::Substring => {
            if file_name.contains("thumb") {
                EntryKind::Derivative(DerivativeKind::Thumb)
            } else if file_name.contains("full") {
                EntryKind::Derivative(DerivativeKind::Full)
            } else {
                EntryKind::Original
            }
        }
    }
}
