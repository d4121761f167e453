//! Batch driver: turns every original in the image directory into derivatives.

use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, ImageReader};
use tempfile::NamedTempFile;
use tracing::{debug, info, instrument};

use crate::config::{Configuration, Mode};
use crate::error::Error;
use crate::naming::{DerivativeKind, STAGING_PREFIX, derived_path};
use crate::processing::layout::fit_within;
use crate::processing::resize::resize_rgba;
use crate::scan::{Listing, list_dir};

/// Progress of a single original through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Discovered,
    Decoded,
    FullWritten,
    ThumbnailWritten,
    OriginalDeleted,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Discovered => "discovered",
            Self::Decoded => "decoded",
            Self::FullWritten => "full-written",
            Self::ThumbnailWritten => "thumbnail-written",
            Self::OriginalDeleted => "original-deleted",
        };
        f.write_str(s)
    }
}

/// Outcome for one original.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Processed {
    pub original: PathBuf,
    pub full: Option<PathBuf>,
    pub thumb: PathBuf,
    pub source_size: (u32, u32),
    pub thumb_size: (u32, u32),
    /// Last stage reached; `OriginalDeleted` in replace mode.
    pub stage: Stage,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub processed: Vec<Processed>,
    pub strays_removed: Vec<PathBuf>,
    /// Derivatives already present and left alone.
    pub derivatives_skipped: usize,
}

/// A derivative encoded but not yet visible under its final name.
enum Pending {
    Written,
    Staged(NamedTempFile, PathBuf),
}

#[derive(Debug, Clone)]
pub struct Generator {
    cfg: Configuration,
    format: ImageFormat,
}

impl Generator {
    /// Validate `cfg` and resolve the output encoder.
    pub fn new(cfg: Configuration) -> anyhow::Result<Self> {
        let cfg = cfg.validated()?;
        let format = cfg.output_format()?;
        Ok(Self { cfg, format })
    }

    pub fn config(&self) -> &Configuration {
        &self.cfg
    }

    /// Classify the directory without touching anything.
    pub fn plan(&self) -> Result<Listing, Error> {
        list_dir(&self.cfg.dir, &self.cfg.output_ext, self.cfg.classify)
    }

    /// Run one batch. The first failing file aborts the batch; work already
    /// done for earlier files stays on disk.
    #[instrument(skip_all, fields(dir = %self.cfg.dir.display(), mode = ?self.cfg.mode))]
    pub fn run(&self) -> Result<BatchReport, Error> {
        let listing = self.plan()?;
        let mut report = BatchReport {
            derivatives_skipped: listing.derivatives.len(),
            ..BatchReport::default()
        };

        if self.cfg.mode == Mode::Legacy {
            for stray in &listing.strays {
                delete_if_exists(stray)?;
                report.strays_removed.push(stray.clone());
            }
        }

        for original in &listing.originals {
            let processed = self.process(original)?;
            report.processed.push(processed);
        }

        info!(
            processed = report.processed.len(),
            strays_removed = report.strays_removed.len(),
            skipped = report.derivatives_skipped,
            "batch complete"
        );
        Ok(report)
    }

    /// Drive one original through decode, derivative writes and removal.
    #[instrument(skip_all, fields(path = %original.display()))]
    pub fn process(&self, original: &Path) -> Result<Processed, Error> {
        let ext = &self.cfg.output_ext;
        let write_full = self.cfg.mode == Mode::Replace;
        let full_path = write_full.then(|| derived_path(original, DerivativeKind::Full, ext));
        let thumb_path = derived_path(original, DerivativeKind::Thumb, ext);

        if !self.cfg.overwrite {
            for target in full_path.iter().chain(std::iter::once(&thumb_path)) {
                if target.exists() {
                    return Err(Error::NameCollision(target.clone()));
                }
            }
        }

        let mut stage = Stage::Discovered;
        debug!(%stage);

        let img = decode(original)?;
        let source_size = (img.width(), img.height());
        stage = Stage::Decoded;
        debug!(%stage, width = source_size.0, height = source_size.1);

        let mut pending = Vec::with_capacity(2);
        if let Some(full_path) = &full_path {
            pending.push(self.write_derivative(&img, full_path)?);
            stage = Stage::FullWritten;
            debug!(%stage, target = %full_path.display());
        }

        let thumb = self.thumbnail(&img)?;
        drop(img);
        let thumb_size = (thumb.width(), thumb.height());
        pending.push(self.write_derivative(&thumb, &thumb_path)?);
        stage = Stage::ThumbnailWritten;
        debug!(%stage, target = %thumb_path.display(), width = thumb_size.0, height = thumb_size.1);

        for p in pending {
            commit(p)?;
        }

        if self.cfg.mode == Mode::Replace {
            delete_if_exists(original)?;
            stage = Stage::OriginalDeleted;
            debug!(%stage);
        }

        info!(thumb = %thumb_path.display(), ?source_size, ?thumb_size, "processed");
        Ok(Processed {
            original: original.to_path_buf(),
            full: full_path,
            thumb: thumb_path,
            source_size,
            thumb_size,
            stage,
        })
    }

    fn thumbnail(&self, img: &DynamicImage) -> Result<DynamicImage, Error> {
        let (w, h) = fit_within(img.width(), img.height(), self.cfg.max_size);
        let rgba = img.to_rgba8();
        let small = resize_rgba(&rgba, w, h, self.cfg.resize_filter)?;
        Ok(DynamicImage::ImageRgba8(small))
    }

    /// Encode `img` to `target`, directly or into a staging file next to it.
    fn write_derivative(&self, img: &DynamicImage, target: &Path) -> Result<Pending, Error> {
        let img = encodable(img, self.format);
        if !self.cfg.atomic_writes {
            let file = fs::File::create(target).map_err(|e| Error::io(target, e))?;
            encode_into(&img, &file, self.format, target)?;
            return Ok(Pending::Written);
        }

        let dir = target
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let staged = staging_file(dir)?;
        encode_into(&img, staged.as_file(), self.format, target)?;
        Ok(Pending::Staged(staged, target.to_path_buf()))
    }
}

fn decode(path: &Path) -> Result<DynamicImage, Error> {
    ImageReader::open(path)
        .map_err(|e| Error::io(path, e))?
        .with_guessed_format()
        .map_err(|e| Error::io(path, e))?
        .decode()
        .map_err(|source| Error::Decode {
            path: path.to_path_buf(),
            source,
        })
}

fn encode_into(
    img: &DynamicImage,
    file: &fs::File,
    format: ImageFormat,
    target: &Path,
) -> Result<(), Error> {
    let mut w = BufWriter::new(file);
    img.write_to(&mut w, format).map_err(|source| Error::Encode {
        path: target.to_path_buf(),
        source,
    })?;
    w.flush().map_err(|e| Error::io(target, e))
}

/// Convert to a color type the chosen encoder accepts.
fn encodable(img: &DynamicImage, format: ImageFormat) -> Cow<'_, DynamicImage> {
    match (format, img) {
        (ImageFormat::Png, _) => Cow::Borrowed(img),
        (ImageFormat::Jpeg, DynamicImage::ImageRgb8(_) | DynamicImage::ImageLuma8(_)) => {
            Cow::Borrowed(img)
        }
        (ImageFormat::Jpeg, _) => Cow::Owned(DynamicImage::ImageRgb8(img.to_rgb8())),
        (_, DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_)) => Cow::Borrowed(img),
        _ => Cow::Owned(DynamicImage::ImageRgba8(img.to_rgba8())),
    }
}

fn staging_file(dir: &Path) -> Result<NamedTempFile, Error> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(STAGING_PREFIX).suffix(".partial");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o644));
    }
    builder.tempfile_in(dir).map_err(|e| Error::io(dir, e))
}

fn commit(pending: Pending) -> Result<(), Error> {
    match pending {
        Pending::Written => Ok(()),
        Pending::Staged(staged, target) => {
            staged
                .persist(&target)
                .map_err(|e| Error::io(&target, e.error))?;
            debug!(target = %target.display(), "staged derivative moved into place");
            Ok(())
        }
    }
}

fn delete_if_exists(p: &Path) -> Result<(), Error> {
    match fs::remove_file(p) {
        Ok(()) => {
            debug!(path = %p.display(), "delete: removed");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %p.display(), "delete: already gone; skipping");
            Ok(())
        }
        Err(e) => Err(Error::io(p, e)),
    }
}
