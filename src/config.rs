use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, ensure};
use image::ImageFormat;
use serde::Deserialize;

/// What a batch does with each original.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Write full and thumbnail derivatives, then delete the original.
    #[default]
    Replace,
    /// Write only the thumbnail, keep the original, and purge `thumb.thumb` strays first.
    Legacy,
}

/// How file names are recognized as derivatives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClassifyMode {
    /// Derivative iff the name ends in `.full.<ext>` or `.thumb.<ext>`.
    #[default]
    Strict,
    /// Derivative iff the name contains `thumb` or `full` anywhere.
    Substring,
}

/// Resampling filter used for thumbnails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeFilter {
    Nearest,
    Bilinear,
    #[default]
    CatmullRom,
    Lanczos3,
}

impl ResizeFilter {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Nearest => "nearest",
            Self::Bilinear => "bilinear",
            Self::CatmullRom => "catmull-rom",
            Self::Lanczos3 => "lanczos3",
        }
    }
}

impl fmt::Display for ResizeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Configuration {
    /// Directory whose top-level files are processed.
    pub dir: PathBuf,
    /// Bounding box edge, in pixels, that thumbnails must fit within.
    pub max_size: u32,
    /// Extension (and therefore encoder) of every derivative, without the dot.
    pub output_ext: String,
    pub mode: Mode,
    pub classify: ClassifyMode,
    pub resize_filter: ResizeFilter,
    /// Encode derivatives into temporary files and rename them into place together.
    pub atomic_writes: bool,
    /// Silently replace derivatives that already exist.
    pub overwrite: bool,
}

impl Configuration {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let s = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&s)?)
    }

    /// Normalize the output extension and check invariants serde defaults cannot express.
    pub fn validated(mut self) -> Result<Self> {
        self.output_ext = self
            .output_ext
            .trim()
            .trim_start_matches('.')
            .to_ascii_lowercase();
        ensure!(self.max_size > 0, "max-size must be greater than zero");
        ensure!(!self.output_ext.is_empty(), "output-ext must not be empty");
        self.output_format()
            .with_context(|| format!("invalid output-ext {:?}", self.output_ext))?;
        Ok(self)
    }

    /// Encoder selected by `output_ext`.
    pub fn output_format(&self) -> Result<ImageFormat> {
        let format = ImageFormat::from_extension(&self.output_ext)
            .ok_or_else(|| anyhow!("unknown image extension"))?;
        ensure!(
            format.writing_enabled(),
            "no encoder available for {format:?}"
        );
        Ok(format)
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data/images"),
            max_size: 128,
            output_ext: "png".to_string(),
            mode: Mode::default(),
            classify: ClassifyMode::default(),
            resize_filter: ResizeFilter::default(),
            atomic_writes: true,
            overwrite: true,
        }
    }
}
