//! Error taxonomy for the conversion pipeline
//!
//! Every failure is surfaced as a typed value; nothing is logged and skipped.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The image has a zero width or height, so no box can be normalized against it.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("image size {width}x{height} has a zero dimension")]
pub struct DegenerateImageError {
    pub width: u32,
    pub height: u32,
}

// Coarse classification of a failed filesystem operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoFailure {
    NotFound,
    PermissionDenied,
    Other,
}

impl From<io::ErrorKind> for IoFailure {
    fn from(kind: io::ErrorKind) -> Self {
        match kind {
            io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => IoFailure::NotFound,
            io::ErrorKind::PermissionDenied => IoFailure::PermissionDenied,
            _ => IoFailure::Other,
        }
    }
}

impl fmt::Display for IoFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            IoFailure::NotFound => "path not found",
            IoFailure::PermissionDenied => "permission denied",
            IoFailure::Other => "i/o error",
        };
        f.write_str(text)
    }
}

/// A filesystem operation failed on `path`.
#[derive(Error, Debug)]
#[error("{kind} at {}", .path.display())]
pub struct LabelIoError {
    pub path: PathBuf,
    pub kind: IoFailure,
    #[source]
    pub source: io::Error,
}

impl LabelIoError {
    pub fn new(path: &Path, source: io::Error) -> Self {
        Self {
            path: path.to_path_buf(),
            kind: IoFailure::from(source.kind()),
            source,
        }
    }
}

/// A box entry in the annotation manifest is missing a field or has a bad value.
#[derive(Error, Debug)]
#[error("malformed box #{index} in image `{image}`")]
pub struct SchemaError {
    pub image: String,
    pub index: usize,
    #[source]
    pub source: serde_json::Error,
}

// Pipeline step an image failed in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Normalize,
    Write,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Normalize => f.write_str("normalize"),
            Stage::Write => f.write_str("write"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ImageFailureCause {
    #[error(transparent)]
    Degenerate(#[from] DegenerateImageError),
    #[error(transparent)]
    Io(#[from] LabelIoError),
}

/// The conversion of a single image failed.
#[derive(Error, Debug)]
#[error("image #{index} `{stem}` failed to {}: {cause}", self.stage())]
pub struct ImageFailure {
    pub index: usize,
    pub stem: String,
    pub cause: ImageFailureCause,
}

impl ImageFailure {
    pub fn stage(&self) -> Stage {
        match self.cause {
            ImageFailureCause::Degenerate(_) => Stage::Normalize,
            ImageFailureCause::Io(_) => Stage::Write,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("failed to write the label-name index")]
    NameIndex(#[source] LabelIoError),
    #[error(transparent)]
    Image(#[from] ImageFailure),
    #[error("{} images failed to convert: {}", .0.len(), summarize(.0))]
    Images(Vec<ImageFailure>),
    #[error("failed to prepare the output directory")]
    OutputDir(#[source] LabelIoError),
    #[error("failed to read the annotation manifest")]
    Manifest(#[source] LabelIoError),
    #[error("annotation manifest {} is not valid JSON", .path.display())]
    ManifestFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("image `{image}` has no size in the manifest and its header could not be read")]
    ImageSize {
        image: String,
        #[source]
        source: image::ImageError,
    },
}

fn summarize(failures: &[ImageFailure]) -> String {
    failures
        .iter()
        .map(|failure| failure.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// A label file line could not be parsed back.
#[derive(Error, Debug)]
pub enum LabelReadError {
    #[error(transparent)]
    Io(#[from] LabelIoError),
    #[error("line {line}: expected 5 space-separated fields, got `{text}`")]
    MalformedLine { line: usize, text: String },
    #[error("line {line}: invalid label id: {source}")]
    LabelId {
        line: usize,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("line {line}: invalid coordinate: {source}")]
    Coordinate {
        line: usize,
        #[source]
        source: std::num::ParseFloatError,
    },
}
