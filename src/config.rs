use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

use crate::dataset::{ConvertOptions, FailurePolicy};
use crate::types::ImageSize;

/// Command-line arguments for converting synthetic-data box annotations to YOLO labels.
#[derive(Parser, Debug, Clone)]
#[command(version, long_about = None)]
pub struct Args {
    /// JSON manifest with label names and per-image boxes
    #[arg(short = 'm', long = "manifest")]
    pub manifest: String,

    /// Directory for the label files; defaults to `YoloSrc` next to the manifest
    #[arg(short = 'o', long = "output_dir")]
    pub output_dir: Option<String>,

    /// Image width applied to every image instead of the manifest sizes
    #[arg(long = "image_width", requires = "image_height", value_parser = validate_dimension)]
    pub image_width: Option<u32>,

    /// Image height applied to every image instead of the manifest sizes
    #[arg(long = "image_height", requires = "image_width", value_parser = validate_dimension)]
    pub image_height: Option<u32>,

    /// What to do with already written files when the conversion fails.
    /// `rollback` deletes every file this run wrote, including label files
    /// that existed before and were overwritten (their old content is lost)
    #[arg(long = "on_failure", value_enum, default_value = "keep")]
    pub on_failure: OnFailure,

    /// Convert images concurrently
    #[arg(long = "parallel")]
    pub parallel: bool,

    /// Hide the progress bar
    #[arg(long = "no_progress")]
    pub no_progress: bool,
}

// Partial-output policy as exposed on the command line
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum OnFailure {
    Keep,
    Rollback,
}

impl Args {
    /// Manual image size, if both dimensions were given
    pub fn manual_size(&self) -> Option<ImageSize> {
        match (self.image_width, self.image_height) {
            (Some(width), Some(height)) => Some(ImageSize::new(width, height)),
            _ => None,
        }
    }

    pub fn output_dir(&self) -> PathBuf {
        match &self.output_dir {
            Some(dir) => PathBuf::from(dir),
            None => Path::new(&self.manifest)
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join("YoloSrc"),
        }
    }

    pub fn to_convert_options(&self) -> ConvertOptions {
        ConvertOptions {
            on_failure: match self.on_failure {
                OnFailure::Keep => FailurePolicy::KeepPartial,
                OnFailure::Rollback => FailurePolicy::Rollback,
            },
            parallel: self.parallel,
            show_progress: !self.no_progress,
        }
    }
}

// Validate that an image dimension is a positive integer
fn validate_dimension(s: &str) -> Result<u32, String> {
    match s.parse::<u32>() {
        Ok(val) if val > 0 => Ok(val),
        _ => Err("image dimensions must be positive integers".to_string()),
    }
}
