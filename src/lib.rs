//! Synthetic-data annotations to YOLO label converter
//!
//! This library normalizes absolute pixel bounding boxes into YOLO's
//! center-relative format and writes one label file per image plus the
//! shared `object_names.txt` index.

pub mod config;
pub mod conversion;
pub mod dataset;
pub mod error;
pub mod io;
pub mod manifest;
pub mod normalize;
pub mod types;
pub mod utils;

// Re-export commonly used types and functions
pub use config::Args;
pub use conversion::convert_image_labels;
pub use dataset::{convert_dataset, ConvertOptions, FailurePolicy};
pub use error::{ConversionError, DegenerateImageError, LabelIoError, SchemaError};
pub use io::{read_label_file, setup_output_directory, write_label_file, write_label_name_index};
pub use manifest::{read_manifest, Manifest};
pub use normalize::normalize;
pub use types::{ImageLabels, ImageSize, LabelRecord, NormalizedBox, RawBox};
