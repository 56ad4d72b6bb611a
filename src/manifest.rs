//! Annotation manifest reader
//!
//! The CLI consumes a JSON manifest listing label names and, per image, its
//! file name, optional size and raw boxes. This module turns it into the
//! `ImageLabels` the converter works on.

use serde::Deserialize;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{ConversionError, LabelIoError, SchemaError};
use crate::types::{ImageLabels, ImageSize, RawBox};
use crate::utils::label_stem;

#[derive(Debug, Deserialize)]
struct ManifestFile {
    names: Vec<String>,
    images: Vec<ManifestImage>,
}

#[derive(Debug, Deserialize)]
struct ManifestImage {
    filename: String,
    width: Option<u32>,
    height: Option<u32>,
    // Kept untyped so a bad box can be reported with its image and position
    #[serde(default)]
    boxes: Vec<Value>,
}

/// A parsed manifest ready for conversion
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    pub names: Vec<String>,
    pub images: Vec<ImageLabels>,
}

/// Read and validate the manifest at `path`.
///
/// `manual_size`, when given, overrides every image size. Otherwise the size
/// comes from the entry, or from the image header at `filename` (resolved
/// relative to the manifest directory) when the entry has none.
pub fn read_manifest(
    path: &Path,
    manual_size: Option<ImageSize>,
) -> Result<Manifest, ConversionError> {
    let file = File::open(path).map_err(|e| ConversionError::Manifest(LabelIoError::new(path, e)))?;
    let manifest: ManifestFile = serde_json::from_reader(BufReader::new(file)).map_err(|source| {
        ConversionError::ManifestFormat {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let images = manifest
        .images
        .into_iter()
        .map(|entry| resolve_image(entry, base_dir, manual_size))
        .collect::<Result<Vec<_>, _>>()?;

    log::info!(
        "Read {} images and {} label names from {}",
        images.len(),
        manifest.names.len(),
        path.display()
    );

    Ok(Manifest {
        names: manifest.names,
        images,
    })
}

fn resolve_image(
    entry: ManifestImage,
    base_dir: &Path,
    manual_size: Option<ImageSize>,
) -> Result<ImageLabels, ConversionError> {
    let boxes = entry
        .boxes
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            serde_json::from_value::<RawBox>(value).map_err(|source| SchemaError {
                image: entry.filename.clone(),
                index,
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let size = match (manual_size, entry.width, entry.height) {
        (Some(size), _, _) => size,
        (None, Some(width), Some(height)) => ImageSize::new(width, height),
        (None, _, _) => read_image_size(&base_dir.join(&entry.filename), &entry.filename)?,
    };

    Ok(ImageLabels {
        stem: label_stem(&entry.filename),
        boxes,
        size,
    })
}

fn read_image_size(image_path: &Path, filename: &str) -> Result<ImageSize, ConversionError> {
    let (width, height) =
        image::image_dimensions(image_path).map_err(|source| ConversionError::ImageSize {
            image: filename.to_string(),
            source,
        })?;
    log::debug!("Read size {}x{} from {}", width, height, image_path.display());
    Ok(ImageSize::new(width, height))
}
