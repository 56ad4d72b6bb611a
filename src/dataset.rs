use indicatif::ProgressBar;
use log::{debug, info, warn};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

use crate::conversion::convert_image_labels;
use crate::error::{ConversionError, ImageFailure, ImageFailureCause};
use crate::io::{remove_written_files, write_label_file, write_label_name_index};
use crate::types::{ConversionStats, ImageLabels};
use crate::utils::create_progress_bar;

/// What to do with files already written when a run fails midway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Leave every file written before the failure in place
    #[default]
    KeepPartial,
    /// Delete the label files and name index written by this run
    Rollback,
}

#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub on_failure: FailurePolicy,
    pub parallel: bool,
    pub show_progress: bool,
}

/// Convert a whole dataset into YOLO label files under `output_dir`.
///
/// The name index is written first; if that fails no image is touched.
/// Sequential runs stop at the first failing image. Parallel runs convert
/// every image and report all failures ordered by input position.
pub fn convert_dataset<S: AsRef<str>>(
    images: &[ImageLabels],
    names: &[S],
    output_dir: &Path,
    options: &ConvertOptions,
) -> Result<ConversionStats, ConversionError> {
    info!(
        "Writing {} label names to {}",
        names.len(),
        output_dir.display()
    );
    let names_path =
        write_label_name_index(names, output_dir).map_err(ConversionError::NameIndex)?;

    let pb = if options.show_progress {
        create_progress_bar(images.len() as u64, "Labels")
    } else {
        ProgressBar::hidden()
    };

    let (written, outcome) = if options.parallel {
        convert_images_in_parallel(images, output_dir, &pb)
    } else {
        convert_images_in_order(images, output_dir, &pb)
    };

    match outcome {
        Ok(stats) => {
            pb.finish_with_message("Label conversion complete");
            info!("Converted {} images.", stats.images);
            Ok(stats)
        }
        Err(e) => {
            pb.abandon_with_message("Label conversion failed");
            if options.on_failure == FailurePolicy::Rollback {
                warn!(
                    "Rolling back {} label files and the name index",
                    written.len()
                );
                remove_written_files(&written);
                remove_written_files(&[names_path]);
            }
            Err(e)
        }
    }
}

fn convert_image(
    index: usize,
    image: &ImageLabels,
    output_dir: &Path,
) -> Result<PathBuf, ImageFailure> {
    let failure = |cause: ImageFailureCause| ImageFailure {
        index,
        stem: image.stem.clone(),
        cause,
    };

    let records = convert_image_labels(&image.boxes, image.size).map_err(|e| failure(e.into()))?;
    let label_path =
        write_label_file(&records, &image.stem, output_dir).map_err(|e| failure(e.into()))?;
    debug!(
        "Wrote {} boxes to {}",
        records.len(),
        label_path.display()
    );
    Ok(label_path)
}

fn convert_images_in_order(
    images: &[ImageLabels],
    output_dir: &Path,
    pb: &ProgressBar,
) -> (Vec<PathBuf>, Result<ConversionStats, ConversionError>) {
    let mut stats = ConversionStats::default();
    let mut written = Vec::with_capacity(images.len());

    for (index, image) in images.iter().enumerate() {
        match convert_image(index, image, output_dir) {
            Ok(path) => {
                written.push(path);
                stats.record_image(image.boxes.len());
                pb.inc(1);
            }
            Err(failure) => return (written, Err(failure.into())),
        }
    }

    (written, Ok(stats))
}

fn convert_images_in_parallel(
    images: &[ImageLabels],
    output_dir: &Path,
    pb: &ProgressBar,
) -> (Vec<PathBuf>, Result<ConversionStats, ConversionError>) {
    // Collecting an indexed parallel iterator keeps input order
    let outcomes: Vec<Result<PathBuf, ImageFailure>> = images
        .par_iter()
        .enumerate()
        .map(|(index, image)| {
            let outcome = convert_image(index, image, output_dir);
            pb.inc(1);
            outcome
        })
        .collect();

    let mut written = Vec::with_capacity(outcomes.len());
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(path) => written.push(path),
            Err(failure) => failures.push(failure),
        }
    }
    if !failures.is_empty() {
        return (written, Err(ConversionError::Images(failures)));
    }

    let mut stats = ConversionStats::default();
    for image in images {
        stats.record_image(image.boxes.len());
    }
    (written, Ok(stats))
}
