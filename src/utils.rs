use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

/// Create a progress bar with the given length and label
pub fn create_progress_bar(len: u64, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    let style = ProgressStyle::default_bar()
        .template(&format!(
            "{{spinner:.green}} [{}] [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} ({{eta}})",
            label
        ))
        .map(|style| style.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb
}

/// Label file stem for an image: file name without directory or final
/// extension, made safe for use as a file name.
///
/// Both `/` and `\` count as separators since generator manifests may come
/// from either platform.
pub fn label_stem(image_filename: &str) -> String {
    let file_name = image_filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(image_filename);
    let stem = Path::new(file_name)
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_else(|| file_name.into());
    sanitize_filename::sanitize(stem)
}
