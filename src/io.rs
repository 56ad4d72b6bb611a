use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::conversion::{format_records, parse_record};
use crate::error::{LabelIoError, LabelReadError};
use crate::types::{LabelRecord, LABEL_EXTENSION, OBJECT_NAMES_FILE};

// Mode of written label files, as `File::create` yields under the usual 022 umask
#[cfg(unix)]
const LABEL_FILE_MODE: u32 = 0o644;

/// Path of the label file for the image with the given stem
pub fn label_file_path(output_dir: &Path, stem: &str) -> PathBuf {
    output_dir.join(format!("{}.{}", stem, LABEL_EXTENSION))
}

/// Write the YOLO label file `output_dir/<stem>.txt`.
///
/// The file is always created, even for zero records, so trainers that look
/// labels up by image name find an entry for every image. Content goes to a
/// temporary file in `output_dir` first and is renamed over the target.
pub fn write_label_file(
    records: &[LabelRecord],
    stem: &str,
    output_dir: &Path,
) -> Result<PathBuf, LabelIoError> {
    let label_path = label_file_path(output_dir, stem);
    let yolo_data = format_records(records);
    write_atomically(&label_path, output_dir, yolo_data.as_bytes())?;
    Ok(label_path)
}

/// Write `output_dir/object_names.txt`; line N is the name of label id N
pub fn write_label_name_index<S: AsRef<str>>(
    names: &[S],
    output_dir: &Path,
) -> Result<PathBuf, LabelIoError> {
    let names_path = output_dir.join(OBJECT_NAMES_FILE);
    let mut content = String::with_capacity(names.len() * 16);
    for name in names {
        content.push_str(name.as_ref());
        content.push('\n');
    }
    write_atomically(&names_path, output_dir, content.as_bytes())?;
    Ok(names_path)
}

fn write_atomically(target: &Path, dir: &Path, content: &[u8]) -> Result<(), LabelIoError> {
    let wrap = |e| LabelIoError::new(target, e);

    let temp = NamedTempFile::new_in(dir).map_err(wrap)?;
    {
        let mut writer = BufWriter::new(temp.as_file());
        writer.write_all(content).map_err(wrap)?;
        writer.flush().map_err(wrap)?;
    }
    // Temp files are owner-only; label files must stay readable by other users
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        temp.as_file()
            .set_permissions(fs::Permissions::from_mode(LABEL_FILE_MODE))
            .map_err(wrap)?;
    }
    temp.persist(target).map_err(|e| wrap(e.error))?;
    Ok(())
}

/// Read a YOLO label file back into records
pub fn read_label_file(path: &Path) -> Result<Vec<LabelRecord>, LabelReadError> {
    let file = File::open(path).map_err(|e| LabelIoError::new(path, e))?;

    BufReader::new(file)
        .lines()
        .enumerate()
        .filter_map(|(index, line)| match line {
            Ok(text) if text.trim().is_empty() => None,
            Ok(text) => Some(parse_record(index + 1, &text)),
            Err(e) => Some(Err(LabelIoError::new(path, e).into())),
        })
        .collect()
}

/// Create the output directory (and parents) if missing; existing files are kept
pub fn setup_output_directory(path: &Path) -> Result<PathBuf, LabelIoError> {
    if path.is_dir() {
        log::debug!("Writing into existing directory {:?}", path);
    } else {
        fs::create_dir_all(path).map_err(|e| LabelIoError::new(path, e))?;
    }
    Ok(path.to_path_buf())
}

/// Best-effort removal of files written during a failed run
pub fn remove_written_files(paths: &[PathBuf]) {
    for path in paths {
        if let Err(e) = fs::remove_file(path) {
            log::warn!("Failed to roll back {}: {}", path.display(), e);
        }
    }
}
