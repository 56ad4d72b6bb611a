use std::fmt::Write;

use crate::error::{DegenerateImageError, LabelReadError};
use crate::normalize::normalize;
use crate::types::{ImageSize, LabelRecord, NormalizedBox, RawBox};

/// Normalize every box of one image, preserving input order
pub fn convert_image_labels(
    boxes: &[RawBox],
    size: ImageSize,
) -> Result<Vec<LabelRecord>, DegenerateImageError> {
    if size.is_degenerate() {
        return Err(DegenerateImageError {
            width: size.width,
            height: size.height,
        });
    }

    boxes
        .iter()
        .map(|raw| {
            normalize(raw, size).map(|bbox| LabelRecord {
                label_id: raw.label_id,
                bbox,
            })
        })
        .collect()
}

/// Render records in YOLO format, one `"<id> <xc> <yc> <w> <h>\n"` line each
pub fn format_records(records: &[LabelRecord]) -> String {
    let mut yolo_data = String::with_capacity(records.len() * 64);

    for record in records {
        let NormalizedBox {
            x_center,
            y_center,
            width,
            height,
        } = record.bbox;
        // Writing into a String cannot fail
        let _ = writeln!(
            yolo_data,
            "{} {} {} {} {}",
            record.label_id,
            format_coordinate(x_center),
            format_coordinate(y_center),
            format_coordinate(width),
            format_coordinate(height)
        );
    }

    yolo_data
}

/// Shortest decimal that parses back to the same `f64`.
///
/// Integral values keep a trailing `.0` so every coordinate reads as a float.
pub fn format_coordinate(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// Parse one label-file line; `line` is 1-based and only used for diagnostics
pub fn parse_record(line: usize, text: &str) -> Result<LabelRecord, LabelReadError> {
    let fields: Vec<&str> = text.split_whitespace().collect();
    let &[label_id, x_center, y_center, width, height] = fields.as_slice() else {
        return Err(LabelReadError::MalformedLine {
            line,
            text: text.to_string(),
        });
    };

    let coordinate = |field: &str| {
        field
            .parse::<f64>()
            .map_err(|source| LabelReadError::Coordinate { line, source })
    };

    Ok(LabelRecord {
        label_id: label_id
            .parse()
            .map_err(|source| LabelReadError::LabelId { line, source })?,
        bbox: NormalizedBox {
            x_center: coordinate(x_center)?,
            y_center: coordinate(y_center)?,
            width: coordinate(width)?,
            height: coordinate(height)?,
        },
    })
}
