use crate::error::DegenerateImageError;
use crate::types::{ImageSize, NormalizedBox, RawBox};

/// Convert an absolute top-left box into YOLO's center-relative form.
///
/// The half extent is floored on integers *before* the division, so boxes
/// with an odd width or height get a center biased up to half a pixel toward
/// the top-left. Downstream trainers were fed labels produced this way; do
/// not replace it with `(x + width / 2.0)` without regenerating datasets.
pub fn normalize(raw: &RawBox, size: ImageSize) -> Result<NormalizedBox, DegenerateImageError> {
    if size.is_degenerate() {
        return Err(DegenerateImageError {
            width: size.width,
            height: size.height,
        });
    }

    let image_width = f64::from(size.width);
    let image_height = f64::from(size.height);

    // Unsigned division truncates, which is the floor for non-negative extents
    let cx_abs = i64::from(raw.x) + i64::from(raw.width / 2);
    let cy_abs = i64::from(raw.y) + i64::from(raw.height / 2);

    Ok(NormalizedBox {
        x_center: cx_abs as f64 / image_width,
        y_center: cy_abs as f64 / image_height,
        width: f64::from(raw.width) / image_width,
        height: f64::from(raw.height) / image_height,
    })
}
