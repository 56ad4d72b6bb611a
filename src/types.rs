use serde::{Deserialize, Serialize};

// File name of the shared label-name index
pub const OBJECT_NAMES_FILE: &str = "object_names.txt";

// Extension of every per-image label file
pub const LABEL_EXTENSION: &str = "txt";

/// A bounding box in absolute pixel units, anchored at its top-left corner.
///
/// `x`/`y` may be negative for boxes that leave the frame. The extents are
/// unsigned, so a negative width or height never gets past deserialization.
/// Coordinates are 32-bit so `x + width / 2` always fits in an `i64`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct RawBox {
    pub label_id: u32,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl RawBox {
    pub fn new(label_id: u32, x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            label_id,
            x,
            y,
            width,
            height,
        }
    }
}

// Pixel dimensions of the image a set of boxes belongs to
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero and no box can be normalized against it
    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A box expressed as fractions of the image size, center-anchored.
///
/// Values are not clamped: boxes that leave the frame yield coordinates
/// below 0 or above 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedBox {
    pub x_center: f64,
    pub y_center: f64,
    pub width: f64,
    pub height: f64,
}

// One line of a YOLO label file
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelRecord {
    pub label_id: u32,
    pub bbox: NormalizedBox,
}

// Everything needed to emit the label file of one image
#[derive(Debug, Clone, PartialEq)]
pub struct ImageLabels {
    pub stem: String,
    pub boxes: Vec<RawBox>,
    pub size: ImageSize,
}

// Struct to hold conversion statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConversionStats {
    pub images: usize,
    pub boxes: usize,
    pub empty_label_files: usize,
}

impl ConversionStats {
    pub fn record_image(&mut self, box_count: usize) {
        self.images += 1;
        self.boxes += box_count;
        if box_count == 0 {
            self.empty_label_files += 1;
        }
    }

    pub fn print_summary(&self) {
        log::info!("=== Conversion Summary ===");
        log::info!("Label files written: {}", self.images);
        log::info!("Boxes written: {}", self.boxes);
        if self.empty_label_files > 0 {
            log::info!(
                "Images without annotated objects: {}",
                self.empty_label_files
            );
        }
    }
}
