//! Detection input for the counting engine.

use crate::counter::geometry::BBox;

/// One tracked detection for one frame, as supplied by the external
/// detector/tracker. Consumed once per frame.
#[derive(Debug, Clone)]
pub struct Detection {
    /// Bounding box in center format
    pub bbox: BBox,
    /// Detector class id
    pub class_id: u32,
    /// Volatile tracker-assigned identity; may churn across frames
    pub track_id: u64,
}

impl Detection {
    pub fn new(cx: f32, cy: f32, width: f32, height: f32, class_id: u32, track_id: u64) -> Self {
        Self {
            bbox: BBox::new(cx, cy, width, height),
            class_id,
            track_id,
        }
    }

    pub fn from_bbox(bbox: BBox, class_id: u32, track_id: u64) -> Self {
        Self {
            bbox,
            class_id,
            track_id,
        }
    }
}
