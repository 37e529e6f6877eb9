//! Builder for creating Detection objects from various input formats.

use crate::counter::{BBox, Detection};

/// Builder for creating `Detection` objects from various input formats.
#[derive(Debug, Clone, Default)]
pub struct DetectionBuilder {
    cx: f32,
    cy: f32,
    width: f32,
    height: f32,
    class_id: u32,
    track_id: u64,
}

impl DetectionBuilder {
    /// Create a new detection builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set bounding box in XYWH format (center_x, center_y, width, height).
    pub fn xywh(mut self, cx: f32, cy: f32, w: f32, h: f32) -> Self {
        self.cx = cx;
        self.cy = cy;
        self.width = w;
        self.height = h;
        self
    }

    /// Set bounding box in TLBR format (x1, y1, x2, y2).
    pub fn tlbr(mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        let b = BBox::from_tlbr(x1, y1, x2, y2);
        self.cx = b.cx;
        self.cy = b.cy;
        self.width = b.width;
        self.height = b.height;
        self
    }

    /// Set bounding box in TLWH format (top-left x, top-left y, width, height).
    pub fn tlwh(mut self, x: f32, y: f32, w: f32, h: f32) -> Self {
        self.cx = x + w / 2.0;
        self.cy = y + h / 2.0;
        self.width = w;
        self.height = h;
        self
    }

    /// Set the detector class id.
    pub fn class_id(mut self, class_id: u32) -> Self {
        self.class_id = class_id;
        self
    }

    /// Set the tracker-assigned track id.
    pub fn track_id(mut self, track_id: u64) -> Self {
        self.track_id = track_id;
        self
    }

    /// Build the final `Detection`.
    pub fn build(self) -> Detection {
        Detection::from_bbox(
            BBox::new(self.cx, self.cy, self.width, self.height),
            self.class_id,
            self.track_id,
        )
    }
}
