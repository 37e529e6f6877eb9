/// Bounding box in center format, as produced by the upstream tracker.
///
/// The detector reports boxes as `(center_x, center_y, width, height)`; all
/// zone membership math happens in this format.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BBox {
    /// Center x coordinate
    pub cx: f32,
    /// Center y coordinate
    pub cy: f32,
    /// Width of the bounding box
    pub width: f32,
    /// Height of the bounding box
    pub height: f32,
}

impl BBox {
    /// Create a new BBox from center coordinates and dimensions (XYWH format).
    #[inline]
    pub fn new(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        Self {
            cx,
            cy,
            width,
            height,
        }
    }

    /// Create a BBox from TLBR format (top-left x, top-left y, bottom-right x, bottom-right y).
    #[inline]
    pub fn from_tlbr(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            cx: (x1 + x2) / 2.0,
            cy: (y1 + y2) / 2.0,
            width: x2 - x1,
            height: y2 - y1,
        }
    }

    /// Convert to TLBR format: (x1, y1, x2, y2).
    #[inline]
    pub fn to_tlbr(&self) -> [f32; 4] {
        [
            self.cx - self.width / 2.0,
            self.cy - self.height / 2.0,
            self.cx + self.width / 2.0,
            self.cy + self.height / 2.0,
        ]
    }

    /// Get the center point of the bounding box.
    #[inline]
    pub fn center(&self) -> (f32, f32) {
        (self.cx, self.cy)
    }

    /// Get the area of the bounding box.
    #[inline]
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Width over height; 0.0 for a degenerate box.
    #[inline]
    pub fn aspect_ratio(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            0.0
        }
    }

    /// Y coordinate of the bottom edge.
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.cy + self.height / 2.0
    }
}

/// Euclidean distance between two centers.
#[inline]
pub fn center_dist(a: (f32, f32), b: (f32, f32)) -> f32 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    (dx * dx + dy * dy).sqrt()
}

/// The axis-aligned counting region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zone {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl Zone {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Derive the counting region as a symmetric inset of the frame.
    ///
    /// With the default 12% margin this isolates edge noise while keeping the
    /// bulk of the frame countable.
    pub fn inset(frame_w: f32, frame_h: f32, margin: f32) -> Self {
        Self {
            x1: frame_w * margin,
            y1: frame_h * margin,
            x2: frame_w * (1.0 - margin),
            y2: frame_h * (1.0 - margin),
        }
    }

    /// Fraction of the box area that overlaps the zone.
    ///
    /// A box with non-positive area is malformed detector output and reports
    /// zero overlap.
    pub fn overlap_ratio(&self, bbox: &BBox) -> f32 {
        let [bx1, by1, bx2, by2] = bbox.to_tlbr();

        let inter_x1 = bx1.max(self.x1);
        let inter_y1 = by1.max(self.y1);
        let inter_x2 = bx2.min(self.x2);
        let inter_y2 = by2.min(self.y2);

        let inter_area = (inter_x2 - inter_x1).max(0.0) * (inter_y2 - inter_y1).max(0.0);
        let box_area = bbox.area();

        if box_area <= 0.0 {
            return 0.0;
        }

        inter_area / box_area
    }
}
