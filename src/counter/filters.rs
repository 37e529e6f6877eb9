//! Geometry filter bank: rejects physically implausible detections before
//! any temporal logic runs.

use crate::counter::geometry::BBox;

/// Pure accept/reject predicate over a detection box and the frame dimensions.
///
/// The detector has no notion of a plausible object, so every raw detection
/// passes through this cascade first. All thresholds are fractions of the
/// frame dimension they apply to, except the aspect-ratio band.
#[derive(Debug, Clone)]
pub struct GeometryFilter {
    /// Minimum width/height aspect ratio
    pub min_aspect: f32,
    /// Maximum width/height aspect ratio
    pub max_aspect: f32,
    /// Margin at the left/right/top screen edges where centers are rejected
    pub edge_margin: f32,
    /// Fraction of frame height beyond which the box bottom is ground noise
    pub ground_cut: f32,
    /// Maximum box dimension as a fraction of the frame dimension
    pub max_size_frac: f32,
    /// Maximum box height as a fraction of frame height
    pub max_height_frac: f32,
    /// Minimum box dimension as a fraction of the frame dimension
    pub min_size_frac: f32,
}

impl Default for GeometryFilter {
    fn default() -> Self {
        Self {
            min_aspect: 0.2,
            max_aspect: 5.0,
            edge_margin: 0.02,
            ground_cut: 0.98,
            max_size_frac: 0.85,
            max_height_frac: 0.70,
            min_size_frac: 0.02,
        }
    }
}

impl GeometryFilter {
    /// Returns true when the box survives every rejection rule. No side effects.
    pub fn accepts(&self, bbox: &BBox, frame_w: f32, frame_h: f32) -> bool {
        let aspect = bbox.aspect_ratio();
        if aspect < self.min_aspect || aspect > self.max_aspect {
            return false;
        }

        let margin_x = frame_w * self.edge_margin;
        let margin_y = frame_h * self.edge_margin;
        if bbox.cx < margin_x || bbox.cx > frame_w - margin_x || bbox.cy < margin_y {
            return false;
        }

        if bbox.bottom() > frame_h * self.ground_cut {
            return false;
        }

        if bbox.width > frame_w * self.max_size_frac || bbox.height > frame_h * self.max_size_frac {
            return false;
        }

        if bbox.height > frame_h * self.max_height_frac {
            return false;
        }

        if bbox.width < frame_w * self.min_size_frac || bbox.height < frame_h * self.min_size_frac {
            return false;
        }

        true
    }
}
