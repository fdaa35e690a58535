use serde::{Deserialize, Serialize};

/// Axis a segment is attributed to when building the mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Horizontal,
    Vertical,
    Diagonal,
}

/// Straight segment between two pixel centres, endpoints inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub p0: [i32; 2],
    pub p1: [i32; 2],
}

impl LineSegment {
    pub fn new(p0: [i32; 2], p1: [i32; 2]) -> Self {
        Self { p0, p1 }
    }

    pub fn length(&self) -> f32 {
        let dx = (self.p1[0] - self.p0[0]) as f32;
        let dy = (self.p1[1] - self.p0[1]) as f32;
        (dx * dx + dy * dy).sqrt()
    }

    /// Angle from the horizontal axis folded into `[0°, 90°]`, so direction
    /// of travel does not matter.
    pub fn angle_deg(&self) -> f32 {
        let dx = (self.p1[0] - self.p0[0]) as f32;
        let dy = (self.p1[1] - self.p0[1]) as f32;
        let a = dy.atan2(dx).abs().to_degrees();
        if a > 90.0 {
            180.0 - a
        } else {
            a
        }
    }

    /// Integer midpoint, rounded half away from zero.
    pub fn midpoint(&self) -> [i32; 2] {
        let mid = |a: i32, b: i32| ((a + b) as f32 * 0.5).round() as i32;
        [mid(self.p0[0], self.p1[0]), mid(self.p0[1], self.p1[1])]
    }

    /// Classify against a tolerance around 0° (horizontal) and 90° (vertical).
    pub fn orientation(&self, angle_threshold_deg: f32) -> Orientation {
        let a = self.angle_deg();
        if a > 90.0 - angle_threshold_deg {
            Orientation::Vertical
        } else if a < angle_threshold_deg {
            Orientation::Horizontal
        } else {
            Orientation::Diagonal
        }
    }
}
