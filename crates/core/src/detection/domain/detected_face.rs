use serde::Serialize;

/// One face decoded from a detector result.
///
/// Raw fields are in image-pixel space (top-left corner plus extent).
/// Instances are built by the result decoder and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DetectedFace {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    neighbors: i32,
    angle: i32,
    landmarks: Vec<(i32, i32)>,
}

impl DetectedFace {
    pub(crate) fn from_record(record: [i32; 6], landmarks: Vec<(i32, i32)>) -> Self {
        let [x, y, width, height, neighbors, angle] = record;
        Self {
            x,
            y,
            width,
            height,
            neighbors,
            angle,
            landmarks,
        }
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn neighbors(&self) -> i32 {
        self.neighbors
    }

    /// Orientation hint as emitted by the detector.
    pub fn angle(&self) -> i32 {
        self.angle
    }

    /// Landmark points in emission order; empty when landmarks were off.
    pub fn landmarks(&self) -> &[(i32, i32)] {
        &self.landmarks
    }

    pub fn has_landmarks(&self) -> bool {
        !self.landmarks.is_empty()
    }

    pub fn center(&self) -> (f64, f64) {
        (
            self.x as f64 + self.width as f64 / 2.0,
            self.y as f64 + self.height as f64 / 2.0,
        )
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width as f64, self.height as f64)
    }
}
