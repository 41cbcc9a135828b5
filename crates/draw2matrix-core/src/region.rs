use serde::{Deserialize, Serialize};

/// On-screen bounding box of the drawing surface at capture time.
///
/// Coordinates are in capture pixels with the origin at the top-left of the
/// captured image.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub width: f32,
    pub height: f32,
    pub x: f32,
    pub y: f32,
}

impl Region {
    pub fn new(width: f32, height: f32, x: f32, y: f32) -> Self {
        Self {
            width,
            height,
            x,
            y,
        }
    }

    /// Region covering a `width × height` surface at the origin.
    pub fn at_origin(width: f32, height: f32) -> Self {
        Self::new(width, height, 0.0, 0.0)
    }
}
