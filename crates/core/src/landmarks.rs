//! Landmark types returned by the vision capability.
//!
//! Coordinates are normalized: `x` and `y` are fractions of the image width
//! and height, so they must be scaled before drawing.

use serde::{Deserialize, Serialize};

/// Minimum `visibility` for a pose landmark to be drawn.
pub const VISIBILITY_THRESHOLD: f32 = 0.5;

/// Number of landmarks in the body-pose topology.
pub const POSE_LANDMARK_COUNT: usize = 33;

/// Edges of the 33-point body-pose skeleton.
pub const POSE_CONNECTIONS: [(usize, usize); 35] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 7),
    (0, 4),
    (4, 5),
    (5, 6),
    (6, 8),
    (9, 10),
    (11, 12),
    (11, 13),
    (13, 15),
    (15, 17),
    (15, 19),
    (15, 21),
    (17, 19),
    (12, 14),
    (14, 16),
    (16, 18),
    (16, 20),
    (16, 22),
    (18, 20),
    (11, 23),
    (12, 24),
    (23, 24),
    (23, 25),
    (24, 26),
    (25, 27),
    (26, 28),
    (27, 29),
    (28, 30),
    (29, 31),
    (30, 32),
    (27, 31),
    (28, 32),
];

/// A single landmark in normalized image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedLandmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
    /// Only pose landmarks carry a visibility score.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f32>,
}

impl NormalizedLandmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            z: 0.0,
            visibility: None,
        }
    }

    /// Scale to pixel coordinates, truncating toward zero.
    pub fn to_pixel(&self, width: u32, height: u32) -> (i32, i32) {
        let x = (self.x * width as f32) as i32;
        let y = (self.y * height as f32) as i32;
        (x, y)
    }

    pub fn is_visible(&self) -> bool {
        self.visibility.map_or(true, |v| v >= VISIBILITY_THRESHOLD)
    }

    /// Whether both normalized coordinates fall inside `[0, 1]`.
    pub fn is_in_frame(&self) -> bool {
        (0.0..=1.0).contains(&self.x) && (0.0..=1.0).contains(&self.y)
    }
}

/// Landmarks of one detected face.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FaceMesh {
    pub landmarks: Vec<NormalizedLandmark>,
}

/// Landmarks of one detected body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseSkeleton {
    pub landmarks: Vec<NormalizedLandmark>,
}

/// Face-mesh configuration forwarded to the vision capability.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceMeshOptions {
    pub static_image_mode: bool,
    pub max_num_faces: u32,
    pub refine_landmarks: bool,
    pub min_detection_confidence: f32,
}

impl Default for FaceMeshOptions {
    fn default() -> Self {
        Self {
            static_image_mode: true,
            max_num_faces: 1,
            refine_landmarks: true,
            min_detection_confidence: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_pixel_scales_by_width_and_height() {
        let lm = NormalizedLandmark::new(0.5, 0.25);
        assert_eq!(lm.to_pixel(200, 100), (100, 25));
    }

    #[test]
    fn to_pixel_truncates_toward_zero() {
        let lm = NormalizedLandmark::new(0.999, 0.001);
        assert_eq!(lm.to_pixel(10, 10), (9, 0));

        let outside = NormalizedLandmark::new(-0.05, 1.2);
        assert_eq!(outside.to_pixel(100, 100), (-5, 120));
    }

    #[test]
    fn visibility_defaults_to_visible() {
        assert!(NormalizedLandmark::new(0.1, 0.1).is_visible());

        let mut lm = NormalizedLandmark::new(0.1, 0.1);
        lm.visibility = Some(0.49);
        assert!(!lm.is_visible());
        lm.visibility = Some(0.5);
        assert!(lm.is_visible());
    }

    #[test]
    fn in_frame_includes_the_borders() {
        assert!(NormalizedLandmark::new(0.0, 1.0).is_in_frame());
        assert!(NormalizedLandmark::new(0.5, 0.5).is_in_frame());
        assert!(!NormalizedLandmark::new(-0.01, 0.5).is_in_frame());
        assert!(!NormalizedLandmark::new(0.5, 1.2).is_in_frame());
    }

    #[test]
    fn pose_connections_stay_within_topology() {
        for (a, b) in POSE_CONNECTIONS {
            assert!(a < POSE_LANDMARK_COUNT && b < POSE_LANDMARK_COUNT);
        }
    }

    #[test]
    fn default_face_mesh_options_track_a_single_face() {
        let opts = FaceMeshOptions::default();
        assert_eq!(opts.max_num_faces, 1);
        assert!(opts.refine_landmarks);
        assert!(opts.static_image_mode);
        assert_eq!(opts.min_detection_confidence, 0.5);
    }

    #[test]
    fn landmark_deserializes_without_optional_fields() {
        let lm: NormalizedLandmark = serde_json::from_str(r#"{"x":0.2,"y":0.4}"#).unwrap();
        assert_eq!(lm, NormalizedLandmark::new(0.2, 0.4));
    }
}
