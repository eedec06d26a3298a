//! Overlay drawing for detected landmarks.

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut};

use crate::landmarks::{FaceMesh, NormalizedLandmark, PoseSkeleton, POSE_CONNECTIONS};

pub const GREEN: Rgb<u8> = Rgb([0, 255, 0]);
pub const BLUE: Rgb<u8> = Rgb([0, 0, 255]);

/// Colour and size used to draw one class of marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawingSpec {
    pub color: Rgb<u8>,
    pub thickness: u32,
    pub circle_radius: i32,
}

impl DrawingSpec {
    pub const fn new(color: Rgb<u8>, thickness: u32, circle_radius: i32) -> Self {
        Self {
            color,
            thickness,
            circle_radius,
        }
    }
}

/// Face-mesh landmarks: single-pixel-radius green dots.
pub const FACE_LANDMARK_SPEC: DrawingSpec = DrawingSpec::new(GREEN, 1, 1);

/// Pose landmarks.
pub const POSE_LANDMARK_SPEC: DrawingSpec = DrawingSpec::new(GREEN, 2, 2);

/// Pose skeleton edges.
pub const POSE_CONNECTION_SPEC: DrawingSpec = DrawingSpec::new(BLUE, 2, 2);

/// Draw a dot at every landmark of `mesh`.
pub fn draw_face_mesh(image: &mut RgbImage, mesh: &FaceMesh) {
    let (width, height) = image.dimensions();
    for landmark in &mesh.landmarks {
        let center = landmark.to_pixel(width, height);
        draw_filled_circle_mut(
            image,
            center,
            FACE_LANDMARK_SPEC.circle_radius,
            FACE_LANDMARK_SPEC.color,
        );
    }
}

/// Draw the skeleton edges, then the landmark points on top.
///
/// Landmarks below the visibility threshold or outside the frame are skipped,
/// as is every edge touching one of them.
pub fn draw_pose(
    image: &mut RgbImage,
    skeleton: &PoseSkeleton,
    landmark_spec: &DrawingSpec,
    connection_spec: &DrawingSpec,
) {
    let (width, height) = image.dimensions();
    let points = &skeleton.landmarks;

    for &(from, to) in POSE_CONNECTIONS.iter() {
        let (Some(a), Some(b)) = (points.get(from), points.get(to)) else {
            continue;
        };
        if !is_drawable(a) || !is_drawable(b) {
            continue;
        }
        draw_thick_line(
            image,
            a.to_pixel(width, height),
            b.to_pixel(width, height),
            connection_spec,
        );
    }

    for landmark in points.iter().filter(|l| is_drawable(l)) {
        draw_filled_circle_mut(
            image,
            landmark.to_pixel(width, height),
            landmark_spec.circle_radius,
            landmark_spec.color,
        );
    }
}

fn is_drawable(landmark: &NormalizedLandmark) -> bool {
    landmark.is_visible() && landmark.is_in_frame()
}

/// imageproc only draws one-pixel lines; stack parallel copies along the
/// segment normal to reach `spec.thickness`.
fn draw_thick_line(image: &mut RgbImage, start: (i32, i32), end: (i32, i32), spec: &DrawingSpec) {
    let (x0, y0) = (start.0 as f32, start.1 as f32);
    let (x1, y1) = (end.0 as f32, end.1 as f32);
    let (dx, dy) = (x1 - x0, y1 - y0);
    let len = (dx * dx + dy * dy).sqrt();

    if len == 0.0 || spec.thickness <= 1 {
        draw_line_segment_mut(image, (x0, y0), (x1, y1), spec.color);
        return;
    }

    let (nx, ny) = (-dy / len, dx / len);
    let half = (spec.thickness as f32 - 1.0) / 2.0;
    for i in 0..spec.thickness {
        let offset = i as f32 - half;
        draw_line_segment_mut(
            image,
            (x0 + nx * offset, y0 + ny * offset),
            (x1 + nx * offset, y1 + ny * offset),
            spec.color,
        );
    }
}
