//! Hit detection between the slice path and round targets
//!
//! Every sliceable entity is treated as a circle. A pointer path is a
//! polyline, so a hit is any polyline segment touching the circle.

use glam::Vec2;

/// Check whether the segment `start..end` touches the circle at `center`
///
/// A zero-length segment degenerates to a point-in-circle test against
/// `start`. Otherwise the center is projected onto the segment line, the
/// projection is clamped onto the segment, and the squared distance to that
/// closest point is compared with `radius²`.
pub fn segment_intersects_circle(start: Vec2, end: Vec2, center: Vec2, radius: f32) -> bool {
    let radius_sq = radius * radius;
    let seg = end - start;
    let seg_len_sq = seg.length_squared();

    if seg_len_sq == 0.0 {
        return start.distance_squared(center) < radius_sq;
    }

    let t = ((center - start).dot(seg) / seg_len_sq).clamp(0.0, 1.0);
    let closest = start + seg * t;
    closest.distance_squared(center) < radius_sq
}

/// Check every consecutive pair of `path` against the circle, stopping at the
/// first hit
pub fn path_intersects_circle(path: &[Vec2], center: Vec2, radius: f32) -> bool {
    path.windows(2)
        .any(|pair| segment_intersects_circle(pair[0], pair[1], center, radius))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_segment_through_center() {
        let c = Vec2::new(100.0, 100.0);
        assert!(segment_intersects_circle(
            Vec2::new(0.0, 100.0),
            Vec2::new(200.0, 100.0),
            c,
            0.5
        ));
    }

    #[test]
    fn test_segment_passes_beside() {
        let c = Vec2::new(100.0, 100.0);
        // Closest approach is 50 units
        assert!(!segment_intersects_circle(
            Vec2::new(0.0, 150.0),
            Vec2::new(200.0, 150.0),
            c,
            40.0
        ));
        assert!(segment_intersects_circle(
            Vec2::new(0.0, 150.0),
            Vec2::new(200.0, 150.0),
            c,
            51.0
        ));
    }

    #[test]
    fn test_projection_clamped_to_segment() {
        // The infinite line crosses the circle but the segment stops short
        let c = Vec2::new(100.0, 0.0);
        assert!(!segment_intersects_circle(
            Vec2::new(-100.0, 0.0),
            Vec2::new(0.0, 0.0),
            c,
            40.0
        ));
        // Endpoint inside the circle counts
        assert!(segment_intersects_circle(
            Vec2::new(-100.0, 0.0),
            Vec2::new(70.0, 0.0),
            c,
            40.0
        ));
    }

    #[test]
    fn test_degenerate_segment() {
        let c = Vec2::ZERO;
        let p = Vec2::new(3.0, 4.0);
        assert!(segment_intersects_circle(p, p, c, 5.1));
        assert!(!segment_intersects_circle(p, p, c, 5.0));
    }

    #[test]
    fn test_path_needs_two_points() {
        let c = Vec2::ZERO;
        assert!(!path_intersects_circle(&[], c, 10.0));
        assert!(!path_intersects_circle(&[Vec2::ZERO], c, 10.0));
        assert!(path_intersects_circle(
            &[Vec2::new(-50.0, 0.0), Vec2::new(50.0, 0.0)],
            c,
            10.0
        ));
    }

    proptest! {
        #[test]
        fn prop_degenerate_matches_distance(
            px in -500.0f32..500.0,
            py in -500.0f32..500.0,
            r in 1.0f32..200.0,
        ) {
            let p = Vec2::new(px, py);
            let hit = segment_intersects_circle(p, p, Vec2::ZERO, r);
            prop_assert_eq!(hit, p.length_squared() < r * r);
        }

        #[test]
        fn prop_segment_through_center_hits(
            ax in -500.0f32..500.0,
            ay in -500.0f32..500.0,
            r in 1.0f32..100.0,
        ) {
            // Mirror the start through the center so the segment contains it
            let c = Vec2::new(10.0, -20.0);
            let a = Vec2::new(ax, ay);
            let b = c * 2.0 - a;
            prop_assert!(segment_intersects_circle(a, b, c, r));
        }
    }
}
