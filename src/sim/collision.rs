//! Circle overlap tests
//!
//! Pac-men are plain circles, so every contact question reduces to a
//! squared-distance comparison. All tests are strict: touching is not
//! overlapping.

use glam::DVec2;

use super::state::CollisionProbe;

/// True if the point lies strictly inside the circle
#[inline]
pub fn point_in_circle(point: DVec2, center: DVec2, radius: f64) -> bool {
    point.distance_squared(center) < radius * radius
}

/// True if two circles overlap (center distance < sum of radii)
#[inline]
pub fn circles_overlap(a: DVec2, a_radius: f64, b: DVec2, b_radius: f64) -> bool {
    let reach = a_radius + b_radius;
    a.distance_squared(b) < reach * reach
}

/// Pac-man vs pac-man contact for the collision scan
///
/// Stopped pac-men never collide. Coincident centers are ignored so a
/// pac-man can never be reported against itself.
pub fn probes_collide(a: &CollisionProbe, b: &CollisionProbe) -> bool {
    if a.stopped || b.stopped {
        return false;
    }
    let dist_sq = a.position.distance_squared(b.position);
    dist_sq > 0.0 && circles_overlap(a.position, a.radius, b.position, b.radius)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probe(x: f64, y: f64, radius: f64) -> CollisionProbe {
        CollisionProbe {
            position: DVec2::new(x, y),
            radius,
            stopped: false,
        }
    }

    #[test]
    fn test_point_in_circle_strict() {
        let c = DVec2::new(10.0, 10.0);
        assert!(point_in_circle(DVec2::new(12.0, 10.0), c, 5.0));
        // On the edge is outside
        assert!(!point_in_circle(DVec2::new(15.0, 10.0), c, 5.0));
    }

    #[test]
    fn test_circles_overlap() {
        let a = DVec2::new(0.0, 0.0);
        assert!(circles_overlap(a, 10.0, DVec2::new(19.9, 0.0), 10.0));
        assert!(!circles_overlap(a, 10.0, DVec2::new(20.0, 0.0), 10.0));
    }

    #[test]
    fn test_probes_skip_stopped_and_coincident() {
        let a = probe(100.0, 100.0, 10.0);
        let mut b = probe(105.0, 100.0, 10.0);
        assert!(probes_collide(&a, &b));
        b.stopped = true;
        assert!(!probes_collide(&a, &b));
        assert!(!probes_collide(&a, &a));
    }

    #[test]
    fn test_probes_symmetric() {
        let a = probe(50.0, 50.0, 10.0);
        let b = probe(62.0, 58.0, 6.0);
        assert_eq!(probes_collide(&a, &b), probes_collide(&b, &a));
    }
}
