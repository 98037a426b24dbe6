use glam::Vec2;
use thiserror::Error;

use crate::world::Segment;

/// Casting failures. All of them are scene-configuration bugs, not
/// recoverable runtime states: geometry is deterministic, so nothing
/// here is worth retrying.
#[derive(Debug, Error, PartialEq)]
pub enum CastError {
    /// The wall set is required to contain an enclosing boundary, so a
    /// ray that escapes without hitting anything means the scene was
    /// built wrong (missing or non-enclosing boundary box).
    #[error("ray from {origin:?} at {angle} rad found no intersection; scene must include an enclosing boundary")]
    Unbounded { origin: Vec2, angle: f32 },
}

/// Half-line: origin plus direction angle, forward-infinite.
///
/// A ray is a pure description; resolving it never mutates it, the
/// result comes back as a fresh point.
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec2,
    pub angle: f32,
}

impl Ray {
    pub fn new(origin: Vec2, angle: f32) -> Self {
        Self { origin, angle }
    }

    /// Direction unit vector.
    #[inline]
    pub fn dir(&self) -> Vec2 {
        Vec2::from_angle(self.angle)
    }

    /// Intersection with one wall.
    ///
    /// Same parametric formula as [`Segment::intersect`], with ray
    /// ranges: the wall parameter is strict (`0 < t < 1`, grazing a
    /// wall endpoint does not count) and the ray parameter only has to
    /// be positive (`u > 0`, forward and unbounded).
    pub fn intersect(&self, wall: &Segment) -> Option<Vec2> {
        let d = self.dir();
        let (p1, p2) = (wall.p1, wall.p2);

        let den = (p1.x - p2.x) * (-d.y) - (p1.y - p2.y) * (-d.x);
        if den == 0.0 {
            return None;
        }

        let t = ((p1.x - self.origin.x) * (-d.y) - (p1.y - self.origin.y) * (-d.x)) / den;
        let u = -((p1.x - p2.x) * (p1.y - self.origin.y)
            - (p1.y - p2.y) * (p1.x - self.origin.x))
            / den;

        if t > 0.0 && t < 1.0 && u > 0.0 {
            Some(p1 + t * (p2 - p1))
        } else {
            None
        }
    }

    /// Nearest hit against the whole wall set.
    ///
    /// Distances are compared squared (only the ordering matters). On
    /// an exact tie the earliest wall in `walls` wins, which keeps the
    /// choice deterministic for duplicated geometry.
    pub fn resolve(&self, walls: &[Segment]) -> Result<Vec2, CastError> {
        let mut closest: Option<(f32, Vec2)> = None;
        for wall in walls {
            if let Some(point) = self.intersect(wall) {
                let d2 = self.origin.distance_squared(point);
                if closest.is_none_or(|(best, _)| d2 < best) {
                    closest = Some((d2, point));
                }
            }
        }
        match closest {
            Some((_, point)) => Ok(point),
            None => Err(CastError::Unbounded {
                origin: self.origin,
                angle: self.angle,
            }),
        }
    }
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec2;

    #[test]
    fn hits_a_wall_straight_ahead() {
        let ray = Ray::new(Vec2::ZERO, 0.0);
        let wall = Segment::new(vec2(10.0, -1.0), vec2(10.0, 1.0));
        let p = ray.intersect(&wall).unwrap();
        assert!((p - vec2(10.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn ignores_walls_behind_the_origin() {
        let ray = Ray::new(Vec2::ZERO, 0.0);
        let wall = Segment::new(vec2(-5.0, -1.0), vec2(-5.0, 1.0));
        assert_eq!(ray.intersect(&wall), None);
    }

    #[test]
    fn grazing_a_wall_endpoint_does_not_count() {
        // The ray passes exactly through the wall's lower endpoint
        // (t = 0, excluded), so it sails on to the far wall.
        let ray = Ray::new(Vec2::ZERO, 0.0);
        let near = Segment::new(vec2(5.0, 0.0), vec2(5.0, 5.0));
        let far = Segment::new(vec2(10.0, -1.0), vec2(10.0, 1.0));
        assert_eq!(ray.intersect(&near), None);
        let p = ray.resolve(&[near, far]).unwrap();
        assert!((p - vec2(10.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn resolve_picks_the_nearest_of_many() {
        let ray = Ray::new(Vec2::ZERO, 0.0);
        let walls = [
            Segment::new(vec2(9.0, -1.0), vec2(9.0, 1.0)),
            Segment::new(vec2(3.0, -1.0), vec2(3.0, 1.0)),
            Segment::new(vec2(6.0, -1.0), vec2(6.0, 1.0)),
        ];
        let p = ray.resolve(&walls).unwrap();
        assert!((p - vec2(3.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn resolve_is_deterministic_on_ties() {
        let ray = Ray::new(Vec2::ZERO, 0.0);
        let wall = Segment::new(vec2(4.0, -2.0), vec2(4.0, 2.0));
        // Identical duplicated wall: first one wins, result well-defined.
        let p = ray.resolve(&[wall, wall]).unwrap();
        assert!((p - vec2(4.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn escaping_ray_is_a_configuration_error() {
        let ray = Ray::new(Vec2::ZERO, 0.0);
        let err = ray.resolve(&[]).unwrap_err();
        assert!(matches!(err, CastError::Unbounded { .. }));
    }
}
