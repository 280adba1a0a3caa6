//! Infinite lines

use crate::error::{GraphError, Result};
use crate::foundation::math::{Vec3, Vec3Ext, EPS};
use crate::geometry::Plane;

/// Infinite line through `origin` along `direction`
///
/// The direction is stored exactly as given (not normalized) and is never
/// zero. Consumers that need a unit direction normalize it themselves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    origin: Vec3,
    direction: Vec3,
}

impl Line {
    /// Creates the line through `point1` and `point2`
    ///
    /// # Errors
    /// [`GraphError::InvalidArgument`] when the points coincide or are not
    /// finite.
    pub fn new(point1: Vec3, point2: Vec3) -> Result<Self> {
        if !(point1.all_finite() && point2.all_finite()) {
            return Err(GraphError::invalid("Line: points for initialization are not finite"));
        }
        Self::from_direction(point1, point2 - point1)
            .map_err(|_| GraphError::invalid("Line: points for initialization are the same"))
    }

    /// Creates the line through `origin` along `direction`
    ///
    /// # Errors
    /// [`GraphError::InvalidArgument`] when `direction` has zero length or a
    /// coordinate is not finite.
    pub fn from_direction(origin: Vec3, direction: Vec3) -> Result<Self> {
        if !(origin.all_finite() && direction.all_finite()) {
            return Err(GraphError::invalid("Line: origin or direction is not finite"));
        }
        if direction.norm() < EPS {
            return Err(GraphError::invalid("Line: direction vector has zero length"));
        }
        Ok(Self { origin, direction })
    }

    /// Builds a line whose direction is known to be non-zero.
    pub(crate) fn through(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Start point of the line
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Direction as given at construction
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Point at parameter `t` (`origin + t * direction`)
    pub fn point_at(&self, t: f64) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Orthogonal projection of `point` onto the line
    pub fn project_point(&self, point: &Vec3) -> Vec3 {
        let t = self.direction.dot(&(point - self.origin)) / self.direction.norm_squared();
        self.point_at(t)
    }

    /// Distance from `point` to the line
    pub fn distance_to(&self, point: &Vec3) -> f64 {
        (point - self.project_point(point)).norm()
    }

    /// True when `point` lies on the line within [`EPS`]
    pub fn on_line(&self, point: &Vec3) -> bool {
        self.distance_to(point) < EPS
    }

    /// True when the lines are not parallel
    ///
    /// Only the directions are compared: two skew lines report `true` even
    /// though they never meet.
    pub fn is_intersect(&self, other: &Line) -> bool {
        self.direction
            .normalize()
            .cross(&other.direction.normalize())
            .norm()
            >= EPS
    }

    /// True when the line is not parallel to `plane`
    pub fn is_intersect_plane(&self, plane: &Plane) -> bool {
        plane.is_intersect(self)
    }

    /// Point of `self` closest to `other`
    ///
    /// For intersecting lines this is the intersection point. When the lines
    /// are parallel there is no unique answer and `other`'s origin is
    /// returned instead; call [`Line::is_intersect`] first when that matters.
    pub fn intersect(&self, other: &Line) -> Vec3 {
        let offset = self.origin - other.origin;
        let a = self.direction.norm_squared();
        let b = self.direction.dot(&other.direction);
        let c = other.direction.norm_squared();
        let d = self.direction.dot(&offset);
        let e = other.direction.dot(&offset);

        let denominator = a * c - b * b;
        if denominator.abs() < EPS * EPS * a * c {
            log::trace!("Line::intersect on parallel lines, returning other origin");
            return other.origin;
        }

        self.point_at((b * e - c * d) / denominator)
    }

    /// Intersection with `plane`, or `origin` when the line is parallel to it
    pub fn intersect_plane(&self, plane: &Plane) -> Vec3 {
        plane.intersect(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_coincident_points_rejected() {
        let point = Vec3::new(1.0, 1.0, 1.0);
        assert!(matches!(Line::new(point, point), Err(GraphError::InvalidArgument(_))));
        assert!(matches!(
            Line::from_direction(point, Vec3::zeros()),
            Err(GraphError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_non_finite_input_rejected() {
        let point = Vec3::new(1.0, 1.0, 1.0);
        let nan = Vec3::new(f64::NAN, 0.0, 0.0);
        let infinite = Vec3::new(0.0, f64::INFINITY, 0.0);
        assert!(matches!(Line::new(point, nan), Err(GraphError::InvalidArgument(_))));
        assert!(Line::new(infinite, point).is_err());
        assert!(Line::from_direction(point, nan).is_err());
        assert!(Line::from_direction(infinite, Vec3::x()).is_err());
    }

    #[test]
    fn test_direction_is_stored_as_given() {
        let line = Line::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(4.0, 0.0, 0.0)).unwrap();
        assert_eq!(line.origin(), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(line.direction(), Vec3::new(3.0, 0.0, 0.0));
        assert_eq!(line.point_at(1.0), Vec3::new(4.0, 0.0, 0.0));
    }

    #[test]
    fn test_projection_lands_on_line() {
        let line = Line::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(-2.0, 5.0, 0.5)).unwrap();
        for point in [
            Vec3::new(10.0, -4.0, 7.0),
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(-3.0, 8.0, -1.0),
        ] {
            let projected = line.project_point(&point);
            assert!(line.on_line(&projected));
            // The residual is orthogonal to the line.
            assert_relative_eq!((point - projected).dot(&line.direction()), 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_projection_of_axis_aligned_line() {
        let line = Line::new(Vec3::zeros(), Vec3::new(2.0, 0.0, 0.0)).unwrap();
        assert_relative_eq!(line.project_point(&Vec3::new(5.0, 3.0, -1.0)), Vec3::new(5.0, 0.0, 0.0));
        assert!(line.on_line(&Vec3::new(-7.0, 0.0, 0.0)));
        assert!(!line.on_line(&Vec3::new(0.0, 1e-3, 0.0)));
        assert_relative_eq!(line.distance_to(&Vec3::new(1.0, 3.0, 4.0)), 5.0);
    }

    #[test]
    fn test_line_line_intersection() {
        let first = Line::new(Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)).unwrap();
        let second = Line::new(Vec3::new(2.0, -3.0, 0.0), Vec3::new(2.0, 5.0, 0.0)).unwrap();
        assert!(first.is_intersect(&second));
        assert_relative_eq!(first.intersect(&second), Vec3::new(2.0, 0.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(second.intersect(&first), Vec3::new(2.0, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_parallel_lines_return_other_origin() {
        let first = Line::new(Vec3::zeros(), Vec3::new(1.0, 1.0, 0.0)).unwrap();
        let second = Line::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(3.0, 4.0, 0.0)).unwrap();
        assert!(!first.is_intersect(&second));
        assert_eq!(first.intersect(&second), second.origin());
    }

    #[test]
    fn test_line_plane_delegates_to_plane() {
        let plane = Plane::new(Vec3::zeros(), Vec3::x(), Vec3::y()).unwrap();
        let line = Line::new(Vec3::new(1.0, 1.0, 5.0), Vec3::new(1.0, 1.0, -5.0)).unwrap();
        assert!(line.is_intersect_plane(&plane));
        assert_relative_eq!(line.intersect_plane(&plane), Vec3::new(1.0, 1.0, 0.0));

        let parallel = Line::new(Vec3::new(0.0, 0.0, 2.0), Vec3::new(1.0, 0.0, 2.0)).unwrap();
        assert!(!parallel.is_intersect_plane(&plane));
        assert_eq!(parallel.intersect_plane(&plane), parallel.origin());
    }
}
