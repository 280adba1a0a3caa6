//! Bounded line segments

use crate::error::{GraphError, Result};
use crate::foundation::math::{Vec3, Vec3Ext};
use crate::geometry::Line;

/// Line segment between two distinct endpoints
///
/// Immutable: build a new `Cut` for any change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cut {
    point1: Vec3,
    point2: Vec3,
    line: Line,
}

impl Cut {
    /// Creates the segment from `point1` to `point2`
    ///
    /// # Errors
    /// [`GraphError::InvalidArgument`] when the endpoints coincide or are not
    /// finite.
    pub fn new(point1: Vec3, point2: Vec3) -> Result<Self> {
        if !(point1.all_finite() && point2.all_finite()) {
            return Err(GraphError::invalid("Cut: endpoints are not finite"));
        }
        let line = Line::new(point1, point2)
            .map_err(|_| GraphError::invalid("Cut: points for initialization are the same"))?;
        Ok(Self { point1, point2, line })
    }

    /// First endpoint
    pub fn point1(&self) -> Vec3 {
        self.point1
    }

    /// Second endpoint
    pub fn point2(&self) -> Vec3 {
        self.point2
    }

    /// Underlying infinite line, starting at `point1`
    pub fn line(&self) -> Line {
        self.line
    }

    /// Segment length
    pub fn length(&self) -> f64 {
        (self.point2 - self.point1).norm()
    }

    /// Segment midpoint
    pub fn midpoint(&self) -> Vec3 {
        (self.point1 + self.point2) * 0.5
    }

    /// Closest point of the segment to `point`
    ///
    /// Projections falling outside the segment snap to the nearer endpoint.
    pub fn project_point(&self, point: &Vec3) -> Vec3 {
        if (self.point2 - self.point1).dot(&(point - self.point1)) < 0.0 {
            return self.point1;
        }
        if (self.point1 - self.point2).dot(&(point - self.point2)) < 0.0 {
            return self.point2;
        }
        self.line.project_point(point)
    }

    /// True when `point` lies strictly inside the segment
    ///
    /// The endpoints themselves are not part of the interior.
    pub fn on_cut(&self, point: &Vec3) -> bool {
        self.line.on_line(point) && (self.point1 - point).dot(&(self.point2 - point)) < 0.0
    }

    /// True when the infinite `line` crosses the segment
    pub fn is_intersect(&self, line: &Line) -> bool {
        line.direction()
            .in_two_side_angle(&(self.point1 - line.origin()), &(self.point2 - line.origin()))
    }

    /// True when the two segments cross each other
    ///
    /// Seen from each endpoint of `self`, the direction towards the other
    /// endpoint must fall inside the wedge spanned by `other`'s endpoints.
    pub fn is_intersect_cut(&self, other: &Cut) -> bool {
        (self.point1 - self.point2)
            .in_angle(&(other.point1 - self.point2), &(other.point2 - self.point2))
            && (self.point2 - self.point1)
                .in_angle(&(other.point1 - self.point1), &(other.point2 - self.point1))
    }

    /// Intersection of the underlying line with `line`
    ///
    /// The result may lie outside the segment when they do not cross; call
    /// [`Cut::is_intersect`] first.
    pub fn intersect(&self, line: &Line) -> Vec3 {
        self.line.intersect(line)
    }

    /// Intersection with `other`, clamped onto `other`
    ///
    /// When the segments do not cross this is some point of `other`; call
    /// [`Cut::is_intersect_cut`] first.
    pub fn intersect_cut(&self, other: &Cut) -> Vec3 {
        other.project_point(&self.line.intersect(&other.line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn cut(a: (f64, f64, f64), b: (f64, f64, f64)) -> Cut {
        Cut::new(Vec3::new(a.0, a.1, a.2), Vec3::new(b.0, b.1, b.2)).unwrap()
    }

    #[test]
    fn test_coincident_endpoints_rejected() {
        let point = Vec3::new(2.0, 2.0, 2.0);
        assert!(matches!(Cut::new(point, point), Err(GraphError::InvalidArgument(_))));
        assert!(Cut::new(point, Vec3::new(f64::NAN, 0.0, 0.0)).is_err());
        assert!(Cut::new(Vec3::new(f64::INFINITY, 0.0, 0.0), point).is_err());
    }

    #[test]
    fn test_line_built_from_constructor_arguments() {
        let segment = cut((1.0, 0.0, 0.0), (3.0, 0.0, 0.0));
        assert_eq!(segment.line().origin(), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(segment.line().direction(), Vec3::new(2.0, 0.0, 0.0));
        assert_relative_eq!(segment.length(), 2.0);
        assert_eq!(segment.midpoint(), Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_project_point_clamps_to_endpoints() {
        let segment = cut((0.0, 0.0, 0.0), (4.0, 0.0, 0.0));
        assert_eq!(segment.project_point(&Vec3::new(-3.0, 1.0, 0.0)), segment.point1());
        assert_eq!(segment.project_point(&Vec3::new(9.0, -2.0, 5.0)), segment.point2());
        assert_relative_eq!(segment.project_point(&Vec3::new(1.5, 7.0, 0.0)), Vec3::new(1.5, 0.0, 0.0));
    }

    #[test]
    fn test_on_cut_excludes_endpoints() {
        let segment = cut((1.0, 1.0, 1.0), (3.0, 5.0, -1.0));
        assert!(!segment.on_cut(&segment.point1()));
        assert!(!segment.on_cut(&segment.point2()));
        assert!(segment.on_cut(&segment.midpoint()));
        // On the line but beyond the segment.
        assert!(!segment.on_cut(&segment.line().point_at(1.5)));
        // Off the line entirely.
        assert!(!segment.on_cut(&(segment.midpoint() + Vec3::new(0.0, 0.0, 0.1))));
    }

    #[test]
    fn test_segment_line_crossing() {
        let segment = cut((0.0, 0.0, 0.0), (2.0, 0.0, 0.0));
        let crossing = Line::new(Vec3::new(1.0, -1.0, 0.0), Vec3::new(1.0, 1.0, 0.0)).unwrap();
        assert!(segment.is_intersect(&crossing));
        assert_relative_eq!(segment.intersect(&crossing), Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-12);

        // Direction pointing away still counts: the line is infinite.
        let reversed = Line::new(Vec3::new(1.0, -1.0, 0.0), Vec3::new(1.0, -2.0, 0.0)).unwrap();
        assert!(segment.is_intersect(&reversed));

        let missing = Line::new(Vec3::new(3.0, -1.0, 0.0), Vec3::new(3.0, 1.0, 0.0)).unwrap();
        assert!(!segment.is_intersect(&missing));

        // Not coplanar with the segment.
        let skew = Line::new(Vec3::new(1.0, -1.0, 1.0), Vec3::new(1.0, 1.0, 1.0)).unwrap();
        assert!(!segment.is_intersect(&skew));
    }

    #[test]
    fn test_segment_segment_crossing() {
        let first = cut((0.0, 0.0, 0.0), (2.0, 2.0, 0.0));
        let second = cut((0.0, 2.0, 0.0), (2.0, 0.0, 0.0));
        assert!(first.is_intersect_cut(&second));
        assert!(second.is_intersect_cut(&first));
        assert_relative_eq!(first.intersect_cut(&second), Vec3::new(1.0, 1.0, 0.0), epsilon = 1e-12);

        // The supporting lines cross, the segments do not.
        let short = cut((0.0, 2.0, 0.0), (0.5, 1.5, 0.0));
        assert!(!first.is_intersect_cut(&short));
        assert!(!short.is_intersect_cut(&first));
    }

    #[test]
    fn test_touching_segments_intersect() {
        let first = cut((0.0, 0.0, 0.0), (2.0, 0.0, 0.0));
        let touching = cut((1.0, 0.0, 0.0), (1.0, 3.0, 0.0));
        assert!(first.is_intersect_cut(&touching));
        assert_relative_eq!(first.intersect_cut(&touching), Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_non_crossing_intersection_is_on_other() {
        let first = cut((0.0, 0.0, 0.0), (1.0, 0.0, 0.0));
        let far = cut((5.0, 1.0, 0.0), (5.0, 4.0, 0.0));
        assert!(!first.is_intersect_cut(&far));
        // Best-effort result clamped onto the other segment.
        assert_eq!(first.intersect_cut(&far), far.point1());
    }
}
