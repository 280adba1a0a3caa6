//! Oriented planes

use crate::error::{GraphError, Result};
use crate::foundation::math::{equality, sign, Vec3, Vec3Ext, EPS};
use crate::geometry::{Cut, Line};

/// Oriented plane `{p : normal · p = distance}`
///
/// The normal is always unit length. `distance` is the signed offset of the
/// plane from the origin along the normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    normal: Vec3,
    /// Signed offset from the origin along the normal
    pub distance: f64,
}

impl Default for Plane {
    /// The XZ plane, facing `+Y`
    fn default() -> Self {
        Self {
            normal: Vec3::y(),
            distance: 0.0,
        }
    }
}

impl Plane {
    /// Plane through three points, normal `(p1 - p2) × (p1 - p3)` normalized
    ///
    /// # Errors
    /// [`GraphError::InvalidArgument`] when the points are collinear or not
    /// finite.
    pub fn new(point1: Vec3, point2: Vec3, point3: Vec3) -> Result<Self> {
        if ![point1, point2, point3].iter().all(Vec3Ext::all_finite) {
            return Err(GraphError::invalid("Plane: points to initialize are not finite"));
        }
        let normal = (point1 - point2)
            .cross(&(point1 - point3))
            .try_normalize(EPS)
            .ok_or_else(|| GraphError::invalid("Plane: points to initialize are collinear"))?;

        Ok(Self {
            normal,
            distance: normal.dot(&point1),
        })
    }

    /// Plane through the first three of `points`
    ///
    /// # Errors
    /// [`GraphError::InvalidArgument`] when fewer than three points are given
    /// or the first three are collinear.
    pub fn from_points(points: &[Vec3]) -> Result<Self> {
        match points {
            [point1, point2, point3, ..] => Self::new(*point1, *point2, *point3),
            _ => Err(GraphError::invalid(format!(
                "Plane: the number of points is less than three ({})",
                points.len()
            ))),
        }
    }

    /// Plane with the given normal passing through `point`
    ///
    /// # Errors
    /// [`GraphError::InvalidArgument`] when `normal` has zero length or a
    /// coordinate is not finite.
    pub fn from_normal(normal: Vec3, point: Vec3) -> Result<Self> {
        if !point.all_finite() {
            return Err(GraphError::invalid("Plane: the point is not finite"));
        }
        let mut plane = Self::default();
        plane.set_normal(normal)?;
        plane.distance = plane.normal.dot(&point);
        Ok(plane)
    }

    /// Replaces the normal with `normal` normalized, keeping `distance`
    ///
    /// # Errors
    /// [`GraphError::InvalidArgument`] when `normal` has zero length or is not
    /// finite.
    pub fn set_normal(&mut self, normal: Vec3) -> Result<&mut Self> {
        if !normal.all_finite() {
            return Err(GraphError::invalid("set_normal: the normal vector is not finite"));
        }
        self.normal = normal
            .try_normalize(EPS)
            .ok_or_else(|| GraphError::invalid("set_normal: the normal vector has zero length"))?;
        Ok(self)
    }

    /// Unit normal
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Signed distance from the plane to `point`, positive on the normal side
    pub fn signed_distance(&self, point: &Vec3) -> f64 {
        self.normal.dot(point) - self.distance
    }

    /// Orthogonal projection of `point` onto the plane
    pub fn project_point(&self, point: &Vec3) -> Vec3 {
        point - self.normal * self.signed_distance(point)
    }

    /// True when `point` lies on the plane within [`EPS`]
    pub fn on_plane(&self, point: &Vec3) -> bool {
        equality(self.normal.dot(point), self.distance)
    }

    /// True when `line` is not parallel to the plane
    pub fn is_intersect(&self, line: &Line) -> bool {
        !equality(line.direction().dot(&self.normal), 0.0)
    }

    /// True when the segment touches or crosses the plane
    pub fn is_intersect_cut(&self, cut: &Cut) -> bool {
        if !self.is_intersect(&cut.line()) {
            return false;
        }

        let side1 = sign(self.signed_distance(&cut.point1()));
        let side2 = sign(self.signed_distance(&cut.point2()));
        side1 == 0 || side2 == 0 || side1 != side2
    }

    /// True when the planes are not parallel
    pub fn is_intersect_plane(&self, other: &Plane) -> bool {
        !equality(self.normal.cross(&other.normal).norm(), 0.0)
    }

    /// Intersection point with `line`
    ///
    /// When the line is parallel to the plane there is no unique solution and
    /// the line's origin is returned unchanged.
    pub fn intersect(&self, line: &Line) -> Vec3 {
        let product = line.direction().dot(&self.normal);
        if equality(product, 0.0) {
            log::trace!("Plane::intersect with a parallel line, returning line origin");
            return line.origin();
        }

        line.point_at((self.distance - self.normal.dot(&line.origin())) / product)
    }

    /// Intersection with the segment's line, clamped onto the segment
    pub fn intersect_cut(&self, cut: &Cut) -> Vec3 {
        cut.project_point(&self.intersect(&cut.line()))
    }

    /// Line along which the two planes meet
    ///
    /// Parallel planes have no unique intersection line: a placeholder line
    /// through `normal * distance` along this plane's normal is returned.
    pub fn intersect_plane(&self, other: &Plane) -> Line {
        let anchor = self.normal * self.distance;
        let Some(direction) = self.normal.cross(&other.normal).try_normalize(EPS) else {
            log::trace!("Plane::intersect_plane on parallel planes, returning placeholder line");
            return Line::through(anchor, self.normal);
        };

        // In-plane line orthogonal to the intersection direction.
        let across = Line::through(anchor, direction.cross(&self.normal));
        Line::through(other.intersect(&across), direction)
    }

    /// Mirror image of `point` across the plane
    pub fn symmetry(&self, point: &Vec3) -> Vec3 {
        point.symmetry(&self.project_point(point))
    }
}
