//! Geometry kernel
//!
//! Lines, segments and planes with the intersection, projection and
//! reflection queries used by scene picking and shadow placement. All
//! predicates compare against the absolute tolerance
//! [`EPS`](crate::foundation::math::EPS).

pub mod cut;
pub mod line;
pub mod plane;

pub use cut::Cut;
pub use line::Line;
pub use plane::Plane;
