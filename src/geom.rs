// Copyright 2025 Lars Brubaker
// License: MIT
//
// Planar geometric primitives: points, vectors, oriented lines and the
// orientation / in-circle predicates the subdivision is built on.
//
// A single tolerance (EPS) is shared by point equality, line classification
// and on-edge tests. Lines are normalized at construction, so `eval` returns a
// true signed distance and EPS means the same thing everywhere.

use std::ops::{Add, Mul, Neg, Sub};

pub type Real = f64;

/// Absolute tolerance for point coincidence and point-on-line tests.
pub const EPS: Real = 1e-6;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeomError {
    #[error("cannot normalize a zero-length vector")]
    ZeroLengthVector,
    #[error("cannot build a line through coincident points ({x}, {y})")]
    DegenerateLine { x: Real, y: Real },
}

/// A 2D location.
///
/// Equality is tolerance based: two points compare equal when they are closer
/// than [`EPS`]. This relation is not transitive.
#[derive(Copy, Clone, Debug, Default)]
pub struct Point {
    pub x: Real,
    pub y: Real,
}

/// A 2D displacement.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vector {
    pub x: Real,
    pub y: Real,
}

impl Point {
    #[inline]
    pub const fn new(x: Real, y: Real) -> Self {
        Point { x, y }
    }

    #[inline]
    pub fn distance(self, other: Point) -> Real {
        (self - other).norm()
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Point) -> bool {
        self.distance(*other) < EPS
    }
}

impl From<(Real, Real)> for Point {
    fn from((x, y): (Real, Real)) -> Self {
        Point::new(x, y)
    }
}

impl Vector {
    #[inline]
    pub const fn new(x: Real, y: Real) -> Self {
        Vector { x, y }
    }

    #[inline]
    pub fn dot(self, other: Vector) -> Real {
        self.x * other.x + self.y * other.y
    }

    #[inline]
    pub fn norm(self) -> Real {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction. Fails only when the norm is exactly
    /// zero; tiny vectors are still normalized.
    pub fn normalize(self) -> Result<Vector, GeomError> {
        let len = self.norm();
        if len == 0.0 {
            return Err(GeomError::ZeroLengthVector);
        }
        Ok(Vector::new(self.x / len, self.y / len))
    }
}

impl Sub for Point {
    type Output = Vector;
    fn sub(self, rhs: Point) -> Vector {
        Vector::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Add<Vector> for Point {
    type Output = Point;
    fn add(self, rhs: Vector) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub<Vector> for Point {
    type Output = Point;
    fn sub(self, rhs: Vector) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Add for Vector {
    type Output = Vector;
    fn add(self, rhs: Vector) -> Vector {
        Vector::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector {
    type Output = Vector;
    fn sub(self, rhs: Vector) -> Vector {
        Vector::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<Real> for Vector {
    type Output = Vector;
    fn mul(self, k: Real) -> Vector {
        Vector::new(self.x * k, self.y * k)
    }
}

impl Mul<Vector> for Real {
    type Output = Vector;
    fn mul(self, v: Vector) -> Vector {
        v * self
    }
}

impl Neg for Vector {
    type Output = Vector;
    fn neg(self) -> Vector {
        Vector::new(-self.x, -self.y)
    }
}

/// Position of a point relative to a [`DirectedLine`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
    On,
}

/// The line `a·x + b·y + c = 0` through two points, oriented from the first
/// toward the second. `(a, b)` is a unit normal pointing to the right.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DirectedLine {
    a: Real,
    b: Real,
    c: Real,
}

impl DirectedLine {
    pub fn new(p: Point, q: Point) -> Result<Self, GeomError> {
        let t = (q - p)
            .normalize()
            .map_err(|_| GeomError::DegenerateLine { x: p.x, y: p.y })?;
        let a = t.y;
        let b = -t.x;
        Ok(DirectedLine {
            a,
            b,
            c: -(a * p.x + b * p.y),
        })
    }

    /// Signed distance from the line: negative on the left, positive on the right.
    #[inline]
    pub fn eval(&self, p: Point) -> Real {
        self.a * p.x + self.b * p.y + self.c
    }

    pub fn classify(&self, p: Point) -> Side {
        let d = self.eval(p);
        if d < -EPS {
            Side::Left
        } else if d > EPS {
            Side::Right
        } else {
            Side::On
        }
    }
}

/// Twice the signed area of triangle (a, b, c); positive when counterclockwise.
#[inline]
pub fn tri_area(a: Point, b: Point, c: Point) -> Real {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Returns true if (a, b, c) are in strictly counterclockwise order.
#[inline]
pub fn ccw(a: Point, b: Point, c: Point) -> bool {
    tri_area(a, b, c) > 0.0
}

/// Lifted determinant of the in-circle test. Positive when `d` lies inside the
/// circumcircle of the counterclockwise triangle (a, b, c).
pub fn in_circle_det(a: Point, b: Point, c: Point, d: Point) -> Real {
    let ad = a - d;
    let bd = b - d;
    let cd = c - d;

    let ab_det = ad.x * bd.y - bd.x * ad.y;
    let bc_det = bd.x * cd.y - cd.x * bd.y;
    let ca_det = cd.x * ad.y - ad.x * cd.y;

    let a_lift = ad.dot(ad);
    let b_lift = bd.dot(bd);
    let c_lift = cd.dot(cd);

    a_lift * bc_det + b_lift * ca_det + c_lift * ab_det
}

/// Returns true if `d` is strictly inside the circumcircle of ccw (a, b, c).
#[inline]
pub fn in_circle(a: Point, b: Point, c: Point, d: Point) -> bool {
    in_circle_det(a, b, c, d) > 0.0
}

/// Scale of the in-circle determinant for the given points, used to turn the
/// raw determinant into a relative quantity.
pub fn in_circle_scale(a: Point, b: Point, c: Point, d: Point) -> Real {
    let m = (a - d)
        .dot(a - d)
        .max((b - d).dot(b - d))
        .max((c - d).dot(c - d));
    m * m
}

/// Returns true if `p` lies on the closed segment (a, b) within EPS.
///
/// A point near either endpoint counts as on the segment. Otherwise `p` must
/// project inside the segment's extent and classify as `On` its line.
pub fn on_segment(p: Point, a: Point, b: Point) -> bool {
    let t1 = p.distance(a);
    let t2 = p.distance(b);
    if t1 < EPS || t2 < EPS {
        return true;
    }
    let t3 = a.distance(b);
    if t1 > t3 || t2 > t3 {
        return false;
    }
    match DirectedLine::new(a, b) {
        Ok(line) => line.classify(p) == Side::On,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn point_equality_uses_tolerance() {
        assert_eq!(Point::new(1.0, 1.0), Point::new(1.0 + 1e-8, 1.0 - 1e-8));
        assert_ne!(Point::new(1.0, 1.0), Point::new(1.0 + 1e-4, 1.0));
    }

    #[test]
    fn vector_arithmetic() {
        let u = Vector::new(1.0, 2.0);
        let v = Vector::new(3.0, -1.0);
        assert_eq!(u + v, Vector::new(4.0, 1.0));
        assert_eq!(u - v, Vector::new(-2.0, 3.0));
        assert_eq!(u * 2.0, Vector::new(2.0, 4.0));
        assert_eq!(2.0 * u, Vector::new(2.0, 4.0));
        assert_relative_eq!(u.dot(v), 1.0);
        assert_eq!(Point::new(1.0, 1.0) + u, Point::new(2.0, 3.0));
    }

    #[test]
    fn normalize_unit_length() {
        let n = Vector::new(3.0, 4.0).normalize().unwrap();
        assert_relative_eq!(n.x, 0.6);
        assert_relative_eq!(n.y, 0.8);
        assert_relative_eq!(n.norm(), 1.0);
    }

    #[test]
    fn normalize_zero_vector_is_an_error() {
        assert_eq!(
            Vector::new(0.0, 0.0).normalize(),
            Err(GeomError::ZeroLengthVector)
        );
    }

    #[test]
    fn line_through_coincident_points_is_an_error() {
        let p = Point::new(2.0, 3.0);
        assert!(matches!(
            DirectedLine::new(p, p),
            Err(GeomError::DegenerateLine { .. })
        ));
    }

    #[test]
    fn classify_left_right_on() {
        let line = DirectedLine::new(Point::new(0.0, 0.0), Point::new(1.0, 0.0)).unwrap();
        assert_eq!(line.classify(Point::new(0.5, 1.0)), Side::Left);
        assert_eq!(line.classify(Point::new(0.5, -1.0)), Side::Right);
        assert_eq!(line.classify(Point::new(5.0, 0.0)), Side::On);
        assert_eq!(line.classify(Point::new(0.5, 1e-7)), Side::On);
        assert_relative_eq!(line.eval(Point::new(0.0, 2.0)), -2.0);
    }

    #[test]
    fn eval_is_a_signed_distance() {
        let line = DirectedLine::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0)).unwrap();
        let d = line.eval(Point::new(0.0, 1.0));
        assert_relative_eq!(d, -(0.5f64).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn ccw_orientation() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(1.0, 0.0);
        let c = Point::new(0.0, 1.0);
        assert!(ccw(a, b, c));
        assert!(!ccw(a, c, b));
        assert!(!ccw(a, b, Point::new(2.0, 0.0)));
        assert_relative_eq!(tri_area(a, b, c), 1.0);
    }

    #[test]
    fn in_circle_unit_circle() {
        let a = Point::new(1.0, 0.0);
        let b = Point::new(0.0, 1.0);
        let c = Point::new(-1.0, 0.0);
        assert!(in_circle(a, b, c, Point::new(0.0, 0.0)));
        assert!(in_circle(a, b, c, Point::new(0.5, -0.5)));
        assert!(!in_circle(a, b, c, Point::new(2.0, 0.0)));
        // cocircular
        assert!(in_circle_det(a, b, c, Point::new(0.0, -1.0)).abs() < 1e-12);
    }

    #[test]
    fn on_segment_cases() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(2.0, 0.0);
        assert!(on_segment(Point::new(1.0, 0.0), a, b));
        assert!(on_segment(Point::new(1.0, 5e-7), a, b));
        assert!(on_segment(a, a, b));
        assert!(!on_segment(Point::new(3.0, 0.0), a, b));
        assert!(!on_segment(Point::new(1.0, 0.1), a, b));
    }
}
