// Copyright 2025 Lars Brubaker
// Shared test utilities for quadedge-rust tests.

#![allow(dead_code)]

use quadedge_rust::{Point, Subdivision};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Bounding triangle comfortably enclosing the unit square.
pub fn unit_square_bounds() -> Subdivision {
    Subdivision::try_new(
        Point::new(-3.0, -3.0),
        Point::new(6.0, -3.0),
        Point::new(0.5, 6.0),
    )
    .expect("bounding triangle is counterclockwise")
}

/// Deterministic cloud of `n` points in the unit square.
pub fn random_points(n: usize, seed: u64) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| Point::new(rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0)))
        .collect()
}

/// Regular `n` x `n` grid covering the unit square.
pub fn grid_points(n: usize) -> Vec<Point> {
    let step = 1.0 / (n - 1) as f64;
    let mut out = Vec::with_capacity(n * n);
    for i in 0..n {
        for j in 0..n {
            out.push(Point::new(i as f64 * step, j as f64 * step));
        }
    }
    out
}

/// Twice the signed area of a triangle.
pub fn triangle_area(a: Point, b: Point, c: Point) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Independent circumcircle check: is `p` strictly inside the circle through
/// a, b, c (beyond a relative tolerance)?
pub fn strictly_in_circumcircle(a: Point, b: Point, c: Point, p: Point) -> bool {
    let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
    let a2 = a.x * a.x + a.y * a.y;
    let b2 = b.x * b.x + b.y * b.y;
    let c2 = c.x * c.x + c.y * c.y;
    let ux = (a2 * (b.y - c.y) + b2 * (c.y - a.y) + c2 * (a.y - b.y)) / d;
    let uy = (a2 * (c.x - b.x) + b2 * (a.x - c.x) + c2 * (b.x - a.x)) / d;
    let r2 = (a.x - ux).powi(2) + (a.y - uy).powi(2);
    let dist2 = (p.x - ux).powi(2) + (p.y - uy).powi(2);
    dist2 < r2 * (1.0 - 1e-9)
}

/// Every bounded triangle is counterclockwise with area above `min_area`.
pub fn verify_no_degenerate_triangles(sub: &Subdivision, min_area: f64) {
    for (i, [a, b, c]) in sub.triangles().into_iter().enumerate() {
        let (pa, pb, pc) = (sub.vertex(a), sub.vertex(b), sub.vertex(c));
        let area = triangle_area(pa, pb, pc);
        assert!(
            area > min_area,
            "triangle {} is degenerate or clockwise (area={}, vertices={:?} {:?} {:?})",
            i,
            area,
            pa,
            pb,
            pc
        );
    }
}

/// Brute-force empty-circumcircle check that does not use the crate's predicates.
pub fn verify_delaunay_brute_force(sub: &Subdivision) {
    let verts = sub.vertices();
    for tri in sub.triangles() {
        let [a, b, c] = tri.map(|v| verts[v as usize]);
        for (v, &p) in verts.iter().enumerate() {
            if tri.contains(&(v as u32)) {
                continue;
            }
            assert!(
                !strictly_in_circumcircle(a, b, c, p),
                "vertex {} {:?} lies inside circumcircle of {:?}",
                v,
                p,
                tri
            );
        }
    }
}

/// Full structural and geometric check of a subdivision whose sites all lie
/// strictly inside its bounding triangle.
pub fn verify_valid_subdivision(sub: &Subdivision) {
    if let Err(err) = sub.validate_topology() {
        panic!("topology check failed: {}", err);
    }
    let violations = sub.delaunay_violations();
    assert!(violations.is_empty(), "Delaunay violations: {:?}", violations);
    assert_eq!(
        sub.triangle_count(),
        2 * sub.vertex_count() - 5,
        "triangle count does not match 2n - 5 for n = {}",
        sub.vertex_count()
    );
    assert_eq!(sub.edge_count(), 3 * sub.vertex_count() - 6);
}
