// Copyright 2025 Lars Brubaker
// License: MIT
//
// Incremental Delaunay triangulation on a quad-edge subdivision.
//
// The subdivision starts as one bounding triangle. Each inserted site is
// located by walking across edges, linked to the corners of the face that
// contains it, and the star around it is made locally Delaunay by flipping.
// Vertices are copied into the subdivision; edges refer to them by index.

mod validation;

pub use validation::{DelaunayViolation, TopologyError};

use crate::geom::{ccw, in_circle, on_segment, DirectedLine, GeomError, Point, Real, Side};
use crate::quadedge::{edge_of, quad, rot_index, sym, EdgeIdx, QuadEdgeMesh, QuadIdx, VertIdx};

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SubdivisionOption {
    /// Reject sites that are not strictly inside the bounding triangle.
    StrictBounds,
}

/// Result of a successful `insert_site`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InsertOutcome {
    /// A new vertex was added.
    Inserted(VertIdx),
    /// The site coincides with an existing vertex; the mesh is unchanged.
    Duplicate(VertIdx),
}

impl InsertOutcome {
    pub fn vertex(self) -> VertIdx {
        match self {
            InsertOutcome::Inserted(v) | InsertOutcome::Duplicate(v) => v,
        }
    }

    pub fn is_inserted(self) -> bool {
        matches!(self, InsertOutcome::Inserted(_))
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SubdivisionError {
    #[error("bounding triangle is degenerate (coincident or collinear vertices)")]
    DegenerateBoundary,

    #[error("bounding triangle vertices must be in counterclockwise order")]
    ClockwiseBoundary,

    #[error("site ({x}, {y}) is not strictly inside the bounding triangle")]
    OutsideBoundary { x: Real, y: Real },

    #[error("non-finite coordinate ({x}, {y})")]
    NonFiniteCoordinate { x: Real, y: Real },

    #[error("point location did not terminate after {steps} steps")]
    LocateStepLimit { steps: usize },

    #[error("cannot build an enclosing triangle for an empty point set")]
    EmptyPointSet,

    #[error("geometry error: {source}")]
    Geometry {
        #[from]
        source: GeomError,
    },
}

/// A planar Delaunay triangulation inside a fixed bounding triangle.
#[derive(Clone, Debug)]
pub struct Subdivision {
    mesh: QuadEdgeMesh,
    verts: Vec<Point>,
    /// Quad-edge groups of the bounding triangle; never flipped or deleted.
    boundary: [QuadIdx; 3],
    starting_edge: EdgeIdx,
    strict_bounds: bool,
    locate_step_limit: Option<usize>,
}

impl Subdivision {
    /// Build the subdivision for the triangle (a, b, c).
    ///
    /// The vertices must be counterclockwise and every later site must lie
    /// inside the triangle; neither is checked here. See [`Subdivision::try_new`].
    pub fn new(a: Point, b: Point, c: Point) -> Self {
        let mut mesh = QuadEdgeMesh::new();

        let ea = mesh.make_edge();
        mesh.set_end_points(ea, 0, 1);

        let eb = mesh.make_edge();
        mesh.splice(sym(ea), eb);
        mesh.set_end_points(eb, 1, 2);

        let ec = mesh.make_edge();
        mesh.splice(sym(eb), ec);
        mesh.set_end_points(ec, 2, 0);

        mesh.splice(sym(ec), ea);

        Subdivision {
            mesh,
            verts: vec![a, b, c],
            boundary: [quad(ea), quad(eb), quad(ec)],
            starting_edge: ea,
            strict_bounds: false,
            locate_step_limit: None,
        }
    }

    /// Like [`Subdivision::new`] but rejects non-finite, degenerate and
    /// clockwise bounding triangles.
    pub fn try_new(a: Point, b: Point, c: Point) -> Result<Self, SubdivisionError> {
        for p in [a, b, c] {
            check_finite(p)?;
        }
        if a == b || b == c || c == a {
            return Err(SubdivisionError::DegenerateBoundary);
        }
        let line = DirectedLine::new(a, b)?;
        match line.classify(c) {
            Side::Left => Ok(Self::new(a, b, c)),
            Side::Right => Err(SubdivisionError::ClockwiseBoundary),
            Side::On => Err(SubdivisionError::DegenerateBoundary),
        }
    }

    /// Triangulate `points` inside a generous triangle around their bounding box.
    pub fn from_points(points: &[Point]) -> Result<Self, SubdivisionError> {
        let first = points.first().ok_or(SubdivisionError::EmptyPointSet)?;
        let (mut min, mut max) = (*first, *first);
        for &p in points {
            check_finite(p)?;
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        let cx = 0.5 * (min.x + max.x);
        let cy = 0.5 * (min.y + max.y);
        let k = 10.0 * (max.x - min.x).max(max.y - min.y).max(1.0);

        let mut sub = Self::try_new(
            Point::new(cx - k, cy - k),
            Point::new(cx + k, cy - k),
            Point::new(cx, cy + k),
        )?;
        sub.set_option(SubdivisionOption::StrictBounds, true);
        for &p in points {
            sub.insert_site(p)?;
        }
        Ok(sub)
    }

    pub fn set_option(&mut self, option: SubdivisionOption, value: bool) {
        match option {
            SubdivisionOption::StrictBounds => self.strict_bounds = value,
        }
    }

    pub fn option(&self, option: SubdivisionOption) -> bool {
        match option {
            SubdivisionOption::StrictBounds => self.strict_bounds,
        }
    }

    /// Cap on the number of steps `locate` may take. `None` derives the cap
    /// from the current edge count.
    pub fn set_locate_step_limit(&mut self, limit: Option<usize>) {
        self.locate_step_limit = limit;
    }

    // ──────────────── Accessors ────────────────

    pub fn mesh(&self) -> &QuadEdgeMesh {
        &self.mesh
    }

    pub fn vertices(&self) -> &[Point] {
        &self.verts
    }

    pub fn vertex(&self, v: VertIdx) -> Point {
        self.verts[v as usize]
    }

    pub fn vertex_count(&self) -> usize {
        self.verts.len()
    }

    /// Number of undirected edges, boundary included.
    pub fn edge_count(&self) -> usize {
        self.mesh.edge_count()
    }

    /// Number of bounded triangles.
    pub fn triangle_count(&self) -> usize {
        self.triangles().len()
    }

    pub fn starting_edge(&self) -> EdgeIdx {
        self.starting_edge
    }

    /// The three corners of the bounding triangle, in construction order.
    pub fn bounds(&self) -> [Point; 3] {
        [self.verts[0], self.verts[1], self.verts[2]]
    }

    #[inline]
    pub fn org_point(&self, e: EdgeIdx) -> Point {
        self.verts[self.mesh.org(e) as usize]
    }

    #[inline]
    pub fn dest_point(&self, e: EdgeIdx) -> Point {
        self.verts[self.mesh.dest(e) as usize]
    }

    pub fn is_boundary_edge(&self, e: EdgeIdx) -> bool {
        self.boundary.contains(&quad(e))
    }

    /// True if e is one of the boundary edges directed around the unbounded face.
    fn is_outer(&self, e: EdgeIdx) -> bool {
        self.is_boundary_edge(e) && rot_index(e) == 2
    }

    #[inline]
    fn right_of(&self, x: Point, e: EdgeIdx) -> bool {
        ccw(x, self.dest_point(e), self.org_point(e))
    }

    /// True if `x` is strictly inside the bounding triangle.
    pub fn contains(&self, x: Point) -> bool {
        let [a, b, c] = self.bounds();
        [(a, b), (b, c), (c, a)].iter().all(|&(u, v)| {
            DirectedLine::new(u, v)
                .map(|line| line.classify(x) == Side::Left)
                .unwrap_or(false)
        })
    }

    // ──────────────── Point location ────────────────

    /// Find an edge e such that `x` lies in the face to the left of e or on
    /// its boundary. Returns early with an edge incident to `x` when `x`
    /// coincides with a vertex met on the walk.
    pub fn locate(&self, x: Point) -> Result<EdgeIdx, SubdivisionError> {
        let limit = self
            .locate_step_limit
            .unwrap_or_else(|| 8 * self.mesh.edge_count() + 64);

        let mut e = self.starting_edge;
        for _ in 0..limit {
            if x == self.org_point(e) || x == self.dest_point(e) {
                return Ok(e);
            }
            if self.right_of(x, e) {
                e = sym(e);
                continue;
            }
            let onext = self.mesh.onext(e);
            if !self.right_of(x, onext) {
                e = onext;
                continue;
            }
            let dprev = self.mesh.dprev(e);
            if !self.right_of(x, dprev) {
                e = dprev;
                continue;
            }
            return Ok(e);
        }

        tracing::warn!(x = x.x, y = x.y, steps = limit, "point location gave up");
        Err(SubdivisionError::LocateStepLimit { steps: limit })
    }

    // ──────────────── Insertion ────────────────

    /// Insert a site and restore the Delaunay property.
    ///
    /// Coordinates must be finite. Unless `StrictBounds` is set, the site is
    /// assumed to lie inside the bounding triangle.
    pub fn insert_site(&mut self, x: Point) -> Result<InsertOutcome, SubdivisionError> {
        check_finite(x)?;
        if self.strict_bounds && !self.contains(x) {
            return Err(SubdivisionError::OutsideBoundary { x: x.x, y: x.y });
        }
        self.insert_unchecked(x)
    }

    /// Insert a site, rejecting it if it is not strictly inside the bounding
    /// triangle regardless of `StrictBounds`.
    pub fn try_insert_site(&mut self, x: Point) -> Result<InsertOutcome, SubdivisionError> {
        check_finite(x)?;
        if !self.contains(x) {
            return Err(SubdivisionError::OutsideBoundary { x: x.x, y: x.y });
        }
        self.insert_unchecked(x)
    }

    fn insert_unchecked(&mut self, x: Point) -> Result<InsertOutcome, SubdivisionError> {
        let mut e = self.locate(x)?;

        if let Some(v) = self.coincident_vertex(x, e) {
            tracing::debug!(vertex = v, "site already present");
            return Ok(InsertOutcome::Duplicate(v));
        }

        if let Some(on) = self.edge_under(x, e) {
            if self.is_boundary_edge(on) {
                tracing::warn!(
                    x = x.x,
                    y = x.y,
                    "site lies on the bounding triangle; inserting a degenerate face"
                );
            } else {
                // Merge the two triangles sharing `on` into one quadrilateral.
                e = self.mesh.oprev(on);
                self.mesh.delete_edge(on);
            }
        }

        let v = self.verts.len() as VertIdx;
        self.verts.push(x);

        // Fan out from the new vertex to every corner of the enclosing polygon.
        let first = self.mesh.make_edge();
        let e_org = self.mesh.org(e);
        self.mesh.set_end_points(first, e_org, v);
        self.mesh.splice(first, e);
        self.starting_edge = first;

        let mut base = first;
        loop {
            base = self.mesh.connect(e, sym(base));
            e = self.mesh.oprev(base);
            if self.mesh.lnext(e) == first {
                break;
            }
        }

        // Each flip adds an edge at v, so the count is bounded by the vertex count.
        let max_flips = self.verts.len();
        let mut flips = 0usize;
        loop {
            let t = self.mesh.oprev(e);
            let t_dest = self.dest_point(t);
            if !self.is_boundary_edge(e)
                && self.right_of(t_dest, e)
                && in_circle(self.org_point(e), t_dest, self.dest_point(e), x)
            {
                if flips >= max_flips {
                    tracing::warn!(vertex = v, flips, "flip limit reached");
                    break;
                }
                tracing::trace!(edge = e, "flip");
                self.mesh.swap(e);
                flips += 1;
                e = self.mesh.oprev(e);
            } else if self.mesh.onext(e) == first {
                break;
            } else {
                e = self.mesh.lprev(self.mesh.onext(e));
            }
        }

        tracing::debug!(vertex = v, flips, "inserted site");
        Ok(InsertOutcome::Inserted(v))
    }

    /// Vertex of the face left of e that coincides with x, if any.
    fn coincident_vertex(&self, x: Point, e: EdgeIdx) -> Option<VertIdx> {
        let third = self.mesh.dest(self.mesh.lnext(e));
        [self.mesh.org(e), self.mesh.dest(e), third]
            .into_iter()
            .find(|&v| self.verts[v as usize] == x)
    }

    /// Edge of the face left of e that x lies on, if any.
    fn edge_under(&self, x: Point, e: EdgeIdx) -> Option<EdgeIdx> {
        [e, self.mesh.lnext(e), self.mesh.lprev(e)]
            .into_iter()
            .find(|&f| on_segment(x, self.org_point(f), self.dest_point(f)))
    }

    // ──────────────── Enumeration ────────────────

    /// Call `visit(origin, destination)` once per undirected edge.
    pub fn visit_edges<F: FnMut(Point, Point)>(&mut self, mut visit: F) {
        let verts = &self.verts;
        self.mesh
            .visit_undirected(self.starting_edge, |_, org, dest| {
                visit(verts[org as usize], verts[dest as usize])
            });
    }

    /// Every undirected edge as an (origin, destination) pair.
    pub fn edges(&mut self) -> Vec<(Point, Point)> {
        let mut out = Vec::with_capacity(self.edge_count());
        self.visit_edges(|a, b| out.push((a, b)));
        out
    }

    /// Every bounded triangle as three counterclockwise vertex indices.
    pub fn triangles(&self) -> Vec<[VertIdx; 3]> {
        let mut out = Vec::new();
        for q in self.mesh.live_quads() {
            for e in [edge_of(q, 0), edge_of(q, 2)] {
                let e1 = self.mesh.lnext(e);
                let e2 = self.mesh.lnext(e1);
                // Report each face once, from its smallest directed edge.
                if self.mesh.lnext(e2) != e || e > e1 || e > e2 {
                    continue;
                }
                if self.is_outer(e) || self.is_outer(e1) || self.is_outer(e2) {
                    continue;
                }
                out.push([self.mesh.org(e), self.mesh.org(e1), self.mesh.org(e2)]);
            }
        }
        out
    }
}

fn check_finite(p: Point) -> Result<(), SubdivisionError> {
    if p.is_finite() {
        Ok(())
    } else {
        Err(SubdivisionError::NonFiniteCoordinate { x: p.x, y: p.y })
    }
}
