// Copyright 2025 Lars Brubaker
// Structural and Delaunay checks for Subdivision.

use super::Subdivision;
use crate::geom::{in_circle_det, in_circle_scale, Real};
use crate::quadedge::{edge_of, inv_rot, is_primal, quad, rot, sym, EdgeIdx, VertIdx};

/// Relative tolerance of the empty-circumcircle check.
const DELAUNAY_TOLERANCE: Real = 1e-10;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TopologyError {
    #[error("edge {edge}: rotation algebra is inconsistent")]
    BrokenRotation { edge: EdgeIdx },

    #[error("edge {edge}: onext leads to dead or mismatched edge {next}")]
    DanglingLink { edge: EdgeIdx, next: EdgeIdx },

    #[error("edge {edge}: origin ring does not close within {limit} steps")]
    OpenRing { edge: EdgeIdx, limit: usize },

    #[error("edge {edge}: ring member {member} has origin {found}, expected {expected}")]
    InconsistentOrigin {
        edge: EdgeIdx,
        member: EdgeIdx,
        found: VertIdx,
        expected: VertIdx,
    },

    #[error("edge {edge}: face has {len} edges, expected 3")]
    NonTriangularFace { edge: EdgeIdx, len: usize },

    #[error("Euler relation violated: V={vertices} E={edges} F={faces}")]
    EulerMismatch {
        vertices: usize,
        edges: usize,
        faces: usize,
    },
}

/// A vertex strictly inside the circumcircle of a triangle it does not belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelaunayViolation {
    pub triangle: [VertIdx; 3],
    pub vertex: VertIdx,
}

impl Subdivision {
    /// Check the quad-edge invariants of the whole mesh: rotation algebra,
    /// closed origin rings with a shared origin, triangular faces and
    /// V - E + F = 2 (outer face included).
    pub fn validate_topology(&self) -> Result<(), TopologyError> {
        let mesh = &self.mesh;
        let limit = 2 * mesh.edge_count() + 2;
        let mut faces = 0usize;

        for q in mesh.live_quads() {
            for r in 0..4 {
                let e = edge_of(q, r);
                if rot(rot(rot(rot(e)))) != e || sym(sym(e)) != e || rot(inv_rot(e)) != e {
                    return Err(TopologyError::BrokenRotation { edge: e });
                }
                let next = mesh.onext(e);
                if !mesh.is_live(quad(next)) || is_primal(next) != is_primal(e) {
                    return Err(TopologyError::DanglingLink { edge: e, next });
                }
            }

            for e in [edge_of(q, 0), edge_of(q, 2)] {
                let expected = mesh.org(e);
                let mut f = mesh.onext(e);
                let mut steps = 0;
                while f != e {
                    if mesh.org(f) != expected {
                        return Err(TopologyError::InconsistentOrigin {
                            edge: e,
                            member: f,
                            found: mesh.org(f),
                            expected,
                        });
                    }
                    steps += 1;
                    if steps > limit {
                        return Err(TopologyError::OpenRing { edge: e, limit });
                    }
                    f = mesh.onext(f);
                }

                let mut len = 1;
                let mut f = mesh.lnext(e);
                while f != e && len <= 3 {
                    len += 1;
                    f = mesh.lnext(f);
                }
                if len != 3 {
                    return Err(TopologyError::NonTriangularFace { edge: e, len });
                }
                let (e1, e2) = (mesh.lnext(e), mesh.lnext(mesh.lnext(e)));
                if e < e1 && e < e2 {
                    faces += 1;
                }
            }
        }

        let (v, e) = (self.vertex_count(), mesh.edge_count());
        if v + faces != e + 2 {
            return Err(TopologyError::EulerMismatch {
                vertices: v,
                edges: e,
                faces,
            });
        }
        Ok(())
    }

    /// Every (triangle, vertex) pair where the vertex lies strictly inside
    /// the triangle's circumcircle, up to a relative tolerance.
    pub fn delaunay_violations(&self) -> Vec<DelaunayViolation> {
        let triangles = self.triangles();
        tracing::debug!(
            triangles = triangles.len(),
            vertices = self.verts.len(),
            "checking empty-circumcircle property"
        );

        let mut violations = Vec::new();
        for tri in triangles {
            let [a, b, c] = tri.map(|v| self.verts[v as usize]);
            for (v, &p) in self.verts.iter().enumerate() {
                let v = v as VertIdx;
                if tri.contains(&v) {
                    continue;
                }
                let det = in_circle_det(a, b, c, p);
                if det > DELAUNAY_TOLERANCE * in_circle_scale(a, b, c, p) {
                    violations.push(DelaunayViolation {
                        triangle: tri,
                        vertex: v,
                    });
                }
            }
        }

        if !violations.is_empty() {
            tracing::warn!(count = violations.len(), "Delaunay violations found");
        }
        violations
    }

    pub fn is_delaunay(&self) -> bool {
        self.delaunay_violations().is_empty()
    }
}
