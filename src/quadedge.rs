// Copyright 2025 Lars Brubaker
// License: MIT
//
// Guibas-Stolfi quad-edge structure.
//
// Each quad-edge group owns four directed-edge records stored in a fixed
// array and addressed by a 2-bit rotation index. Pointers are replaced with
// u32 indices into a Vec arena.
//
// Design:
//   - EdgeIdx = (quad << 2) | r, r in 0..4
//     r = 0: the edge, r = 1: its dual (Rot), r = 2: Sym, r = 3: InvRot
//   - rot / sym / inv_rot are index arithmetic on the low two bits.
//   - Primal records store the origin vertex; dual records store INVALID.
//   - Deleted groups go on a free list and are reused by make_edge.

pub const INVALID: u32 = u32::MAX;

/// A directed edge: quad-edge group in the high bits, rotation in the low two.
pub type EdgeIdx = u32;
/// Index of a quad-edge group in the arena.
pub type QuadIdx = u32;
/// Index of a vertex owned by the caller of the mesh (e.g. the subdivision).
pub type VertIdx = u32;

#[inline(always)]
pub fn edge_of(q: QuadIdx, r: u32) -> EdgeIdx {
    (q << 2) | (r & 3)
}

/// Quad-edge group containing e.
#[inline(always)]
pub fn quad(e: EdgeIdx) -> QuadIdx {
    e >> 2
}

/// Rotation index of e within its group.
#[inline(always)]
pub fn rot_index(e: EdgeIdx) -> usize {
    (e & 3) as usize
}

/// Dual edge, directed from the right face to the left face.
#[inline(always)]
pub fn rot(e: EdgeIdx) -> EdgeIdx {
    (e & !3) | (e.wrapping_add(1) & 3)
}

/// Same edge, opposite direction.
#[inline(always)]
pub fn sym(e: EdgeIdx) -> EdgeIdx {
    (e & !3) | (e.wrapping_add(2) & 3)
}

/// Dual edge, directed from the left face to the right face.
#[inline(always)]
pub fn inv_rot(e: EdgeIdx) -> EdgeIdx {
    (e & !3) | (e.wrapping_add(3) & 3)
}

/// True for the primal (vertex-to-vertex) directions of a group.
#[inline(always)]
pub fn is_primal(e: EdgeIdx) -> bool {
    e & 1 == 0
}

#[derive(Copy, Clone, Debug)]
pub struct EdgeRecord {
    /// Next edge counterclockwise around the origin.
    pub next: EdgeIdx,
    /// Origin vertex; INVALID for dual records.
    pub org: VertIdx,
}

impl Default for EdgeRecord {
    fn default() -> Self {
        Self {
            next: INVALID,
            org: INVALID,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct QuadEdge {
    pub records: [EdgeRecord; 4],
    /// Traversal mark, compared against QuadEdgeMesh::timestamp.
    pub stamp: u32,
    pub live: bool,
}

/// Arena of quad-edge groups.
#[derive(Clone, Debug, Default)]
pub struct QuadEdgeMesh {
    quads: Vec<QuadEdge>,
    free_list: Vec<QuadIdx>,
    timestamp: u32,
}

impl QuadEdgeMesh {
    pub fn new() -> Self {
        Self::default()
    }

    // ──────────────── Navigation ────────────────

    #[inline]
    fn record(&self, e: EdgeIdx) -> &EdgeRecord {
        &self.quads[quad(e) as usize].records[rot_index(e)]
    }

    #[inline]
    fn record_mut(&mut self, e: EdgeIdx) -> &mut EdgeRecord {
        &mut self.quads[quad(e) as usize].records[rot_index(e)]
    }

    /// Next edge counterclockwise around the origin.
    #[inline]
    pub fn onext(&self, e: EdgeIdx) -> EdgeIdx {
        self.record(e).next
    }

    /// Oprev: Rot->Onext->Rot
    #[inline]
    pub fn oprev(&self, e: EdgeIdx) -> EdgeIdx {
        rot(self.onext(rot(e)))
    }

    /// Lnext: InvRot->Onext->Rot
    #[inline]
    pub fn lnext(&self, e: EdgeIdx) -> EdgeIdx {
        rot(self.onext(inv_rot(e)))
    }

    /// Lprev: Onext->Sym
    #[inline]
    pub fn lprev(&self, e: EdgeIdx) -> EdgeIdx {
        sym(self.onext(e))
    }

    /// Rnext: Rot->Onext->InvRot
    #[inline]
    pub fn rnext(&self, e: EdgeIdx) -> EdgeIdx {
        inv_rot(self.onext(rot(e)))
    }

    /// Rprev: Sym->Onext
    #[inline]
    pub fn rprev(&self, e: EdgeIdx) -> EdgeIdx {
        self.onext(sym(e))
    }

    /// Dnext: Sym->Onext->Sym
    #[inline]
    pub fn dnext(&self, e: EdgeIdx) -> EdgeIdx {
        sym(self.onext(sym(e)))
    }

    /// Dprev: InvRot->Onext->InvRot
    #[inline]
    pub fn dprev(&self, e: EdgeIdx) -> EdgeIdx {
        inv_rot(self.onext(inv_rot(e)))
    }

    #[inline]
    pub fn org(&self, e: EdgeIdx) -> VertIdx {
        self.record(e).org
    }

    #[inline]
    pub fn dest(&self, e: EdgeIdx) -> VertIdx {
        self.record(sym(e)).org
    }

    /// Set both endpoints of e in one step.
    pub fn set_end_points(&mut self, e: EdgeIdx, org: VertIdx, dest: VertIdx) {
        self.record_mut(e).org = org;
        self.record_mut(sym(e)).org = dest;
    }

    pub fn is_live(&self, q: QuadIdx) -> bool {
        self.quads.get(q as usize).is_some_and(|qe| qe.live)
    }

    /// Number of live quad-edge groups (undirected edges).
    pub fn edge_count(&self) -> usize {
        self.quads.len() - self.free_list.len()
    }

    /// Indices of all live quad-edge groups.
    pub fn live_quads(&self) -> impl Iterator<Item = QuadIdx> + '_ {
        self.quads
            .iter()
            .enumerate()
            .filter(|(_, q)| q.live)
            .map(|(i, _)| i as QuadIdx)
    }

    // ──────────────── Primitive operations ────────────────

    /// Allocate an isolated edge: the primal directions are self-loops around
    /// their origins and the duals form one ring around the single face.
    pub fn make_edge(&mut self) -> EdgeIdx {
        let q = match self.free_list.pop() {
            Some(q) => q,
            None => {
                self.quads.push(QuadEdge::default());
                (self.quads.len() - 1) as QuadIdx
            }
        };
        let e = |r| edge_of(q, r);
        let group = &mut self.quads[q as usize];
        group.records = [
            EdgeRecord { next: e(0), org: INVALID },
            EdgeRecord { next: e(3), org: INVALID },
            EdgeRecord { next: e(2), org: INVALID },
            EdgeRecord { next: e(1), org: INVALID },
        ];
        group.stamp = 0;
        group.live = true;
        e(0)
    }

    /// Exchange the origin rings of a and b, and the corresponding left-face
    /// rings. Joins two rings into one or splits one into two; applying the
    /// same splice twice restores the previous topology.
    pub fn splice(&mut self, a: EdgeIdx, b: EdgeIdx) {
        let alpha = rot(self.onext(a));
        let beta = rot(self.onext(b));

        let t1 = self.onext(b);
        let t2 = self.onext(a);
        let t3 = self.onext(beta);
        let t4 = self.onext(alpha);

        self.record_mut(a).next = t1;
        self.record_mut(b).next = t2;
        self.record_mut(alpha).next = t3;
        self.record_mut(beta).next = t4;
    }

    // ──────────────── Derived operations ────────────────

    /// New edge from a->Dest to b->Org such that a, the new edge and b share
    /// the same left face.
    pub fn connect(&mut self, a: EdgeIdx, b: EdgeIdx) -> EdgeIdx {
        let e = self.make_edge();
        let a_lnext = self.lnext(a);
        self.splice(e, a_lnext);
        self.splice(sym(e), b);
        let (org, dest) = (self.dest(a), self.org(b));
        self.set_end_points(e, org, dest);
        e
    }

    /// Detach e from the mesh and return its group to the free list.
    pub fn delete_edge(&mut self, e: EdgeIdx) {
        let e_oprev = self.oprev(e);
        self.splice(e, e_oprev);
        let e_sym = sym(e);
        let e_sym_oprev = self.oprev(e_sym);
        self.splice(e_sym, e_sym_oprev);

        let q = quad(e);
        let group = &mut self.quads[q as usize];
        group.live = false;
        group.records = [EdgeRecord::default(); 4];
        self.free_list.push(q);
    }

    /// Turn e counterclockwise inside the quadrilateral formed by its two
    /// adjacent triangles.
    pub fn swap(&mut self, e: EdgeIdx) {
        let a = self.oprev(e);
        let b = self.oprev(sym(e));
        self.splice(e, a);
        self.splice(sym(e), b);
        let a_lnext = self.lnext(a);
        self.splice(e, a_lnext);
        let b_lnext = self.lnext(b);
        self.splice(sym(e), b_lnext);
        let (org, dest) = (self.dest(a), self.dest(b));
        self.set_end_points(e, org, dest);
    }

    // ──────────────── Traversal ────────────────

    /// Call `visit(e, org, dest)` once for every quad-edge group reachable
    /// from `start`, passing the directed edge it was reached through. Groups
    /// are marked with a fresh timestamp so nothing is reported twice.
    pub fn visit_undirected<F>(&mut self, start: EdgeIdx, mut visit: F)
    where
        F: FnMut(EdgeIdx, VertIdx, VertIdx),
    {
        self.timestamp = self.timestamp.wrapping_add(1);
        if self.timestamp == 0 {
            for q in &mut self.quads {
                q.stamp = 0;
            }
            self.timestamp = 1;
        }
        let stamp = self.timestamp;

        let mut stack = vec![start];
        while let Some(e) = stack.pop() {
            let q = quad(e) as usize;
            if !self.quads[q].live || self.quads[q].stamp == stamp {
                continue;
            }
            self.quads[q].stamp = stamp;
            visit(e, self.org(e), self.dest(e));
            stack.push(self.onext(e));
            stack.push(self.onext(sym(e)));
        }
    }

    /// Number of edges in the origin ring of e.
    pub fn degree(&self, e: EdgeIdx) -> usize {
        let mut n = 0;
        let mut f = e;
        loop {
            n += 1;
            f = self.onext(f);
            if f == e {
                break;
            }
        }
        n
    }
}
