// Copyright 2025 Lars Brubaker
// License: MIT

pub mod geom;
pub mod quadedge;
pub mod subdivision;

pub use geom::{DirectedLine, GeomError, Point, Real, Side, Vector, EPS};
pub use quadedge::{EdgeIdx, QuadEdgeMesh, QuadIdx, VertIdx, INVALID};
pub use subdivision::{
    DelaunayViolation, InsertOutcome, Subdivision, SubdivisionError, SubdivisionOption,
    TopologyError,
};
