// Copyright 2025 Lars Brubaker
// WASM bindings for quadedge-rust

use quadedge_rust::{Point, Subdivision, SubdivisionOption};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn main_js() {
    console_error_panic_hook::set_once();
}

/// An incremental Delaunay triangulation that accepts sites one at a time.
#[wasm_bindgen]
pub struct SubdivisionJs {
    inner: Subdivision,
}

#[wasm_bindgen]
impl SubdivisionJs {
    /// Start from the counterclockwise bounding triangle (a, b, c).
    /// Sites outside the triangle are rejected.
    #[wasm_bindgen(constructor)]
    pub fn new(
        ax: f64,
        ay: f64,
        bx: f64,
        by: f64,
        cx: f64,
        cy: f64,
    ) -> Result<SubdivisionJs, JsError> {
        let mut inner = Subdivision::try_new(
            Point::new(ax, ay),
            Point::new(bx, by),
            Point::new(cx, cy),
        )?;
        inner.set_option(SubdivisionOption::StrictBounds, true);
        Ok(SubdivisionJs { inner })
    }

    /// Insert a site. Returns true if a new vertex was added, false for a
    /// duplicate or a rejected site.
    pub fn insert_site(&mut self, x: f64, y: f64) -> bool {
        match self.inner.insert_site(Point::new(x, y)) {
            Ok(outcome) => outcome.is_inserted(),
            Err(_) => false,
        }
    }

    pub fn vertex_count(&self) -> u32 {
        self.inner.vertex_count() as u32
    }

    pub fn edge_count(&self) -> u32 {
        self.inner.edge_count() as u32
    }

    pub fn triangle_count(&self) -> u32 {
        self.inner.triangle_count() as u32
    }

    /// Flat vertex positions [x0,y0, x1,y1, ...], bounding corners first.
    pub fn get_vertices(&self) -> Vec<f64> {
        self.inner
            .vertices()
            .iter()
            .flat_map(|p| [p.x, p.y])
            .collect()
    }

    /// Flat segment endpoints [x0,y0,x1,y1, ...], one segment per edge.
    pub fn get_edges(&mut self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.inner.edge_count() * 4);
        self.inner
            .visit_edges(|a, b| out.extend_from_slice(&[a.x, a.y, b.x, b.y]));
        out
    }

    /// Flat triangle vertex-index triples [i0,i1,i2, ...].
    pub fn get_triangles(&self) -> Vec<u32> {
        self.inner.triangles().into_iter().flatten().collect()
    }
}

/// Convenience: triangulate a flat [x0,y0, x1,y1, ...] point array inside an
/// enclosing triangle. Returns the triangle index array; indices 0..3 are the
/// enclosing corners and index i + 3 is input point i unless it was a duplicate.
#[wasm_bindgen]
pub fn triangulate_points(coords: &[f64]) -> Result<Vec<u32>, JsError> {
    let points: Vec<Point> = coords
        .chunks_exact(2)
        .map(|c| Point::new(c[0], c[1]))
        .collect();
    let sub = Subdivision::from_points(&points)?;
    Ok(sub.triangles().into_iter().flatten().collect())
}
