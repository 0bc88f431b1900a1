// outer SHAPE of a building or a water body, and its triangulation

extern crate earcutr;

use crate::error::GeometryError;
use crate::kernel_in::{GroundPosition, GroundPositions};

// Below this, an area counts as zero (collinear rings, slivers)
pub static MIN_AREA: f32 = 1.0e-6;

pub type Triangle = [GroundPosition; 3];

/// Drops the repeated closing point and consecutive duplicates. The result is implicitly closed.
pub fn open_ring(ring: &[GroundPosition]) -> GroundPositions {
    let mut positions: GroundPositions = Vec::with_capacity(ring.len());
    for position in ring {
        if positions.last() != Some(position) {
            positions.push(*position);
        }
    }
    while positions.len() > 1 && positions.first() == positions.last() {
        positions.pop();
    }
    positions
}

/// Fails on the first coordinate that is NaN or infinite
pub fn check_finite(ring: &[GroundPosition]) -> Result<(), GeometryError> {
    match ring.iter().position(|position| !position.is_finite()) {
        Some(index) => Err(GeometryError::NonFinite(index)),
        None => Ok(()),
    }
}

/// The outer ring and every hole must be finite, a bad hole fails the whole item
pub fn check_finite_rings(
    outer: &[GroundPosition],
    holes: &[GroundPositions],
) -> Result<(), GeometryError> {
    check_finite(outer)?;
    holes.iter().try_for_each(|hole| check_finite(hole))
}

/// Shoelace area, positive if counter-clockwise seen from above
pub fn signed_area(ring: &[GroundPosition]) -> f32 {
    let mut sum = 0.0f64;
    for (index, position) in ring.iter().enumerate() {
        let next = ring[(index + 1) % ring.len()];
        sum += position.east as f64 * next.north as f64 - next.east as f64 * position.north as f64;
    }
    (sum / 2.0) as f32
}

pub fn triangle_area(triangle: &Triangle) -> f32 {
    signed_area(triangle).abs()
}

/// Index pairs `(i, i+1)` around a ring of `count` vertices, the last one wrapping to 0
pub fn ring_pairs(count: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..count).map(move |index| (index, (index + 1) % count))
}

/// Ear clipping of an outer ring with optional holes.
/// Degenerate input gives no triangles, not an error. All triangles are counter-clockwise.
pub fn triangulate_ring(
    outer: &[GroundPosition],
    holes: &[GroundPositions],
) -> Result<Vec<Triangle>, GeometryError> {
    if outer.len() < 3 || signed_area(outer).abs() <= MIN_AREA {
        return Ok(Vec::new());
    }

    let mut positions: GroundPositions = outer.to_vec();
    let mut vertices = Vec::<f64>::with_capacity(outer.len() * 2);
    let mut holes_starts = Vec::<usize>::new();
    for position in outer {
        vertices.push(position.east as f64);
        vertices.push(position.north as f64);
    }
    for hole in holes.iter().filter(|hole| hole.len() >= 3) {
        holes_starts.push(vertices.len() / 2);
        for position in hole {
            vertices.push(position.east as f64);
            vertices.push(position.north as f64);
            positions.push(*position);
        }
    }

    let indices = earcutr::earcut(&vertices, &holes_starts, 2)
        .map_err(|_| GeometryError::Triangulation(positions.len()))?;

    let mut triangles = Vec::with_capacity(indices.len() / 3);
    for corner in indices.chunks_exact(3) {
        let mut triangle = [
            positions[corner[0]],
            positions[corner[1]],
            positions[corner[2]],
        ];
        let area = signed_area(&triangle);
        if area.abs() <= MIN_AREA {
            continue;
        }
        if area < 0.0 {
            triangle.swap(1, 2);
        }
        triangles.push(triangle);
    }
    Ok(triangles)
}

/// Ring without holes, see `triangulate_ring`
pub fn triangulate(ring: &[GroundPosition]) -> Result<Vec<Triangle>, GeometryError> {
    triangulate_ring(&open_ring(ring), &[])
}

#[derive(Clone, Debug)]
pub struct Footprint {
    // outer ring, clockwise seen from above, no closing duplicate
    pub positions: GroundPositions,
    pub holes: Vec<GroundPositions>,
    pub center: GroundPosition,
}

impl Footprint {
    pub fn from_ring(ring: &[GroundPosition]) -> Result<Self, GeometryError> {
        Self::with_holes(ring, &[])
    }

    pub fn with_holes(
        ring: &[GroundPosition],
        holes: &[GroundPositions],
    ) -> Result<Self, GeometryError> {
        check_finite_rings(ring, holes)?;
        let positions = open_ring(ring);
        if positions.len() < 3 {
            return Err(GeometryError::TooFewVertices(positions.len()));
        }

        let holes = holes
            .iter()
            .map(|hole| open_ring(hole))
            .filter(|hole| hole.len() >= 3)
            .collect();

        let mut footprint = Footprint {
            positions,
            holes,
            center: GroundPosition::ZERO,
        };
        footprint.close();
        Ok(footprint)
    }

    // center and direction
    fn close(&mut self) {
        let count = self.positions.len() as f32;
        for position in &self.positions {
            self.center.north += position.north;
            self.center.east += position.east;
        }
        self.center.north /= count;
        self.center.east /= count;

        // walls face outward if the outer ring runs clockwise
        if signed_area(&self.positions) > 0.0 {
            self.positions.reverse();
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn area(&self) -> f32 {
        let holes: f32 = self.holes.iter().map(|hole| signed_area(hole).abs()).sum();
        signed_area(&self.positions).abs() - holes
    }

    pub fn triangulate(&self) -> Result<Vec<Triangle>, GeometryError> {
        triangulate_ring(&self.positions, &self.holes)
    }
}
