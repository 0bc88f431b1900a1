use crate::config::{SceneConfig, WaterFill};
use crate::error::GeometryError;
use crate::kernel_in::{GroundPosition, GroundPositions};
use crate::kernel_out::{MeshTag, OsmMesh, Topology, WaterMeshes};
use crate::shape::{check_finite_rings, open_ring, triangulate_ring};

///////////////////////////////////////////////////////////////////////////////////////////////////
// WATER //////////////////////////////////////////////////////////////////////////////////////////

/// One polygon of a water body in the local frame. Rings may repeat their first point at the end.
#[derive(Clone, Debug, Default)]
pub struct WaterPart {
    pub outer: GroundPositions,
    pub holes: Vec<GroundPositions>,
}

impl WaterPart {
    pub fn new(outer: GroundPositions) -> Self {
        Self {
            outer,
            holes: Vec::new(),
        }
    }
}

/// All parts go into one mesh. Parts too small to fill add nothing.
pub fn build_water(
    id: u64,
    parts: &[WaterPart],
    config: &SceneConfig,
) -> Result<WaterMeshes, GeometryError> {
    let mut fill =
        OsmMesh::new("water", Topology::TriangleList, config.water_color).with_tag(MeshTag::Water);

    for part in parts {
        check_finite_rings(&part.outer, &part.holes)?;
        let outer = open_ring(&part.outer);
        if outer.len() < 3 {
            tracing::debug!("water {id}: part with {} vertices skipped", outer.len());
            continue;
        }

        match config.water_fill {
            WaterFill::Earcut => {
                let holes: Vec<GroundPositions> =
                    part.holes.iter().map(|hole| open_ring(hole)).collect();
                push_earcut(&mut fill, &outer, &holes, config.water_elevation)?
            }
            WaterFill::ConsecutiveTriples => {
                push_consecutive_triples(&mut fill, &outer, config.water_elevation)
            }
        }
    }

    if fill.is_empty() {
        return Err(GeometryError::EmptyMesh("water"));
    }
    Ok(WaterMeshes { id, fill })
}

pub fn push_earcut(
    mesh: &mut OsmMesh,
    outer: &[GroundPosition],
    holes: &[GroundPositions],
    elevation: f32,
) -> Result<(), GeometryError> {
    for triangle in triangulate_ring(outer, holes)? {
        mesh.push_triangle([
            triangle[0].to_render_position(elevation),
            triangle[1].to_render_position(elevation),
            triangle[2].to_render_position(elevation),
        ]);
    }
    Ok(())
}

/// Triangles `(i, i+1, i+2)` for i in 0..=k-3 over a ring of k vertices.
/// This covers a convex ring only approximately and gets concave shores wrong.
pub fn push_consecutive_triples(mesh: &mut OsmMesh, ring: &[GroundPosition], elevation: f32) {
    let offset = mesh.vertex_count();
    for position in ring {
        mesh.push_position(position.to_render_position(elevation));
    }
    for index in 0..ring.len().saturating_sub(2) {
        mesh.push_indices([offset + index, offset + index + 1, offset + index + 2]);
    }
}
