use crate::config::SceneConfig;
use crate::error::GeometryError;
use crate::kernel_out::{
    BuildingMeshes, LodDetail, MeshTag, OsmMesh, RenderColor, Topology, WindowTier,
};
use crate::shape::{Footprint, ring_pairs};
use crate::tagticks::BuildingColor;

///////////////////////////////////////////////////////////////////////////////////////////////////
// BUILDING ///////////////////////////////////////////////////////////////////////////////////////

// Window rows: every 4th or every 2nd window height
static FAR_STEP_FACTOR: f32 = 4.0;
static NEAR_STEP_FACTOR: f32 = 2.0;

/// Walls, roof and two window tiers of one footprint. Built completely or not at all.
pub fn build_building(
    id: u64,
    footprint: &Footprint,
    config: &SceneConfig,
    color: BuildingColor,
) -> Result<BuildingMeshes, GeometryError> {
    let height = config.building_height;
    let building_color = color.with_alpha(config.building_alpha);
    let window_color = config.window_color.unwrap_or(color.with_alpha(1.0));

    let walls = push_walls(footprint, height, building_color);
    let roof = push_flat_roof(footprint, height, building_color)?;
    if roof.is_empty() {
        tracing::debug!("building {id}: the footprint has no area, no roof");
    }

    let lod = config.lod;
    let windows = vec![
        WindowTier {
            detail: LodDetail::Far,
            switch_in: lod.far_distance,
            switch_out: lod.mid_distance,
            mesh: push_windows(
                "windows_far",
                footprint,
                height,
                config.window_width,
                config.window_height,
                config.window_height * FAR_STEP_FACTOR,
                window_color,
            ),
        },
        WindowTier {
            detail: LodDetail::Near,
            switch_in: lod.mid_distance,
            switch_out: lod.near_distance,
            mesh: push_windows(
                "windows_near",
                footprint,
                height,
                config.window_width,
                config.window_height,
                config.window_height * NEAR_STEP_FACTOR,
                window_color,
            ),
        },
    ];

    Ok(BuildingMeshes {
        id,
        color,
        walls,
        roof,
        windows,
    })
}

/// Vertex i pushes its ground position (2i) and its top (2i+1). Each side is two triangles.
/// The footprint runs clockwise, so the front faces look outward.
pub fn push_walls(footprint: &Footprint, height: f32, color: RenderColor) -> OsmMesh {
    let mut mesh = OsmMesh::new("walls", Topology::TriangleList, color).with_tag(MeshTag::Building);

    for position in &footprint.positions {
        mesh.push_position(position.to_render_position(0.0));
        mesh.push_position(position.to_render_position(height));
    }

    for (this, next) in ring_pairs(footprint.len()) {
        let down_this = this * 2;
        let up_this = this * 2 + 1;
        let down_next = next * 2;
        let up_next = next * 2 + 1;
        mesh.push_indices([down_this, up_this, down_next]);
        mesh.push_indices([up_this, up_next, down_next]);
    }

    mesh
}

// Flat roof on top of the walls. The corners are NOT reused.
pub fn push_flat_roof(
    footprint: &Footprint,
    height: f32,
    color: RenderColor,
) -> Result<OsmMesh, GeometryError> {
    let mut mesh = OsmMesh::new("roof", Topology::TriangleList, color).with_tag(MeshTag::Roof);
    for triangle in footprint.triangulate()? {
        mesh.push_triangle([
            triangle[0].to_render_position(height),
            triangle[1].to_render_position(height),
            triangle[2].to_render_position(height),
        ]);
    }
    Ok(mesh)
}

/// One window quad per footprint vertex and row. Rows start at the ground, `step` apart, below `height`.
pub fn push_windows(
    name: &str,
    footprint: &Footprint,
    height: f32,
    window_width: f32,
    window_height: f32,
    step: f32,
    color: RenderColor,
) -> OsmMesh {
    let mut mesh = OsmMesh::new(name, Topology::TriangleList, color).with_tag(MeshTag::Window);
    if step <= 0.0 || height <= 0.0 {
        return mesh;
    }

    let rows = (height / step).ceil() as usize;
    let half = window_width / 2.;
    for position in &footprint.positions {
        let (east, north) = (position.east, position.north);
        for row in 0..rows {
            let z = row as f32 * step;
            //                                                                 1---2
            let index = mesh.push_position([east + half, north, z]); //     |   |
            mesh.push_position([east + half, north, z + window_height]); // 0---3
            mesh.push_position([east - half, north, z + window_height]);
            mesh.push_position([east - half, north, z]);

            mesh.push_indices([index, index + 1, index + 2]);
            mesh.push_indices([index + 2, index + 3, index]);
        }
    }

    mesh
}
