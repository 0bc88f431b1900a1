use crate::config::SceneConfig;
use crate::error::GeometryError;
use crate::kernel_in::GroundPosition;
use crate::kernel_out::{
    FurnitureKind, FurniturePlacement, MeshTag, OsmMesh, RenderColor, RoadMeshes, Topology,
};
use crate::shape::check_finite;

///////////////////////////////////////////////////////////////////////////////////////////////////
// ROAD ///////////////////////////////////////////////////////////////////////////////////////////

pub fn build_road(
    id: u64,
    polyline: &[GroundPosition],
    config: &SceneConfig,
) -> Result<RoadMeshes, GeometryError> {
    if polyline.len() < 2 {
        return Err(GeometryError::TooFewPoints(polyline.len()));
    }
    check_finite(polyline)?;

    Ok(RoadMeshes {
        id,
        line: push_road_line(polyline, config.road_elevation, config.road_color),
        thickness: config.road_thickness,
        furniture: place_furniture(
            polyline,
            config.lamp_interval,
            config.traffic_light_interval,
        ),
    })
}

/// One vertex per point, one line per neighbours. The strip stays open.
pub fn push_road_line(polyline: &[GroundPosition], elevation: f32, color: RenderColor) -> OsmMesh {
    let mut mesh = OsmMesh::new("road", Topology::LineList, color).with_tag(MeshTag::Road);
    for position in polyline {
        mesh.push_position(position.to_render_position(elevation));
    }
    for index in 1..polyline.len() {
        mesh.push_line(index - 1, index);
    }
    mesh
}

// Every n-th vertex, counting from the first one. 0 means never.
fn is_every(index: usize, interval: usize) -> bool {
    interval > 0 && index % interval == 0
}

/// Street lamps and traffic lights along a road. A vertex may get both.
pub fn place_furniture(
    polyline: &[GroundPosition],
    lamp_interval: usize,
    traffic_light_interval: usize,
) -> Vec<FurniturePlacement> {
    let mut placements = Vec::new();
    for (index, position) in polyline.iter().enumerate() {
        if is_every(index, lamp_interval) {
            placements.push(FurniturePlacement {
                position: *position,
                kind: FurnitureKind::StreetLamp,
                index,
            });
        }
        if is_every(index, traffic_light_interval) {
            placements.push(FurniturePlacement {
                position: *position,
                kind: FurnitureKind::TrafficLight,
                index,
            });
        }
    }
    placements
}
