// Internal Interface of the crate/lib between the mesh builders and a renderer or other outputs

use serde::Serialize;

use crate::kernel_in::GroundPosition;
use crate::tagticks::BuildingColor;

// Internal type of the mesh builders. It's just luck, it is the same as needed for the gpu-renderer Bevy ;-)
pub type RenderColor = [f32; 4];

// x = east, y = north, z = up
pub type RenderPosition = [f32; 3];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Topology {
    TriangleList,
    LineList,
}

impl Topology {
    pub fn indices_per_primitive(self) -> usize {
        match self {
            Topology::TriangleList => 3,
            Topology::LineList => 2,
        }
    }
}

// Used by the picking of a renderer, not by the builders
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum MeshTag {
    Building,
    Roof,
    Window,
    Road,
    Water,
}

// Mesh render attributes
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OsmMesh {
    pub name: String,
    pub topology: Topology,
    pub vertices_positions: Vec<RenderPosition>,
    pub indices_to_vertices: Vec<u32>,
    pub color: RenderColor,
    pub tag: Option<MeshTag>,
}

impl OsmMesh {
    pub fn new(name: impl Into<String>, topology: Topology, color: RenderColor) -> Self {
        Self {
            name: name.into(),
            topology,
            vertices_positions: vec![],
            indices_to_vertices: vec![],
            color,
            tag: None,
        }
    }

    pub fn with_tag(mut self, tag: MeshTag) -> Self {
        self.tag = Some(tag);
        self
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices_positions.len()
    }

    pub fn primitive_count(&self) -> usize {
        self.indices_to_vertices.len() / self.topology.indices_per_primitive()
    }

    pub fn is_empty(&self) -> bool {
        self.indices_to_vertices.is_empty()
    }

    /// Returns the index of the pushed vertex
    pub fn push_position(&mut self, position: RenderPosition) -> usize {
        self.vertices_positions.push(position);
        self.vertices_positions.len() - 1
    }

    pub fn push_indices(&mut self, indexi: [usize; 3]) {
        self.indices_to_vertices.push(indexi[0] as u32);
        self.indices_to_vertices.push(indexi[1] as u32);
        self.indices_to_vertices.push(indexi[2] as u32);
    }

    pub fn push_line(&mut self, from: usize, to: usize) {
        self.indices_to_vertices.push(from as u32);
        self.indices_to_vertices.push(to as u32);
    }

    /// Three fresh vertices, no sharing with earlier triangles
    pub fn push_triangle(&mut self, corners: [RenderPosition; 3]) {
        let index = self.push_position(corners[0]);
        self.push_position(corners[1]);
        self.push_position(corners[2]);
        self.push_indices([index, index + 1, index + 2]);
    }

    pub fn triangles(&self) -> impl Iterator<Item = [RenderPosition; 3]> + '_ {
        self.indices_to_vertices.chunks_exact(3).map(|corner| {
            [
                self.vertices_positions[corner[0] as usize],
                self.vertices_positions[corner[1] as usize],
                self.vertices_positions[corner[2] as usize],
            ]
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum LodDetail {
    Far,
    Near,
}

/// One level of window detail. The renderer shows it while the camera distance is in `switch_out..switch_in`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WindowTier {
    pub detail: LodDetail,
    pub switch_in: f32,
    pub switch_out: f32,
    pub mesh: OsmMesh,
}

/// All meshes of one building, sharing one color
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BuildingMeshes {
    pub id: u64,
    pub color: BuildingColor,
    pub walls: OsmMesh,
    pub roof: OsmMesh,
    pub windows: Vec<WindowTier>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum FurnitureKind {
    StreetLamp,
    TrafficLight,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FurniturePlacement {
    pub position: GroundPosition,
    pub kind: FurnitureKind,
    // index of the polyline vertex
    pub index: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RoadMeshes {
    pub id: u64,
    pub line: OsmMesh,
    pub thickness: f32,
    pub furniture: Vec<FurniturePlacement>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WaterMeshes {
    pub id: u64,
    pub fill: OsmMesh,
}

/// Receives the fully built meshes of a scene. The builders never see the renderer.
pub trait SceneSink {
    fn add_building(&mut self, building: BuildingMeshes);
    fn add_road(&mut self, road: RoadMeshes);
    fn add_water(&mut self, water: WaterMeshes);
}

/// A sink just keeping everything, e.g. to write it as json
#[derive(Clone, Debug, Default, Serialize)]
pub struct SceneMeshes {
    pub buildings: Vec<BuildingMeshes>,
    pub roads: Vec<RoadMeshes>,
    pub water: Vec<WaterMeshes>,
}

impl SceneMeshes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mesh_count(&self) -> usize {
        self.buildings
            .iter()
            .map(|building| 2 + building.windows.len())
            .sum::<usize>()
            + self.roads.len()
            + self.water.len()
    }

    pub fn furniture_count(&self, kind: FurnitureKind) -> usize {
        self.roads
            .iter()
            .flat_map(|road| road.furniture.iter())
            .filter(|placement| placement.kind == kind)
            .count()
    }
}

impl SceneSink for SceneMeshes {
    fn add_building(&mut self, building: BuildingMeshes) {
        self.buildings.push(building);
    }

    fn add_road(&mut self, road: RoadMeshes) {
        self.roads.push(road);
    }

    fn add_water(&mut self, water: WaterMeshes) {
        self.water.push(water);
    }
}
