use crate::kernel_out::{
    BuildingMeshes, FurnitureKind, MeshTag, OsmMesh, RenderColor, RoadMeshes, SceneSink,
    Topology, WaterMeshes,
};

///////////////////////////////////////////////////////////////////////////////////////////////////
// BEVY ///////////////////////////////////////////////////////////////////////////////////////////

use bevy::prelude::*;
use bevy::render::{
    mesh::Indices, render_asset::RenderAssetUsages, render_resource::PrimitiveTopology,
};

// Street furniture, in world units above the road
static LAMP_POST_HEIGHT: f32 = 1.0;
static TRAFFIC_LIGHT_POST_HEIGHT: f32 = 0.6;
static POST_WIDTH: f32 = 0.1;
static LIGHT_RADIUS: f32 = 0.05;

// Marks the spawned meshes for the picking of the renderer
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct SceneTag(pub MeshTag);

/// A window tier is shown while the camera distance to `center` is in `switch_out..switch_in`
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct LodSwitch {
    pub switch_in: f32,
    pub switch_out: f32,
    pub center: Vec3,
}

impl LodSwitch {
    pub fn shows_at(&self, distance: f32) -> bool {
        self.switch_out <= distance && distance < self.switch_in
    }
}

/// The line mesh of a road. Bevy lines have no width, the thickness is kept for the renderer.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct RoadLine {
    pub id: u64,
    pub thickness: f32,
}

// Marks the post of a street lamp or traffic light
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct StreetFurniture {
    pub kind: FurnitureKind,
    pub road: u64,
}

pub struct BevyMeshPart {
    pub mesh: Mesh,
    pub alpha_mode: AlphaMode,
    pub tag: Option<MeshTag>,
    pub lod: Option<LodSwitch>,
    pub road: Option<RoadLine>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BevyFurniture {
    pub kind: FurnitureKind,
    pub road: u64,
    // foot of the post, Bevy frame
    pub translation: Vec3,
}

// east, up, -north
fn to_bevy_position([east, north, up]: [f32; 3]) -> [f32; 3] {
    [east, up, -north]
}

/// Our frame is z up, Bevy is y up with -z as north
pub fn to_bevy_mesh(osm_mesh: &OsmMesh) -> Mesh {
    let topology = match osm_mesh.topology {
        Topology::TriangleList => PrimitiveTopology::TriangleList,
        Topology::LineList => PrimitiveTopology::LineList,
    };
    let positions: Vec<[f32; 3]> = osm_mesh
        .vertices_positions
        .iter()
        .map(|position| to_bevy_position(*position))
        .collect();
    let colors = vec![osm_mesh.color; positions.len()];

    let mut mesh = Mesh::new(
        topology,
        RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
    )
    .with_inserted_indices(Indices::U32(osm_mesh.indices_to_vertices.clone()))
    .with_inserted_attribute(Mesh::ATTRIBUTE_COLOR, colors)
    .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    if osm_mesh.topology == Topology::TriangleList {
        mesh.duplicate_vertices();
        mesh.compute_flat_normals();
    }
    mesh
}

// The walls and roofs are see through
fn alpha_mode(color: RenderColor) -> AlphaMode {
    if color[3] < 1.0 {
        AlphaMode::Blend
    } else {
        AlphaMode::Opaque
    }
}

fn center(osm_mesh: &OsmMesh) -> Vec3 {
    let count = osm_mesh.vertex_count().max(1) as f32;
    let sum = osm_mesh
        .vertices_positions
        .iter()
        .fold(Vec3::ZERO, |sum, position| {
            sum + Vec3::from_array(to_bevy_position(*position))
        });
    sum / count
}

fn part(osm_mesh: &OsmMesh) -> BevyMeshPart {
    BevyMeshPart {
        mesh: to_bevy_mesh(osm_mesh),
        alpha_mode: alpha_mode(osm_mesh.color),
        tag: osm_mesh.tag,
        lod: None,
        road: None,
    }
}

/// The color comes from the vertices, the material stays white
pub fn part_material(part: &BevyMeshPart) -> StandardMaterial {
    StandardMaterial {
        base_color: Color::WHITE,
        alpha_mode: part.alpha_mode,
        ..default()
    }
}

/// Sink converting each mesh into a Bevy mesh, ready to be spawned
#[derive(Resource, Default)]
pub struct BevyMeshes {
    pub parts: Vec<BevyMeshPart>,
    pub furniture: Vec<BevyFurniture>,
}

impl SceneSink for BevyMeshes {
    fn add_building(&mut self, building: BuildingMeshes) {
        self.parts.push(part(&building.walls));
        self.parts.push(part(&building.roof));
        for tier in &building.windows {
            self.parts.push(BevyMeshPart {
                lod: Some(LodSwitch {
                    switch_in: tier.switch_in,
                    switch_out: tier.switch_out,
                    center: center(&tier.mesh),
                }),
                ..part(&tier.mesh)
            });
        }
    }

    fn add_road(&mut self, road: RoadMeshes) {
        self.parts.push(BevyMeshPart {
            road: Some(RoadLine {
                id: road.id,
                thickness: road.thickness,
            }),
            ..part(&road.line)
        });
        let elevation = road
            .line
            .vertices_positions
            .first()
            .map_or(0.0, |position| position[2]);
        for placement in &road.furniture {
            self.furniture.push(BevyFurniture {
                kind: placement.kind,
                road: road.id,
                translation: Vec3::from_array(to_bevy_position(
                    placement.position.to_render_position(elevation),
                )),
            });
        }
    }

    fn add_water(&mut self, water: WaterMeshes) {
        self.parts.push(part(&water.fill));
    }
}

/// Post height, post color and the lights (height, color) of a kind of furniture
pub fn furniture_style(kind: FurnitureKind) -> (f32, Color, Vec<(f32, Color)>) {
    match kind {
        FurnitureKind::StreetLamp => (
            LAMP_POST_HEIGHT,
            Color::srgb(0.5, 0.5, 0.5),
            vec![(LAMP_POST_HEIGHT, Color::WHITE)],
        ),
        FurnitureKind::TrafficLight => (
            TRAFFIC_LIGHT_POST_HEIGHT,
            Color::BLACK,
            vec![
                (0.6, Color::srgb(1.0, 0.0, 0.0)),
                (0.5, Color::srgb(1.0, 1.0, 0.0)),
                (0.4, Color::srgb(0.0, 1.0, 0.0)),
            ],
        ),
    }
}

fn spawn_furniture(
    furniture: &BevyFurniture,
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    let (post_height, post_color, lights) = furniture_style(furniture.kind);
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(POST_WIDTH, post_height, POST_WIDTH))),
        MeshMaterial3d(materials.add(post_color)),
        Transform::from_translation(furniture.translation + Vec3::Y * post_height / 2.),
        StreetFurniture {
            kind: furniture.kind,
            road: furniture.road,
        },
    ));

    for (height, color) in lights {
        let translation = furniture.translation + Vec3::Y * height;
        commands.spawn((
            Mesh3d(meshes.add(Sphere::new(LIGHT_RADIUS))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: color,
                emissive: LinearRgba::from(color),
                ..default()
            })),
            Transform::from_translation(translation),
        ));
        if furniture.kind == FurnitureKind::StreetLamp {
            commands.spawn((
                PointLight {
                    color: Color::WHITE,
                    ..default()
                },
                Transform::from_translation(translation),
            ));
        }
    }
}

pub fn spawn_bevy_meshes(
    scene: BevyMeshes,
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    for furniture in &scene.furniture {
        spawn_furniture(furniture, commands, meshes, materials);
    }
    for part in scene.parts {
        let material = materials.add(part_material(&part));
        let mut entity = commands.spawn((Mesh3d(meshes.add(part.mesh)), MeshMaterial3d(material)));
        if let Some(tag) = part.tag {
            entity.insert(SceneTag(tag));
        }
        if let Some(lod) = part.lod {
            entity.insert(lod);
        }
        if let Some(road) = part.road {
            entity.insert(road);
        }
    }
}

fn spawn_scene(
    mut commands: Commands,
    mut scene: ResMut<BevyMeshes>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let scene = std::mem::take(&mut *scene);
    tracing::info!(
        "spawning {} meshes and {} pieces of furniture",
        scene.parts.len(),
        scene.furniture.len()
    );
    spawn_bevy_meshes(scene, &mut commands, &mut meshes, &mut materials);
}

// The nearest 3D camera decides
fn switch_window_tiers(
    cameras: Query<&GlobalTransform, With<Camera3d>>,
    mut tiers: Query<(&LodSwitch, &mut Visibility)>,
) {
    let Some(camera) = cameras.iter().next() else {
        return;
    };
    let eye = camera.translation();
    for (lod, mut visibility) in &mut tiers {
        let wanted = if lod.shows_at(eye.distance(lod.center)) {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
        visibility.set_if_neq(wanted);
    }
}

/// Spawns the `BevyMeshes` resource at startup and switches the window tiers by camera distance
pub struct OsmScenePlugin;

impl Plugin for OsmScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<BevyMeshes>()
            .add_systems(Startup, spawn_scene)
            .add_systems(Update, switch_window_tiers);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneConfig;
    use crate::kernel_in::GroundPosition;
    use crate::road_3d::build_road;

    fn road() -> RoadMeshes {
        let points: Vec<GroundPosition> = (0..11)
            .map(|index| GroundPosition::new(index as f32, 3.0))
            .collect();
        build_road(4, &points, &SceneConfig::default()).unwrap()
    }

    #[test]
    fn north_becomes_minus_z() {
        let mut osm_mesh = OsmMesh::new("road", Topology::LineList, [1.0; 4]);
        osm_mesh.push_position([1.0, 2.0, 0.1]);
        osm_mesh.push_position([3.0, 4.0, 0.1]);
        osm_mesh.push_line(0, 1);
        let mesh = to_bevy_mesh(&osm_mesh);
        assert_eq!(mesh.count_vertices(), 2);
        assert_eq!(mesh.primitive_topology(), PrimitiveTopology::LineList);
        assert_eq!(to_bevy_position([1.0, 2.0, 0.1]), [1.0, 0.1, -2.0]);
    }

    #[test]
    fn material_is_white_the_vertices_carry_the_color() {
        let osm_mesh = OsmMesh::new("walls", Topology::TriangleList, [0.2, 0.7, 0.9, 0.5]);
        let material = part_material(&part(&osm_mesh));
        assert_eq!(material.base_color, Color::WHITE);
        assert_eq!(material.alpha_mode, AlphaMode::Blend);

        let opaque = OsmMesh::new("water", Topology::TriangleList, [0.1, 0.35, 0.8, 1.0]);
        assert_eq!(part_material(&part(&opaque)).alpha_mode, AlphaMode::Opaque);
    }

    #[test]
    fn road_keeps_thickness_and_furniture() {
        let mut sink = BevyMeshes::default();
        sink.add_road(road());
        assert_eq!(sink.parts.len(), 1);
        assert_eq!(
            sink.parts[0].road,
            Some(RoadLine {
                id: 4,
                thickness: 2.0
            })
        );

        // lamps at 0, 5, 10, traffic lights at 0, 10
        let lamps = sink
            .furniture
            .iter()
            .filter(|furniture| furniture.kind == FurnitureKind::StreetLamp)
            .count();
        assert_eq!(lamps, 3);
        assert_eq!(sink.furniture.len(), 5);
        let first = sink.furniture[0];
        assert_eq!(first.road, 4);
        assert!((first.translation - Vec3::new(0.0, 0.1, -3.0)).length() < 1e-6);
    }

    #[test]
    fn traffic_light_has_three_lights() {
        let (_, _, lights) = furniture_style(FurnitureKind::TrafficLight);
        assert_eq!(lights.len(), 3);
        let (_, _, lights) = furniture_style(FurnitureKind::StreetLamp);
        assert_eq!(lights.len(), 1);
    }

    #[test]
    fn window_tiers_switch_by_distance() {
        let far = LodSwitch {
            switch_in: 500.0,
            switch_out: 200.0,
            center: Vec3::ZERO,
        };
        let near = LodSwitch {
            switch_in: 200.0,
            switch_out: 0.0,
            center: Vec3::ZERO,
        };
        assert!(far.shows_at(300.0) && !near.shows_at(300.0));
        assert!(near.shows_at(50.0) && !far.shows_at(50.0));
        assert!(!far.shows_at(800.0));
    }

    #[test]
    fn building_parts_carry_the_lod() {
        let ring: Vec<GroundPosition> = [(0., 0.), (4., 0.), (4., 3.), (0., 3.)]
            .iter()
            .map(|(east, north)| GroundPosition::new(*east, *north))
            .collect();
        let footprint = crate::shape::Footprint::from_ring(&ring).unwrap();
        let color = crate::tagticks::BuildingColor {
            r: 0.2,
            g: 0.6,
            b: 0.9,
        };
        let building =
            crate::building_3d::build_building(1, &footprint, &SceneConfig::default(), color)
                .unwrap();

        let mut sink = BevyMeshes::default();
        sink.add_building(building);
        assert_eq!(sink.parts.len(), 4);
        assert!(sink.parts[..2].iter().all(|part| part.lod.is_none()));
        let lods: Vec<LodSwitch> = sink.parts.iter().filter_map(|part| part.lod).collect();
        assert_eq!(lods.len(), 2);
        assert_eq!((lods[0].switch_in, lods[0].switch_out), (500.0, 200.0));
        // the windows stand around the middle of the footprint
        assert!((lods[0].center.x - 2.0).abs() < 1e-3);
        assert!((lods[0].center.z + 1.5).abs() < 1e-3);
    }

    #[test]
    fn plugin_spawns_the_scene() {
        let mut sink = BevyMeshes::default();
        sink.add_road(road());

        let mut app = App::new();
        app.init_resource::<Assets<Mesh>>()
            .init_resource::<Assets<StandardMaterial>>()
            .insert_resource(sink)
            .add_plugins(OsmScenePlugin);
        app.update();

        let world = app.world_mut();
        let roads = world.query::<&RoadLine>().iter(world).count();
        assert_eq!(roads, 1);
        let furniture = world.query::<&StreetFurniture>().iter(world).count();
        assert_eq!(furniture, 5);
        let lamps = world.query::<&PointLight>().iter(world).count();
        assert_eq!(lamps, 3);
    }
}
