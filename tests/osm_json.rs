use approx::assert_relative_eq;
use osm_scene::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// A small map.json: one building, one road, a lake with an island, a building with a missing node
static MAP_JSON: &str = r#"{
  "version": "0.6",
  "elements": [
    {"type": "node", "id": 1, "lat": 34.0000, "lon": -118.5000},
    {"type": "node", "id": 2, "lat": 34.0000, "lon": -118.4999},
    {"type": "node", "id": 3, "lat": 34.0001, "lon": -118.4999},
    {"type": "node", "id": 4, "lat": 34.0001, "lon": -118.5000},
    {"type": "node", "id": 10, "lat": 34.0002, "lon": -118.5000},
    {"type": "node", "id": 11, "lat": 34.0002, "lon": -118.4995},
    {"type": "node", "id": 12, "lat": 34.0003, "lon": -118.4990},
    {"type": "node", "id": 20, "lat": 34.0010, "lon": -118.5010},
    {"type": "node", "id": 21, "lat": 34.0010, "lon": -118.5000},
    {"type": "node", "id": 22, "lat": 34.0020, "lon": -118.5000},
    {"type": "node", "id": 23, "lat": 34.0020, "lon": -118.5010},
    {"type": "node", "id": 30, "lat": 34.0014, "lon": -118.5006},
    {"type": "node", "id": 31, "lat": 34.0014, "lon": -118.5004},
    {"type": "node", "id": 32, "lat": 34.0016, "lon": -118.5004},
    {"type": "node", "id": 33, "lat": 34.0016, "lon": -118.5006},
    {"type": "way", "id": 100, "nodes": [1, 2, 3, 4, 1], "tags": {"building": "yes"}},
    {"type": "way", "id": 101, "nodes": [10, 11, 12], "tags": {"highway": "residential"}},
    {"type": "way", "id": 102, "nodes": [1, 2, 99, 1], "tags": {"building": "house"}},
    {"type": "way", "id": 103, "nodes": [1, 2, 3], "tags": {"building": "yes"}},
    {"type": "way", "id": 104, "nodes": [1, 2, 3, 4, 1], "tags": {"building": "no"}},
    {"type": "way", "id": 200, "nodes": [20, 21, 22, 23, 20]},
    {"type": "way", "id": 201, "nodes": [30, 31, 32, 33, 30]},
    {"type": "relation", "id": 300,
     "members": [
       {"type": "way", "ref": 200, "role": "outer"},
       {"type": "way", "ref": 201, "role": "inner"}
     ],
     "tags": {"type": "multipolygon", "natural": "water"}}
  ]
}"#;

#[test]
fn elements_are_sorted_into_layers() {
    let origin = GeographicCoordinates::new(34.0, -118.5);
    let input = scan_json_to_scene(MAP_JSON.as_bytes(), Some(origin)).unwrap();

    assert_eq!(input.origin, origin);
    let building_ids: Vec<u64> = input.buildings.iter().map(|item| item.id).collect();
    assert_eq!(building_ids, vec![100]);
    assert_eq!(input.roads.len(), 1);
    assert_eq!(input.roads[0].geometry.kind(), GeometryKind::LineString);

    assert_eq!(input.water.len(), 1);
    let Geometry::MultiPolygon(polygons) = &input.water[0].geometry else {
        panic!("lake is not a multipolygon");
    };
    assert_eq!(polygons.len(), 1);
    assert_eq!(polygons[0].holes.len(), 1);
}

#[test]
fn origin_defaults_to_the_center() {
    let input = scan_json_to_scene(MAP_JSON.as_bytes(), None).unwrap();
    assert_relative_eq!(input.origin.latitude, 34.0010, epsilon = 1e-9);
    assert_relative_eq!(input.origin.longitude, -118.5000, epsilon = 1e-9);
}

#[test]
fn json_to_meshes() {
    let origin = GeographicCoordinates::new(34.0, -118.5);
    let input = scan_json_to_scene(MAP_JSON.as_bytes(), Some(origin)).unwrap();
    let report = build_scene(
        &input,
        &SceneConfig::default(),
        &mut ChaCha8Rng::seed_from_u64(5),
    );
    assert_eq!(report.summary().failed, 0);

    let mut scene = SceneMeshes::new();
    report.hand_off(&mut scene);

    // 10 x 10 units
    let building = &scene.buildings[0];
    assert_eq!(building.walls.vertex_count(), 8);
    let roof_area: f32 = building
        .roof
        .triangles()
        .map(|[a, b, c]| ((b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1])).abs() / 2.)
        .sum();
    assert_relative_eq!(roof_area, 100.0, epsilon = 0.5);

    // the island stays dry: 100 x 100 lake minus a 20 x 20 island
    let lake_area: f32 = scene.water[0]
        .fill
        .triangles()
        .map(|[a, b, c]| ((b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1])).abs() / 2.)
        .sum();
    assert_relative_eq!(lake_area, 9600.0, epsilon = 10.0);

    assert_eq!(scene.roads[0].line.vertex_count(), 3);
}
