use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::error::InputError;
use crate::kernel_in::{
    BoundingBox, GeoPolygon, GeographicCoordinates, Geometry, MapItem, SceneInput,
};

///////////////////////////////////////////////////////////////////////////////////////////////////
// JSON ///////////////////////////////////////////////////////////////////////////////////////////

// Reads the json of the OSM API 0.6 (map.json) or of Overpass (out json). Downloading is not done here.

pub type OsmMap = HashMap<String, String>;

static NO: &str = "no";

#[derive(Deserialize, Debug, Clone)]
pub struct JsonMember {
    #[serde(rename = "type")]
    pub member_type: String,
    #[serde(rename = "ref")]
    pub reference: u64,
    #[serde(default)]
    pub role: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct JsonElement {
    pub id: u64,
    #[serde(rename = "type")]
    pub element_type: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub nodes: Option<Vec<u64>>,
    pub members: Option<Vec<JsonMember>>,
    pub tags: Option<OsmMap>,
}

#[derive(Deserialize, Debug)]
pub struct JsonData {
    pub elements: Vec<JsonElement>,
}

pub fn tags_get_yes<'a>(tags: &'a OsmMap, key: &str) -> Option<&'a String> {
    tags.get(key).filter(|value| value.as_str() != NO)
}

pub fn is_building(tags: &OsmMap) -> bool {
    tags_get_yes(tags, "building").is_some()
}

pub fn is_road(tags: &OsmMap) -> bool {
    tags_get_yes(tags, "highway").is_some()
}

pub fn is_water(tags: &OsmMap) -> bool {
    tags.get("natural").is_some_and(|value| value == "water")
        || tags.get("waterway").is_some_and(|value| value == "riverbank")
        || tags_get_yes(tags, "water").is_some()
}

pub fn read_scene_file(
    path: impl AsRef<Path>,
    origin: Option<GeographicCoordinates>,
) -> Result<SceneInput, InputError> {
    let bytes = std::fs::read(path)?;
    scan_json_to_scene(&bytes, origin)
}

pub fn scan_json_to_scene(
    bytes: &[u8],
    origin: Option<GeographicCoordinates>,
) -> Result<SceneInput, InputError> {
    let json_data: JsonData = serde_json::from_slice(bytes)?;
    scan_json_data(json_data, origin)
}

/// Sorts the elements into buildings, roads and water. Without an origin, the center of all nodes is used.
pub fn scan_json_data(
    json_data: JsonData,
    origin: Option<GeographicCoordinates>,
) -> Result<SceneInput, InputError> {
    let mut osm2scene = Osm2Scene::default();
    for element in json_data.elements {
        match element.element_type.as_str() {
            "node" => match (element.lat, element.lon) {
                (Some(latitude), Some(longitude)) => osm2scene.add_node(element.id, latitude, longitude),
                _ => tracing::warn!("node {} without coordinates", element.id),
            },

            "way" => osm2scene.add_way(
                element.id,
                element.nodes.unwrap_or_default(),
                element.tags.unwrap_or_default(),
            ),

            "relation" => osm2scene.add_relation(
                element.id,
                element.members.unwrap_or_default(),
                element.tags.unwrap_or_default(),
            ),

            _ => tracing::warn!(
                "Unknown element type: {}  id: {}",
                element.element_type,
                element.id
            ),
        }
    }

    let origin = match origin {
        Some(origin) => origin,
        None if osm2scene.bounding_box.is_empty() => return Err(InputError::NoOrigin),
        None => osm2scene.bounding_box.center_as_geographic_coordinates(),
    };

    let scene = osm2scene.into_scene(origin);
    tracing::info!(
        "input: {} buildings, {} roads, {} water bodies",
        scene.buildings.len(),
        scene.roads.len(),
        scene.water.len()
    );
    Ok(scene)
}

//////////////////////////////// Osm2Scene //////////////////////////////

struct OsmWay {
    id: u64,
    nodes: Vec<u64>,
    tags: OsmMap,
}

impl OsmWay {
    fn is_closed(&self) -> bool {
        self.nodes.len() >= 4 && self.nodes.first() == self.nodes.last()
    }
}

struct OsmRelation {
    id: u64,
    members: Vec<JsonMember>,
    tags: OsmMap,
}

#[derive(Default)]
struct Osm2Scene {
    bounding_box: BoundingBox,
    nodes_map: HashMap<u64, GeographicCoordinates>,
    // in the order of the input
    ways: Vec<OsmWay>,
    ways_index: HashMap<u64, usize>,
    relations: Vec<OsmRelation>,
}

impl Osm2Scene {
    fn add_node(&mut self, id: u64, latitude: f64, longitude: f64) {
        let coordinates = GeographicCoordinates::new(latitude, longitude);
        self.bounding_box.include(&coordinates);
        self.nodes_map.insert(id, coordinates);
    }

    fn add_way(&mut self, id: u64, nodes: Vec<u64>, tags: OsmMap) {
        self.ways_index.insert(id, self.ways.len());
        self.ways.push(OsmWay { id, nodes, tags });
    }

    fn add_relation(&mut self, id: u64, members: Vec<JsonMember>, tags: OsmMap) {
        self.relations.push(OsmRelation { id, members, tags });
    }

    fn way_coordinates(&self, way: &OsmWay) -> Option<Vec<GeographicCoordinates>> {
        let mut coordinates = Vec::with_capacity(way.nodes.len());
        for node_id in &way.nodes {
            match self.nodes_map.get(node_id) {
                Some(node) => coordinates.push(*node),
                None => {
                    tracing::warn!("way {} references the missing node {}", way.id, node_id);
                    return None;
                }
            }
        }
        Some(coordinates)
    }

    fn closed_polygon(&self, way: &OsmWay) -> Option<GeoPolygon> {
        if !way.is_closed() {
            tracing::debug!("Not a closed way id: {}", way.id);
            return None;
        }
        self.way_coordinates(way).map(GeoPolygon::new)
    }

    fn is_area_relation(relation: &OsmRelation) -> bool {
        relation.tags.get("type").map(String::as_str) == Some("multipolygon")
            && (is_building(&relation.tags) || is_water(&relation.tags))
    }

    // Water ways drawn as part of a water relation are not drawn again on their own.
    // Building relations are skipped by the builder, their ways stay.
    fn water_relation_ways(&self) -> HashSet<u64> {
        self.relations
            .iter()
            .filter(|relation| Self::is_area_relation(relation) && !is_building(&relation.tags))
            .flat_map(|relation| relation.members.iter())
            .filter(|member| member.member_type == "way")
            .map(|member| member.reference)
            .collect()
    }

    fn into_scene(self, origin: GeographicCoordinates) -> SceneInput {
        let mut scene = SceneInput::new(origin);
        let water_relation_ways = self.water_relation_ways();

        for way in &self.ways {
            if is_building(&way.tags) {
                if let Some(polygon) = self.closed_polygon(way) {
                    scene
                        .buildings
                        .push(MapItem::new(way.id, Geometry::Polygon(polygon)));
                }
            } else if is_road(&way.tags) {
                if let Some(points) = self.way_coordinates(way) {
                    scene
                        .roads
                        .push(MapItem::new(way.id, Geometry::LineString(points)));
                }
            } else if is_water(&way.tags) {
                if water_relation_ways.contains(&way.id) {
                    tracing::debug!("way {} is drawn by its relation", way.id);
                } else if let Some(polygon) = self.closed_polygon(way) {
                    scene
                        .water
                        .push(MapItem::new(way.id, Geometry::Polygon(polygon)));
                }
            }
        }

        for relation in &self.relations {
            if !Self::is_area_relation(relation) {
                continue;
            }
            let item = MapItem::new(
                relation.id,
                Geometry::MultiPolygon(self.multipolygon(relation)),
            );
            if is_building(&relation.tags) {
                scene.buildings.push(item);
            } else if is_water(&relation.tags) {
                scene.water.push(item);
            }
        }

        scene
    }

    // Closed outer ways become polygons, closed inner ways the holes of the outer around them.
    // todo: join outer ways, split into several segments
    fn multipolygon(&self, relation: &OsmRelation) -> Vec<GeoPolygon> {
        let mut polygons = Vec::new();
        let mut inners = Vec::new();
        for member in &relation.members {
            if member.member_type != "way" {
                continue;
            }
            let Some(way) = self.ways_index.get(&member.reference).map(|&i| &self.ways[i]) else {
                tracing::warn!("relation {} misses the way {}", relation.id, member.reference);
                continue;
            };
            let Some(polygon) = self.closed_polygon(way) else {
                continue;
            };
            match member.role.as_str() {
                "inner" => inners.push(polygon.outer),
                _ => polygons.push(polygon),
            }
        }

        for inner in inners {
            let Some(first) = inner.first() else { continue };
            match polygons
                .iter_mut()
                .find(|polygon| contains(&polygon.outer, first))
            {
                Some(polygon) => polygon.holes.push(inner),
                None => tracing::debug!("relation {}: inner ring outside all outers", relation.id),
            }
        }
        polygons
    }
}

// Ray casting, longitude as x
fn contains(ring: &[GeographicCoordinates], point: &GeographicCoordinates) -> bool {
    let mut inside = false;
    let count = ring.len();
    for index in 0..count {
        let a = ring[index];
        let b = ring[(index + count - 1) % count];
        if (a.latitude > point.latitude) != (b.latitude > point.latitude) {
            let longitude = a.longitude
                + (point.latitude - a.latitude) / (b.latitude - a.latitude)
                    * (b.longitude - a.longitude);
            if point.longitude < longitude {
                inside = !inside;
            }
        }
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_in_ring() {
        let ring: Vec<_> = [(0., 0.), (0., 2.), (2., 2.), (2., 0.), (0., 0.)]
            .iter()
            .map(|(latitude, longitude)| GeographicCoordinates::new(*latitude, *longitude))
            .collect();
        assert!(contains(&ring, &GeographicCoordinates::new(1.0, 1.0)));
        assert!(!contains(&ring, &GeographicCoordinates::new(3.0, 1.0)));
    }

    #[test]
    fn tag_tactics() {
        let tags: OsmMap = [("building".to_string(), "no".to_string())].into();
        assert!(!is_building(&tags));
        let tags: OsmMap = [("natural".to_string(), "water".to_string())].into();
        assert!(is_water(&tags));
        let tags: OsmMap = [("highway".to_string(), "residential".to_string())].into();
        assert!(is_road(&tags));
    }

    #[test]
    fn lake_way_of_a_lake_relation_is_drawn_once() {
        let json = br#"{"elements": [
            {"type": "node", "id": 1, "lat": 0.0, "lon": 0.0},
            {"type": "node", "id": 2, "lat": 0.0, "lon": 0.001},
            {"type": "node", "id": 3, "lat": 0.001, "lon": 0.001},
            {"type": "node", "id": 4, "lat": 0.001, "lon": 0.0},
            {"type": "way", "id": 10, "nodes": [1, 2, 3, 4, 1], "tags": {"natural": "water"}},
            {"type": "way", "id": 11, "nodes": [1, 2, 3, 4, 1], "tags": {"natural": "water"}},
            {"type": "relation", "id": 20,
             "members": [{"type": "way", "ref": 10, "role": "outer"}],
             "tags": {"type": "multipolygon", "natural": "water"}},
            {"type": "way", "id": 12, "nodes": [1, 2, 3, 4, 1], "tags": {"building": "yes"}},
            {"type": "relation", "id": 21,
             "members": [{"type": "way", "ref": 12, "role": "outer"}],
             "tags": {"type": "multipolygon", "building": "yes"}}
        ]}"#;
        let scene = scan_json_to_scene(json, None).unwrap();
        let ids: Vec<u64> = scene.water.iter().map(|item| item.id).collect();
        assert_eq!(ids, vec![11, 20]);
        // building relations are not built, so their ways are
        let ids: Vec<u64> = scene.buildings.iter().map(|item| item.id).collect();
        assert_eq!(ids, vec![12, 21]);
    }

    #[test]
    fn no_nodes_no_origin() {
        let result = scan_json_to_scene(br#"{"elements": []}"#, None);
        assert!(matches!(result, Err(InputError::NoOrigin)));
    }

    #[test]
    fn broken_json() {
        let result = scan_json_to_scene(b"{ not json", None);
        assert!(matches!(result, Err(InputError::Json(_))));
    }
}
