// Internal Interface of the crate/lib between input modules and the mesh builders

use serde::{Deserialize, Serialize};

// Geographic degree deltas are magnified into world units. Not a geodetic projection,
// a local flat-earth approximation, only valid near the origin.
pub static SCALE: f64 = 100000.0;

// Floating ground position, the precision of the GPU
pub type FGP = f32;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeographicCoordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeographicCoordinates {
    pub const ZERO: Self = Self {
        latitude: 0.0,
        longitude: 0.0,
    };

    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Projects a point into the local frame with `self` as the origin
    pub fn coordinates_to_position(&self, latitude: f64, longitude: f64) -> GroundPosition {
        GroundPosition {
            north: ((latitude - self.latitude) * SCALE) as FGP,
            east: ((longitude - self.longitude) * SCALE) as FGP,
        }
    }

    pub fn project(&self, point: &GeographicCoordinates) -> GroundPosition {
        self.coordinates_to_position(point.latitude, point.longitude)
    }

    pub fn project_all(&self, points: &[GeographicCoordinates]) -> GroundPositions {
        points.iter().map(|point| self.project(point)).collect()
    }
}

/// `project(point, origin)`, the free form of `GeographicCoordinates::project`
pub fn project(point: &GeographicCoordinates, origin: &GeographicCoordinates) -> GroundPosition {
    origin.project(point)
}

// east is x, north is y
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroundPosition {
    pub east: FGP,
    pub north: FGP,
}

pub type GroundPositions = Vec<GroundPosition>;

impl GroundPosition {
    /// Shorthand for writing `GroundPosition::new(0.0, 0.0)`.
    pub const ZERO: Self = Self {
        north: 0.0,
        east: 0.0,
    };

    pub fn new(east: FGP, north: FGP) -> Self {
        Self { east, north }
    }

    pub fn is_finite(&self) -> bool {
        self.east.is_finite() && self.north.is_finite()
    }

    // z is up in the local frame
    pub fn to_render_position(self, height: f32) -> [f32; 3] {
        [self.east, self.north, height]
    }
}

impl std::fmt::Display for GroundPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.east, self.north)
    }
}

#[derive(Clone, Debug)]
pub struct BoundingBox {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new()
    }
}

impl BoundingBox {
    pub fn new() -> Self {
        BoundingBox {
            north: f64::MIN,
            south: f64::MAX,
            east: f64::MIN,
            west: f64::MAX,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.north < self.south
    }

    pub fn include(&mut self, coordinates: &GeographicCoordinates) {
        self.north = self.north.max(coordinates.latitude);
        self.south = self.south.min(coordinates.latitude);
        self.east = self.east.max(coordinates.longitude);
        self.west = self.west.min(coordinates.longitude);
    }

    pub fn center_as_geographic_coordinates(&self) -> GeographicCoordinates {
        GeographicCoordinates {
            latitude: self.south + (self.north - self.south) / 2.,
            longitude: self.west + (self.east - self.west) / 2.,
        }
    }
}

// A polygon in lon/lat: first ring outer, all others holes. Rings may repeat the first point at the end.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeoPolygon {
    pub outer: Vec<GeographicCoordinates>,
    pub holes: Vec<Vec<GeographicCoordinates>>,
}

impl GeoPolygon {
    pub fn new(outer: Vec<GeographicCoordinates>) -> Self {
        Self {
            outer,
            holes: Vec::new(),
        }
    }
}

/// Geometry of one map item, as delivered by the map-data side
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Point(GeographicCoordinates),
    LineString(Vec<GeographicCoordinates>),
    Polygon(GeoPolygon),
    MultiPolygon(Vec<GeoPolygon>),
}

impl Geometry {
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Point(_) => GeometryKind::Point,
            Geometry::LineString(_) => GeometryKind::LineString,
            Geometry::Polygon(_) => GeometryKind::Polygon,
            Geometry::MultiPolygon(_) => GeometryKind::MultiPolygon,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeometryKind {
    Point,
    LineString,
    Polygon,
    MultiPolygon,
}

impl std::fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GeometryKind::Point => "Point",
            GeometryKind::LineString => "LineString",
            GeometryKind::Polygon => "Polygon",
            GeometryKind::MultiPolygon => "MultiPolygon",
        };
        write!(f, "{name}")
    }
}

/// One map item with the OSM id it came from (0 if unknown)
#[derive(Clone, Debug, PartialEq)]
pub struct MapItem {
    pub id: u64,
    pub geometry: Geometry,
}

impl MapItem {
    pub fn new(id: u64, geometry: Geometry) -> Self {
        Self { id, geometry }
    }
}

/// Everything one scene-build pass consumes
#[derive(Clone, Debug)]
pub struct SceneInput {
    pub origin: GeographicCoordinates,
    pub buildings: Vec<MapItem>,
    pub roads: Vec<MapItem>,
    pub water: Vec<MapItem>,
}

impl SceneInput {
    pub fn new(origin: GeographicCoordinates) -> Self {
        Self {
            origin,
            buildings: Vec::new(),
            roads: Vec::new(),
            water: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.buildings.is_empty() && self.roads.is_empty() && self.water.is_empty()
    }
}
