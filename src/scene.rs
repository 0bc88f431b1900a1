// One scene-build pass: buildings, then roads, then water. Every item gets its own result.

use rand::Rng;

use crate::building_3d::build_building;
use crate::config::SceneConfig;
use crate::error::GeometryError;
use crate::kernel_in::{GeographicCoordinates, Geometry, GeometryKind, MapItem, SceneInput};
use crate::kernel_out::{BuildingMeshes, RoadMeshes, SceneSink, WaterMeshes};
use crate::road_3d::build_road;
use crate::shape::Footprint;
use crate::tagticks::BuildingColor;
use crate::water_3d::{WaterPart, build_water};

#[derive(Clone, Debug, PartialEq)]
pub enum Outcome<T> {
    Built(T),
    // not a geometry this builder handles, not an error
    Skipped(GeometryKind),
    Failed(GeometryError),
}

impl<T> Outcome<T> {
    fn from_result(result: Result<T, GeometryError>) -> Self {
        match result {
            Ok(built) => Outcome::Built(built),
            Err(error) => Outcome::Failed(error),
        }
    }

    pub fn is_built(&self) -> bool {
        matches!(self, Outcome::Built(_))
    }

    pub fn built(self) -> Option<T> {
        match self {
            Outcome::Built(built) => Some(built),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ItemResult<T> {
    pub id: u64,
    pub outcome: Outcome<T>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SceneSummary {
    pub built: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl SceneSummary {
    fn count<T>(&mut self, results: &[ItemResult<T>]) {
        for result in results {
            match result.outcome {
                Outcome::Built(_) => self.built += 1,
                Outcome::Skipped(_) => self.skipped += 1,
                Outcome::Failed(_) => self.failed += 1,
            }
        }
    }
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} built, {} skipped, {} failed",
            self.built, self.skipped, self.failed
        )
    }
}

#[derive(Clone, Debug, Default)]
pub struct SceneReport {
    pub buildings: Vec<ItemResult<BuildingMeshes>>,
    pub roads: Vec<ItemResult<RoadMeshes>>,
    pub water: Vec<ItemResult<WaterMeshes>>,
}

impl SceneReport {
    pub fn summary(&self) -> SceneSummary {
        let mut summary = SceneSummary::default();
        summary.count(&self.buildings);
        summary.count(&self.roads);
        summary.count(&self.water);
        summary
    }

    pub fn failures(&self) -> Vec<(u64, &GeometryError)> {
        fn failed<T>(results: &[ItemResult<T>]) -> impl Iterator<Item = (u64, &GeometryError)> {
            results.iter().filter_map(|result| match &result.outcome {
                Outcome::Failed(error) => Some((result.id, error)),
                _ => None,
            })
        }
        failed(&self.buildings)
            .chain(failed(&self.roads))
            .chain(failed(&self.water))
            .collect()
    }

    /// Only fully built items reach the sink
    pub fn hand_off<S: SceneSink + ?Sized>(self, sink: &mut S) -> SceneSummary {
        let summary = self.summary();
        for building in self.buildings.into_iter().filter_map(|r| r.outcome.built()) {
            sink.add_building(building);
        }
        for road in self.roads.into_iter().filter_map(|r| r.outcome.built()) {
            sink.add_road(road);
        }
        for water in self.water.into_iter().filter_map(|r| r.outcome.built()) {
            sink.add_water(water);
        }
        summary
    }
}

pub fn build_scene<R: Rng + ?Sized>(
    input: &SceneInput,
    config: &SceneConfig,
    rng: &mut R,
) -> SceneReport {
    let origin = input.origin;
    let report = SceneReport {
        buildings: collect("building", &input.buildings, |item| {
            build_building_item(item, &origin, config, rng)
        }),
        roads: collect("road", &input.roads, |item| {
            build_road_item(item, &origin, config)
        }),
        water: collect("water", &input.water, |item| {
            build_water_item(item, &origin, config)
        }),
    };
    tracing::info!("scene: {}", report.summary());
    report
}

fn collect<T>(
    what: &str,
    items: &[MapItem],
    mut build: impl FnMut(&MapItem) -> Outcome<T>,
) -> Vec<ItemResult<T>> {
    items
        .iter()
        .map(|item| {
            let outcome = build(item);
            match &outcome {
                Outcome::Built(_) => tracing::debug!("{what} {} built", item.id),
                Outcome::Skipped(kind) => tracing::debug!("{what} {} skipped: {kind}", item.id),
                Outcome::Failed(error) => tracing::warn!("Error drawing {what} {}: {error}", item.id),
            }
            ItemResult {
                id: item.id,
                outcome,
            }
        })
        .collect()
}

/// Polygons only. The color is drawn once per building.
pub fn build_building_item<R: Rng + ?Sized>(
    item: &MapItem,
    origin: &GeographicCoordinates,
    config: &SceneConfig,
    rng: &mut R,
) -> Outcome<BuildingMeshes> {
    let Geometry::Polygon(polygon) = &item.geometry else {
        return Outcome::Skipped(item.geometry.kind());
    };
    let color = BuildingColor::random(rng);
    let holes: Vec<_> = polygon
        .holes
        .iter()
        .map(|hole| origin.project_all(hole))
        .collect();
    Outcome::from_result(
        Footprint::with_holes(&origin.project_all(&polygon.outer), &holes)
            .and_then(|footprint| build_building(item.id, &footprint, config, color)),
    )
}

pub fn build_road_item(
    item: &MapItem,
    origin: &GeographicCoordinates,
    config: &SceneConfig,
) -> Outcome<RoadMeshes> {
    let Geometry::LineString(points) = &item.geometry else {
        return Outcome::Skipped(item.geometry.kind());
    };
    Outcome::from_result(build_road(item.id, &origin.project_all(points), config))
}

pub fn build_water_item(
    item: &MapItem,
    origin: &GeographicCoordinates,
    config: &SceneConfig,
) -> Outcome<WaterMeshes> {
    let polygons = match &item.geometry {
        Geometry::Polygon(polygon) => std::slice::from_ref(polygon),
        Geometry::MultiPolygon(polygons) => polygons.as_slice(),
        other => return Outcome::Skipped(other.kind()),
    };
    let parts: Vec<WaterPart> = polygons
        .iter()
        .map(|polygon| WaterPart {
            outer: origin.project_all(&polygon.outer),
            holes: polygon
                .holes
                .iter()
                .map(|hole| origin.project_all(hole))
                .collect(),
        })
        .collect();
    Outcome::from_result(build_water(item.id, &parts, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel_in::GeoPolygon;
    use crate::kernel_out::SceneMeshes;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn geo(points: &[(f64, f64)]) -> Vec<GeographicCoordinates> {
        points
            .iter()
            .map(|(longitude, latitude)| GeographicCoordinates::new(*latitude, *longitude))
            .collect()
    }

    #[test]
    fn empty_input_builds_nothing() {
        let input = SceneInput::new(GeographicCoordinates::ZERO);
        let report = build_scene(&input, &SceneConfig::default(), &mut ChaCha8Rng::seed_from_u64(0));
        assert_eq!(report.summary(), SceneSummary::default());
        let mut sink = SceneMeshes::new();
        report.hand_off(&mut sink);
        assert_eq!(sink.mesh_count(), 0);
    }

    #[test]
    fn roads_skip_polygons() {
        let item = MapItem::new(
            5,
            Geometry::Polygon(GeoPolygon::new(geo(&[(0., 0.), (1., 0.), (1., 1.)]))),
        );
        let outcome = build_road_item(&item, &GeographicCoordinates::ZERO, &SceneConfig::default());
        assert_eq!(outcome, Outcome::Skipped(GeometryKind::Polygon));
    }

    #[test]
    fn buildings_skip_multipolygons() {
        let item = MapItem::new(6, Geometry::MultiPolygon(vec![]));
        let outcome = build_building_item(
            &item,
            &GeographicCoordinates::ZERO,
            &SceneConfig::default(),
            &mut ChaCha8Rng::seed_from_u64(0),
        );
        assert!(matches!(outcome, Outcome::Skipped(GeometryKind::MultiPolygon)));
    }

    #[test]
    fn failures_are_listed_with_their_id() {
        let mut input = SceneInput::new(GeographicCoordinates::ZERO);
        input
            .roads
            .push(MapItem::new(9, Geometry::LineString(geo(&[(0., 0.)]))));
        let report = build_scene(&input, &SceneConfig::default(), &mut ChaCha8Rng::seed_from_u64(0));
        assert_eq!(report.failures(), vec![(9, &GeometryError::TooFewPoints(1))]);
        assert_eq!(report.summary().failed, 1);
    }
}
