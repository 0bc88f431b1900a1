// Errors of the scene builder. Geometry errors are per item and never fatal to a batch.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("footprint needs at least 3 distinct vertices, got {0}")]
    TooFewVertices(usize),

    #[error("polyline needs at least 2 points, got {0}")]
    TooFewPoints(usize),

    #[error("coordinate at index {0} is not finite")]
    NonFinite(usize),

    #[error("triangulation failed for a ring of {0} vertices")]
    Triangulation(usize),

    #[error("{0} produced no triangles")]
    EmptyMesh(&'static str),
}

#[derive(Error, Debug)]
pub enum InputError {
    #[error("OSM json could not be parsed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("input file could not be read: {0}")]
    Io(#[from] std::io::Error),

    #[error("no nodes in the input, the origin can not be derived")]
    NoOrigin,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("building height must be finite and in (0, {max}], got {value}")]
    BuildingHeight { value: f32, max: f32 },

    #[error("window size must be finite and positive, got {width} x {height}")]
    WindowSize { width: f32, height: f32 },
}
