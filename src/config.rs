// Fixed visual constants of a scene. The CLI may override some of them.

use crate::error::ConfigError;
use crate::kernel_out::RenderColor;
use crate::tagticks::{DEFAULT_BUILDING_ALPHA, DEFAULT_ROAD_COLOR, DEFAULT_WATER_COLOR};

pub static DEFAULT_BUILDING_HEIGHT: f32 = 10.0 * 10.0;
pub static DEFAULT_WINDOW_WIDTH: f32 = 1.0;
pub static DEFAULT_WINDOW_HEIGHT: f32 = 2.0;
pub static DEFAULT_ROAD_ELEVATION: f32 = 0.1; // above the ground, no z-fighting
pub static DEFAULT_ROAD_THICKNESS: f32 = 2.0;
pub static DEFAULT_LAMP_INTERVAL: usize = 5;
pub static DEFAULT_TRAFFIC_LIGHT_INTERVAL: usize = 10; // an other variant used 100
pub static DEFAULT_WATER_ELEVATION: f32 = 0.0;

// Above the tallest buildings. Window rows grow with the height.
pub static MAX_BUILDING_HEIGHT: f32 = 1000.0;

/// Camera distances to switch the window tiers
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LodConfig {
    pub far_distance: f32,
    pub mid_distance: f32,
    pub near_distance: f32,
}

impl Default for LodConfig {
    fn default() -> Self {
        Self {
            far_distance: 500.0,
            mid_distance: 200.0,
            near_distance: 0.0,
        }
    }
}

/// How a water ring is filled
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum WaterFill {
    /// Ear clipping, correct for concave rings and holes
    #[default]
    Earcut,
    /// Triangles `(i, i+1, i+2)` over the ring. Only right for convex rings, holes are ignored.
    ConsecutiveTriples,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneConfig {
    pub building_height: f32,
    pub building_alpha: f32,
    pub window_width: f32,
    pub window_height: f32,
    // None: the building color
    pub window_color: Option<RenderColor>,
    pub lod: LodConfig,
    pub road_elevation: f32,
    pub road_thickness: f32,
    pub road_color: RenderColor,
    // 0 disables a kind of furniture
    pub lamp_interval: usize,
    pub traffic_light_interval: usize,
    pub water_elevation: f32,
    pub water_color: RenderColor,
    pub water_fill: WaterFill,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            building_height: DEFAULT_BUILDING_HEIGHT,
            building_alpha: DEFAULT_BUILDING_ALPHA,
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            window_color: None,
            lod: LodConfig::default(),
            road_elevation: DEFAULT_ROAD_ELEVATION,
            road_thickness: DEFAULT_ROAD_THICKNESS,
            road_color: DEFAULT_ROAD_COLOR,
            lamp_interval: DEFAULT_LAMP_INTERVAL,
            traffic_light_interval: DEFAULT_TRAFFIC_LIGHT_INTERVAL,
            water_elevation: DEFAULT_WATER_ELEVATION,
            water_color: DEFAULT_WATER_COLOR,
            water_fill: WaterFill::default(),
        }
    }
}

impl SceneConfig {
    /// Rejects sizes that would build no windows or an unbounded number of them
    pub fn validate(&self) -> Result<(), ConfigError> {
        let height = self.building_height;
        if !(height.is_finite() && height > 0.0 && height <= MAX_BUILDING_HEIGHT) {
            return Err(ConfigError::BuildingHeight {
                value: height,
                max: MAX_BUILDING_HEIGHT,
            });
        }
        let (width, height) = (self.window_width, self.window_height);
        if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
            return Err(ConfigError::WindowSize { width, height });
        }
        Ok(())
    }
}
