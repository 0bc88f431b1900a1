// other crates
use clap::{Parser, ValueEnum};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::error::Error;
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;
// this crate
use osm_scene::{
    ConfigError, FurnitureKind, GeographicCoordinates, SceneConfig, SceneMeshes, WaterFill, build_scene,
    parse_color, read_scene_file,
};

/**** Project patterns ****************************************************************************
 * Don't use apreviations, as Rust does
 * Always north before east, like in GeographicCoordinates::new(latitude, longitude)
 */

#[derive(Clone, Copy, Debug, ValueEnum)]
enum WaterFillArg {
    Earcut,
    Triples,
}

// Santa Monica Beach:  cargo run -- santa_monica.json -o scene.json
#[derive(Parser, Debug)]
#[command(about = "Builds the meshes of a stylized 3D scene from OSM json", version, long_about = None)]
struct SceneArgs {
    /// OSM json (API 0.6 map.json or Overpass "out json")
    input: PathBuf,
    /// Writes the built meshes as json
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Origin latitude, default: the center of all nodes
    #[arg(long, requires = "longitude", allow_hyphen_values = true)]
    latitude: Option<f64>,
    #[arg(long, requires = "latitude", allow_hyphen_values = true)]
    longitude: Option<f64>,
    /// Seed of the building colors
    #[arg(short, long, default_value = "0")]
    seed: u64,
    /// Building height, at most 1000
    #[arg(long, default_value = "100")]
    height: f32,
    /// Every n-th road vertex gets a traffic light, 0 for none
    #[arg(long, default_value = "10")]
    traffic_lights: usize,
    #[arg(long, value_enum, default_value = "earcut")]
    water_fill: WaterFillArg,
    /// css color of the windows, default: the building color
    #[arg(long)]
    window_color: Option<String>,
    /// css color of the roads
    #[arg(long, default_value = "white")]
    road_color: String,
}

impl SceneArgs {
    fn config(&self) -> Result<SceneConfig, ConfigError> {
        let default = SceneConfig::default();
        let config = SceneConfig {
            building_height: self.height,
            traffic_light_interval: self.traffic_lights,
            water_fill: match self.water_fill {
                WaterFillArg::Earcut => WaterFill::Earcut,
                WaterFillArg::Triples => WaterFill::ConsecutiveTriples,
            },
            window_color: self
                .window_color
                .as_deref()
                .map(|color| parse_color(color, [0.8, 0.8, 0.8, 1.0])),
            road_color: parse_color(&self.road_color, default.road_color),
            ..default
        };
        config.validate()?;
        Ok(config)
    }

    fn origin(&self) -> Option<GeographicCoordinates> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(GeographicCoordinates::new(latitude, longitude)),
            _ => None,
        }
    }
}

///////////////////////////////////////////////////////////////////////////////////////////////////
// MAIN ///////////////////////////////////////////////////////////////////////////////////////////

fn main() -> Result<(), Box<dyn Error>> {
    let _ = tracing_subscriber::fmt::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .try_init();

    let args = SceneArgs::parse();
    tracing::debug!("{:?}", args);
    let config = args.config()?;

    let input = read_scene_file(&args.input, args.origin())?;
    tracing::info!("Origin is at: {:?}", input.origin);

    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let report = build_scene(&input, &config, &mut rng);

    let mut scene = SceneMeshes::new();
    let summary = report.hand_off(&mut scene);
    tracing::info!(
        "{summary}: {} meshes, {} street lamps, {} traffic lights",
        scene.mesh_count(),
        scene.furniture_count(FurnitureKind::StreetLamp),
        scene.furniture_count(FurnitureKind::TrafficLight)
    );

    if let Some(output) = &args.output {
        std::fs::write(output, serde_json::to_vec(&scene)?)?;
        tracing::info!("scene written to {}", output.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_of(args: &[&str]) -> Result<SceneConfig, ConfigError> {
        let mut command_line = vec!["osm_scene", "map.json"];
        command_line.extend_from_slice(args);
        SceneArgs::try_parse_from(command_line).unwrap().config()
    }

    #[test]
    fn height_is_checked() {
        assert!(config_of(&[]).is_ok());
        assert!(matches!(
            config_of(&["--height", "1e12"]),
            Err(ConfigError::BuildingHeight { .. })
        ));
        assert!(config_of(&["--height=-10"]).is_err());
        assert!(config_of(&["--height", "NaN"]).is_err());
    }

    #[test]
    fn water_fill_and_traffic_lights() {
        let config = config_of(&["--water-fill", "triples", "--traffic-lights", "100"]).unwrap();
        assert_eq!(config.water_fill, WaterFill::ConsecutiveTriples);
        assert_eq!(config.traffic_light_interval, 100);
    }
}
