//// Input modules deliver map items (OSM-Json now; Vector-Tile-File, Overtures are possible)
//// The builders turn them into mesh descriptions, a sink hands them to a renderer

mod input_osm_json;

// Interfaces from input modules to the mesh builders
mod config;
mod error;
mod kernel_in;
mod shape;

// The mesh builders
mod building_3d;
mod road_3d;
mod scene;
mod tagticks;
mod water_3d;

// Interface from the builders to an output
mod kernel_out;

// Various outputs are possible (Bevy, a json file)
#[cfg(feature = "bevy")]
mod bevy_ui;

#[cfg(feature = "bevy")]
pub use bevy_ui::*;
pub use building_3d::*;
pub use config::*;
pub use error::*;
pub use input_osm_json::*;
pub use kernel_in::*;
pub use kernel_out::*;
pub use road_3d::*;
pub use scene::*;
pub use shape::*;
pub use tagticks::*;
pub use water_3d::*;
