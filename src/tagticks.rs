///////////////////////////////////////
// The tactics to color a scene     //
///////////////////////////////////////

use csscolorparser::parse;
use rand::Rng;
use serde::Serialize;

use crate::kernel_out::RenderColor;

// This constands may come from a (3D-)render shema
pub static DEFAULT_ROAD_COLOR: RenderColor = [1.0, 1.0, 1.0, 1.0]; //  "white"
pub static DEFAULT_WATER_COLOR: RenderColor = [0.1, 0.35, 0.8, 1.0];
pub static DEFAULT_BUILDING_ALPHA: f32 = 0.5; // the walls and roofs are see through

/// The tint of one building: a blue biased palette
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BuildingColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl BuildingColor {
    /// Draws r in [0, 0.5), g and b in [0.5, 1)
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            r: rng.gen_range(0.0..0.5),
            g: rng.gen_range(0.5..1.0),
            b: rng.gen_range(0.5..1.0),
        }
    }

    pub fn is_in_palette(&self) -> bool {
        (0.0..0.5).contains(&self.r) && (0.5..1.0).contains(&self.g) && (0.5..1.0).contains(&self.b)
    }

    pub fn with_alpha(&self, alpha: f32) -> RenderColor {
        [self.r, self.g, self.b, alpha]
    }
}

// May return option if once needed
pub fn parse_color(color: &str, default: RenderColor) -> RenderColor {
    // https://docs.rs/csscolorparser/latest/csscolorparser/
    // Bevy pbr color needs f32, The parse has no .as_f32
    match parse(color) {
        Ok(color_scc) => [
            color_scc.r as f32,
            color_scc.g as f32,
            color_scc.b as f32,
            color_scc.a as f32,
        ],

        Err(error) => {
            tracing::warn!("parse_color: {} => {}", color, error);
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn colors_stay_in_the_palette() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..1000 {
            assert!(BuildingColor::random(&mut rng).is_in_palette());
        }
    }

    #[test]
    fn same_seed_same_colors() {
        let mut first = ChaCha8Rng::seed_from_u64(42);
        let mut second = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..10 {
            assert_eq!(
                BuildingColor::random(&mut first),
                BuildingColor::random(&mut second)
            );
        }
    }

    #[test]
    fn css_colors() {
        assert_eq!(parse_color("white", [0.0; 4]), [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(parse_color("#ff0000", [0.0; 4]), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(parse_color("no color at all", [0.5; 4]), [0.5; 4]);
    }
}
