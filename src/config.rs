//! # Configuration Module
//!
//! World-wide settings that used to live in process globals: chunk size, the
//! material palette, light attenuation and mesher options. A `WorldConfig` is
//! passed explicitly into `World`, `Mesher` and `LightPropagator`.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::Color;
use crate::voxels::world::MAX_LIGHT;

/// Largest supported chunk edge. Local coordinates must fit the light and
/// material tables, and the file header stores the size as an `i32`.
pub const MAX_CHUNK_SIZE: usize = 256;

/// Indices into the default palette.
pub mod materials {
    pub const DARK_ROCK: u8 = 0;
    pub const ROCK: u8 = 1;
    pub const GRASS: u8 = 2;
    pub const CLOUD: u8 = 3;
    pub const DIRT: u8 = 4;
    pub const SAND: u8 = 5;
    pub const WATER: u8 = 6;
    pub const LAMP: u8 = 7;
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// One palette entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub color: Color,
    /// Light emitted by voxels of this material, 0 for none.
    #[serde(default)]
    pub emission: u8,
}

impl Material {
    pub fn new(color: Color) -> Self {
        Material { color, emission: 0 }
    }

    pub fn emissive(color: Color, emission: u8) -> Self {
        Material { color, emission }
    }
}

/// Material handed out by an empty palette.
const FALLBACK_MATERIAL: Material = Material {
    color: Color::WHITE,
    emission: 0,
};

/// The material table indexed by `Voxel::material`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette(pub Vec<Material>);

impl Palette {
    /// Looks up a material. Unknown indices fall back to the first entry so a
    /// stale save file can still be meshed, and an empty palette yields a plain
    /// white, non-emissive material.
    pub fn material(&self, index: u8) -> &Material {
        self.0
            .get(index as usize)
            .or_else(|| self.0.first())
            .unwrap_or(&FALLBACK_MATERIAL)
    }

    pub fn color(&self, index: u8) -> Color {
        self.material(index).color
    }

    pub fn emission(&self, index: u8) -> u8 {
        self.material(index).emission
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Palette(vec![
            Material::new(Color::rgb8(137, 131, 119)),
            Material::new(Color::rgb8(173, 169, 158)),
            Material::new(Color::rgb8(72, 140, 54)),
            Material::new(Color::rgb8(255, 255, 255)),
            Material::new(Color::rgb8(121, 85, 58)),
            Material::new(Color::rgb8(219, 203, 150)),
            Material::new(Color::rgb8(64, 110, 200)),
            Material::emissive(Color::rgb8(255, 214, 140), 255),
        ])
    }
}

/// Settings shared by every world-level component.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Edge length of a chunk. Chunks span the full world height, so this is
    /// also the height of the world.
    pub chunk_size: usize,
    /// Seed handed to chunk generators.
    pub seed: u64,
    /// Light lost per voxel step during propagation.
    pub light_attenuation: u8,
    /// Brightness of a face that receives no light at all, in `[0, 1]`.
    pub min_shade: f32,
    /// Merge coplanar faces of identical voxels into larger quads.
    pub greedy_meshing: bool,
    pub palette: Palette,
    /// Worker threads used for background chunk writes.
    pub writer_threads: usize,
    pub save_directory: PathBuf,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            chunk_size: 32,
            seed: 31481234,
            light_attenuation: 16,
            min_shade: 0.25,
            greedy_meshing: true,
            palette: Palette::default(),
            writer_threads: 2,
            save_directory: PathBuf::from("world"),
        }
    }
}

impl WorldConfig {
    /// Default settings with a different chunk size. Handy for tests.
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        WorldConfig {
            chunk_size,
            ..Default::default()
        }
    }

    /// Horizontal distance in voxels over which light still arrives with a
    /// non-zero intensity. A voxel change can only alter the light of cells at
    /// most this far away. Never less than 1, so chunk boundary faces are covered.
    pub fn light_reach(&self) -> usize {
        ((MAX_LIGHT - 1) / self.light_attenuation.max(1)).max(1) as usize
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 || self.chunk_size > MAX_CHUNK_SIZE {
            return Err(ConfigError::Invalid(format!(
                "chunk_size must be in 1..={}, got {}",
                MAX_CHUNK_SIZE, self.chunk_size
            )));
        }
        if self.light_attenuation == 0 {
            return Err(ConfigError::Invalid(
                "light_attenuation must be positive".to_string(),
            ));
        }
        if self.palette.is_empty() || self.palette.len() > 256 {
            return Err(ConfigError::Invalid(format!(
                "palette must have 1..=256 materials, got {}",
                self.palette.len()
            )));
        }
        if !(0.0..=1.0).contains(&self.min_shade) {
            return Err(ConfigError::Invalid(format!(
                "min_shade must be in [0, 1], got {}",
                self.min_shade
            )));
        }
        Ok(())
    }
}

/// Reads a JSON config file. Missing fields take their defaults.
pub fn load_config<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T, ConfigError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let config = serde_json::from_reader(reader)?;
    Ok(config)
}

/// Reads and validates a `WorldConfig`.
pub fn load_world_config<P: AsRef<Path>>(path: P) -> Result<WorldConfig, ConfigError> {
    let config: WorldConfig = load_config(path)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_is_valid() {
        assert!(WorldConfig::default().validate().is_ok());
        assert_eq!(
            Palette::default().emission(materials::LAMP),
            255,
            "lamp should be the only emitter"
        );
    }

    #[test]
    fn partial_json_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "chunk_size": 16, "greedy_meshing": false }}"#).unwrap();

        let config = load_world_config(file.path()).unwrap();
        assert_eq!(config.chunk_size, 16);
        assert!(!config.greedy_meshing);
        assert_eq!(config.light_attenuation, 16);
        assert_eq!(config.palette, Palette::default());
    }

    #[test]
    fn palette_accepts_emission_and_default_alpha() {
        let json = r#"{ "palette": [ { "color": { "r": 1.0, "g": 0.0, "b": 0.0 }, "emission": 200 } ] }"#;
        let config: WorldConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.palette.len(), 1);
        assert_eq!(config.palette.emission(0), 200);
        assert_eq!(config.palette.color(0), Color::RED);
    }

    #[test]
    fn rejects_invalid_values() {
        let mut config = WorldConfig::with_chunk_size(0);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.chunk_size = 8;
        config.light_attenuation = 0;
        assert!(config.validate().is_err());

        config.light_attenuation = 1;
        config.palette = Palette(Vec::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn light_reach_follows_attenuation() {
        let mut config = WorldConfig::default();
        assert_eq!(config.light_reach(), 15);
        config.light_attenuation = 1;
        assert_eq!(config.light_reach(), 254);
        config.light_attenuation = 255;
        assert_eq!(config.light_reach(), 1);
    }

    #[test]
    fn palette_lookups_never_panic() {
        let palette = Palette::default();
        assert_eq!(palette.color(200), palette.color(materials::DARK_ROCK));

        let empty = Palette(Vec::new());
        assert_eq!(empty.color(0), Color::WHITE);
        assert_eq!(empty.emission(materials::LAMP), 0);
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = load_world_config("/definitely/not/here.json");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn unknown_material_falls_back_to_first() {
        let palette = Palette::default();
        assert_eq!(palette.color(200), palette.color(0));
    }
}
