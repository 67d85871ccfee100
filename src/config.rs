//! JSON configuration for the hero scene.
//!
//! Every field is optional; anything left out takes the value the hero
//! animation ships with.
//!
//! ```json
//! {
//!   "particle_count": 6000,
//!   "seed": 7,
//!   "shape": { "kind": "logo_with_halo" },
//!   "physics": { "damping": 0.7, "base_scale": [0.1, 0.3, 0.2] },
//!   "render": { "opacity": 0.8 }
//! }
//! ```

use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ShapeError};
use crate::field::{DEFAULT_OPACITY, DEFAULT_PARTICLE_COUNT};
use crate::physics::PhysicsParams;
use crate::sampler::RasterConfig;
use crate::shape::Shape;

/// Largest particle count accepted.
///
/// Keeps the instance buffer (48 bytes per particle) under wgpu's default
/// 256 MiB `max_buffer_size`.
pub const MAX_PARTICLE_COUNT: usize = 5_000_000;

/// Top-level scene configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub particle_count: usize,
    /// Fixed RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
    pub shape: ShapeSpec,
    pub raster: RasterConfig,
    pub physics: PhysicsParams,
    pub render: RenderConfig,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            particle_count: DEFAULT_PARTICLE_COUNT,
            seed: None,
            shape: ShapeSpec::default(),
            raster: RasterConfig::default(),
            physics: PhysicsParams::default(),
            render: RenderConfig::default(),
        }
    }
}

impl FieldConfig {
    /// Read and validate a config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&text)?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a config document.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.particle_count > MAX_PARTICLE_COUNT {
            return Err(ConfigError::Invalid(format!(
                "particle_count must be at most {MAX_PARTICLE_COUNT}, got {}",
                self.particle_count
            )));
        }
        if self.raster.cell_step == 0 {
            return Err(ConfigError::Invalid("raster.cell_step must be at least 1".into()));
        }
        if !positive(self.raster.world_scale) {
            return Err(ConfigError::Invalid("raster.world_scale must be positive".into()));
        }
        if !positive(self.physics.entry_duration) {
            return Err(ConfigError::Invalid("physics.entry_duration must be positive".into()));
        }
        if !(0.0..1.0).contains(&self.physics.damping) {
            return Err(ConfigError::Invalid(format!(
                "physics.damping must be in [0, 1), got {}",
                self.physics.damping
            )));
        }
        if !positive(self.physics.repulsion_radius) {
            return Err(ConfigError::Invalid("physics.repulsion_radius must be positive".into()));
        }
        if !positive(self.physics.pulse_speed) {
            return Err(ConfigError::Invalid("physics.pulse_speed must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.render.opacity) {
            return Err(ConfigError::Invalid(format!(
                "render.opacity must be in [0, 1], got {}",
                self.render.opacity
            )));
        }
        if !positive(self.render.fov_degrees) || self.render.fov_degrees >= 180.0 {
            return Err(ConfigError::Invalid("render.fov_degrees must be in (0, 180)".into()));
        }
        Ok(())
    }
}

/// `false` for zero, negatives and NaN.
fn positive(value: f32) -> bool {
    value > 0.0
}

/// Which silhouette to sample.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeSpec {
    /// Disc of the default halo radius.
    #[default]
    Halo,
    /// Disc with a custom radius in canvas pixels.
    Circle { radius: f32 },
    /// Aperture logo fitted into `diameter` canvas pixels.
    Logo {
        #[serde(default = "default_logo_diameter")]
        diameter: f32,
    },
    /// Aperture logo inside a ring halo.
    LogoWithHalo,
    /// Alpha mask from an image file.
    Image { path: PathBuf },
}

fn default_logo_diameter() -> f32 {
    900.0
}

impl ShapeSpec {
    pub fn to_shape(&self) -> Result<Shape, ShapeError> {
        Ok(match self {
            ShapeSpec::Halo => Shape::halo(),
            ShapeSpec::Circle { radius } => Shape::circle(*radius),
            ShapeSpec::Logo { diameter } => Shape::aperture_logo(*diameter),
            ShapeSpec::LogoWithHalo => Shape::aperture_with_halo(),
            ShapeSpec::Image { path } => Shape::from_mask_file(path)?,
        })
    }
}

/// Camera, lighting and window settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    /// Camera sits on +z at this distance, looking at the origin.
    pub camera_distance: f32,
    /// Vertical field of view.
    pub fov_degrees: f32,
    pub opacity: f32,
    /// RGBA clear color.
    pub background: [f32; 4],
    pub ambient_intensity: f32,
    pub key_light: PointLight,
    pub fill_light: PointLight,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_title: "Prism Field".to_string(),
            window_width: 1280,
            window_height: 720,
            camera_distance: 80.0,
            fov_degrees: 70.0,
            opacity: DEFAULT_OPACITY,
            background: [0.0, 0.0, 0.0, 0.0],
            ambient_intensity: 0.8,
            key_light: PointLight {
                position: Vec3::splat(10.0),
                color: Vec3::ONE,
                intensity: 0.5,
            },
            fill_light: PointLight {
                position: Vec3::splat(-10.0),
                // #8b5cf6
                color: Vec3::new(0.545, 0.361, 0.965),
                intensity: 0.3,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Vec3,
    pub intensity: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_document_gives_defaults() {
        let config = FieldConfig::from_json_str("{}").unwrap();
        assert_eq!(config, FieldConfig::default());
        assert_eq!(config.particle_count, 9000);
        assert_eq!(config.physics.damping, 0.64);
    }

    #[test]
    fn test_partial_override() {
        let config = FieldConfig::from_json_str(
            r#"{
                "particle_count": 100,
                "seed": 3,
                "shape": { "kind": "circle", "radius": 250.0 },
                "physics": { "repulsion_radius": 90.0, "base_scale": [1.0, 2.0, 3.0] }
            }"#,
        )
        .unwrap();

        assert_eq!(config.particle_count, 100);
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.shape, ShapeSpec::Circle { radius: 250.0 });
        assert_eq!(config.physics.repulsion_radius, 90.0);
        assert_eq!(config.physics.base_scale, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(config.physics.spring_strength, 0.15);
    }

    #[test]
    fn test_logo_diameter_defaults() {
        let config = FieldConfig::from_json_str(r#"{ "shape": { "kind": "logo" } }"#).unwrap();
        assert_eq!(config.shape, ShapeSpec::Logo { diameter: 900.0 });
    }

    #[test]
    fn test_invalid_values_rejected() {
        for doc in [
            r#"{ "physics": { "damping": 1.5 } }"#,
            r#"{ "physics": { "entry_duration": 0.0 } }"#,
            r#"{ "raster": { "cell_step": 0 } }"#,
            r#"{ "render": { "opacity": 2.0 } }"#,
        ] {
            let err = FieldConfig::from_json_str(doc).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{doc}: {err}");
        }
    }

    #[test]
    fn test_particle_count_limit() {
        let err = FieldConfig::from_json_str(r#"{ "particle_count": 18446744073709551615 }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "{err}");

        let at_limit = format!(r#"{{ "particle_count": {MAX_PARTICLE_COUNT} }}"#);
        assert!(FieldConfig::from_json_str(&at_limit).is_ok());

        let config = FieldConfig {
            particle_count: MAX_PARTICLE_COUNT + 1,
            ..FieldConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = FieldConfig::from_json_str("{ particle_count: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "particle_count": 42, "shape": {{ "kind": "logo_with_halo" }} }}"#
        )
        .unwrap();

        let config = FieldConfig::load(file.path()).unwrap();
        assert_eq!(config.particle_count, 42);
        assert_eq!(config.shape, ShapeSpec::LogoWithHalo);
    }

    #[test]
    fn test_load_missing_file() {
        let err = FieldConfig::load("no/such/config.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_round_trips_through_json() {
        let config = FieldConfig {
            seed: Some(11),
            shape: ShapeSpec::Image { path: PathBuf::from("mask.png") },
            ..FieldConfig::default()
        };
        let text = serde_json::to_string(&config).unwrap();
        assert_eq!(FieldConfig::from_json_str(&text).unwrap(), config);
    }
}
