//! # Prism Field
//!
//! An interactive particle field that forms a silhouette, rendered as
//! instanced prisms with `wgpu`.
//!
//! A shape (a halo disc, the aperture logo or an image mask) is rasterized
//! into sample points. Each point becomes a particle that flies in from a
//! random ring, then springs back to its rest position while drifting and
//! dodging the pointer.
//!
//! ## Quick Start
//!
//! ```ignore
//! use prism_field::prelude::*;
//!
//! fn main() -> Result<(), AppError> {
//!     let config = FieldConfig {
//!         particle_count: 6000,
//!         seed: Some(7),
//!         ..FieldConfig::default()
//!     };
//!     HeroScene::new(config)
//!         .with_shape(Shape::aperture_with_halo())
//!         .run()
//! }
//! ```
//!
//! ## Without a window
//!
//! The simulation does not need a GPU. [`ParticleField`] can be stepped
//! directly and its instance batch handed to any renderer:
//!
//! ```ignore
//! use prism_field::prelude::*;
//!
//! let mut rng = SmallRng::seed_from_u64(1);
//! let mut field = ParticleField::new(
//!     &Shape::halo(),
//!     100,
//!     FieldSampler::default(),
//!     PhysicsParams::default(),
//!     &mut rng,
//! );
//! for frame in 0..600 {
//!     let instances = field.step(frame as f32 / 60.0, Vec2::ZERO);
//!     assert_eq!(instances.len(), 100);
//! }
//! ```
//!
//! ## Pipeline
//!
//! | Stage | Type |
//! |-------|------|
//! | Shape | [`Shape`] |
//! | Sampling | [`FieldSampler`] |
//! | State | [`ParticleStore`] |
//! | Physics | [`physics::step`] with [`PhysicsParams`] |
//! | Rendering | [`FieldRenderer`] |

mod app;
pub mod color;
pub mod config;
pub mod error;
pub mod field;
pub mod gpu;
pub mod input;
pub mod particle;
pub mod physics;
pub mod sampler;
pub mod shape;
pub mod time;

pub use app::HeroScene;
pub use config::{FieldConfig, PointLight, RenderConfig, ShapeSpec};
pub use error::{AppError, ConfigError, GpuError, ShapeError};
pub use field::ParticleField;
pub use glam::{Vec2, Vec3, Vec4};
pub use gpu::FieldRenderer;
pub use particle::{Particle, ParticleInstance, ParticleStore};
pub use physics::PhysicsParams;
pub use sampler::{FieldSampler, RasterConfig, SamplePoint};
pub use shape::{AlphaMask, Polygon, Shape};

/// Convenient re-exports for common usage.
///
/// # Usage
///
/// ```ignore
/// use prism_field::prelude::*;
/// ```
pub mod prelude {
    pub use crate::app::HeroScene;
    pub use crate::config::{FieldConfig, RenderConfig, ShapeSpec};
    pub use crate::error::{AppError, ConfigError, ShapeError};
    pub use crate::field::ParticleField;
    pub use crate::input::{Input, KeyCode, PointerState};
    pub use crate::particle::ParticleInstance;
    pub use crate::physics::PhysicsParams;
    pub use crate::sampler::{FieldSampler, RasterConfig};
    pub use crate::shape::Shape;
    pub use crate::time::FrameClock;
    pub use crate::{Vec2, Vec3, Vec4};
    pub use rand::rngs::SmallRng;
    pub use rand::SeedableRng;
}
