//! The particle field: sampler, store and physics bundled behind one handle.
//!
//! A field is built from a shape and a particle count. Rebuilding replaces
//! the whole store in a single assignment, so a renderer reading
//! [`ParticleField::instances`] never sees a half-initialized set.
//!
//! # Example
//!
//! ```ignore
//! use prism_field::prelude::*;
//!
//! let mut rng = SmallRng::seed_from_u64(1);
//! let mut field = ParticleField::new(
//!     &Shape::halo(),
//!     9000,
//!     FieldSampler::default(),
//!     PhysicsParams::default(),
//!     &mut rng,
//! );
//!
//! // Once per frame:
//! let instances = field.step(clock.elapsed(), input.pointer().ndc());
//! renderer.upload(instances);
//! ```

use glam::Vec2;
use rand::Rng;

use crate::particle::{ParticleInstance, ParticleStore};
use crate::physics::{self, PhysicsParams};
use crate::sampler::FieldSampler;
use crate::shape::Shape;

/// Default particle count for the hero field.
pub const DEFAULT_PARTICLE_COUNT: usize = 9000;

/// Default instance opacity.
pub const DEFAULT_OPACITY: f32 = 0.7;

/// A sampled, simulated particle field.
#[derive(Debug, Clone)]
pub struct ParticleField {
    sampler: FieldSampler,
    params: PhysicsParams,
    opacity: f32,
    store: ParticleStore,
    instances: Vec<ParticleInstance>,
}

impl ParticleField {
    /// Sample `shape` into `count` particles.
    pub fn new<R: Rng + ?Sized>(
        shape: &Shape,
        count: usize,
        sampler: FieldSampler,
        params: PhysicsParams,
        rng: &mut R,
    ) -> Self {
        let mut field = Self {
            sampler,
            params,
            opacity: DEFAULT_OPACITY,
            store: ParticleStore::default(),
            instances: Vec::new(),
        };
        field.rebuild(shape, count, rng);
        field
    }

    /// Set the alpha written into every instance.
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    /// Discard every particle and resample from `shape`.
    ///
    /// The caller should restart its field clock so the entry animation
    /// replays from `t = 0`.
    pub fn rebuild<R: Rng + ?Sized>(&mut self, shape: &Shape, count: usize, rng: &mut R) {
        let samples = self.sampler.sample(shape, count, rng);
        let store = ParticleStore::from_samples(&samples, rng);
        log::info!("field initialized with {} particles", store.len());

        self.store = store;
        self.instances.clear();
    }

    /// Advance to `t` seconds since initialization with the latest pointer
    /// reading, returning this frame's instance batch.
    pub fn step(&mut self, t: f32, pointer: Vec2) -> &[ParticleInstance] {
        physics::step(&mut self.store, t, pointer, &self.params, self.opacity, &mut self.instances);
        &self.instances
    }

    /// Instances from the most recent step.
    pub fn instances(&self) -> &[ParticleInstance] {
        &self.instances
    }

    pub fn store(&self) -> &ParticleStore {
        &self.store
    }

    pub fn params(&self) -> &PhysicsParams {
        &self.params
    }

    pub fn sampler(&self) -> &FieldSampler {
        &self.sampler
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}
