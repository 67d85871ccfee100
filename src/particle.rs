//! Particle state: CPU simulation records and GPU instance data.

use std::f32::consts::TAU;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use rand::Rng;

use crate::color::prism_color;
use crate::sampler::SamplePoint;

/// Closest fly-in origin distance from the field centre.
const ENTRY_MIN_DISTANCE: f32 = 100.0;
/// Spread of fly-in origin distances beyond the minimum.
const ENTRY_DISTANCE_SPREAD: f32 = 1100.0;

/// One simulated point.
///
/// Everything except the velocity is fixed when the particle is created.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    rest: Vec3,
    velocity: Vec3,
    drift_phase: Vec3,
    entry_start: Vec3,
    color: Vec3,
}

impl Particle {
    /// Create a particle at rest with fresh random drift and fly-in origin.
    pub fn spawn<R: Rng + ?Sized>(rest: Vec3, rng: &mut R) -> Self {
        let drift_phase = Vec3::new(
            drift_coefficient(rng),
            drift_coefficient(rng),
            drift_coefficient(rng),
        );

        // Origins lie on a ring in the x = y plane, so the fly-in sweeps
        // diagonally through the view.
        let angle = rng.gen_range(0.0..TAU);
        let distance = ENTRY_MIN_DISTANCE + rng.gen::<f32>() * ENTRY_DISTANCE_SPREAD;
        let entry_start = Vec3::new(
            angle.cos() * distance,
            angle.cos() * distance,
            angle.sin() * distance,
        );

        Self {
            rest,
            velocity: Vec3::ZERO,
            drift_phase,
            entry_start,
            color: prism_color(rest),
        }
    }

    /// Rest position from the sampler.
    #[inline]
    pub fn rest(&self) -> Vec3 {
        self.rest
    }

    /// Current offset from rest.
    #[inline]
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    #[inline]
    pub(crate) fn velocity_mut(&mut self) -> &mut Vec3 {
        &mut self.velocity
    }

    /// Per-axis drift coefficients.
    #[inline]
    pub fn drift_phase(&self) -> Vec3 {
        self.drift_phase
    }

    /// Where the particle flies in from.
    #[inline]
    pub fn entry_start(&self) -> Vec3 {
        self.entry_start
    }

    #[inline]
    pub fn color(&self) -> Vec3 {
        self.color
    }
}

/// Drift coefficient in `[-0.42, -0.02)`.
fn drift_coefficient<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    (rng.gen::<f32>() - 1.05) * 0.4
}

/// Owns every particle of one field instance.
///
/// A store is built whole from a sample set and replaced whole on
/// reinitialization; particles are never added or removed individually.
#[derive(Debug, Clone, Default)]
pub struct ParticleStore {
    particles: Vec<Particle>,
}

impl ParticleStore {
    pub fn from_samples<R: Rng + ?Sized>(samples: &[SamplePoint], rng: &mut R) -> Self {
        let particles = samples.iter().map(|s| Particle::spawn(s.position, rng)).collect();
        Self { particles }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Particle> {
        self.particles.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [Particle] {
        &mut self.particles
    }
}

/// GPU instance data - matches the `InstanceInput` struct in `shader.wgsl`.
/// 48 bytes, 16-byte aligned (3 x vec4).
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct ParticleInstance {
    /// xyz = world position, w unused
    pub position: [f32; 4],
    /// xyz = per-axis scale, w unused
    pub scale: [f32; 4],
    /// rgba
    pub color: [f32; 4],
}

impl ParticleInstance {
    pub fn new(position: Vec3, scale: Vec3, color: Vec3, opacity: f32) -> Self {
        Self {
            position: position.extend(1.0).to_array(),
            scale: scale.extend(0.0).to_array(),
            color: color.extend(opacity).to_array(),
        }
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        Vec3::from_slice(&self.position[..3])
    }

    #[inline]
    pub fn scale(&self) -> Vec3 {
        Vec3::from_slice(&self.scale[..3])
    }

    #[inline]
    pub fn color(&self) -> Vec3 {
        Vec3::from_slice(&self.color[..3])
    }
}
