//! Per-frame field update.
//!
//! The step runs in two phases keyed on `t / entry_duration`:
//!
//! - **Entry**: particles ease from their fly-in origin to rest along a
//!   cubic ease-out; velocity is held at zero.
//! - **Steady**: the velocity vector is a running display offset from rest.
//!   Each frame it gathers pointer repulsion, a staggered spring back to
//!   rest and a sinusoidal drift, then is damped.
//!
//! The force helpers are public so each term can be checked on its own.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::particle::{ParticleInstance, ParticleStore};

/// Tunables for the field physics. Defaults reproduce the hero animation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsParams {
    /// Seconds for the fly-in.
    pub entry_duration: f32,
    /// Normalized pointer coordinates are multiplied by this to reach world space.
    pub pointer_scale: f32,
    pub repulsion_radius: f32,
    pub repulsion_strength: f32,
    /// No repulsion closer than this, where the direction is ill-defined.
    pub min_repulsion_distance: f32,
    /// Base spring constant; each particle scales it by 0.3x to 2x.
    pub spring_strength: f32,
    /// Velocity multiplier applied after all forces.
    pub damping: f32,
    pub drift_speed: f32,
    pub drift_strength: f32,
    pub pulse_speed: f32,
    /// Pulse phase offset between consecutive particles.
    pub pulse_phase_step: f32,
    /// Instance scale before the pulse.
    pub base_scale: Vec3,
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            entry_duration: 9.0,
            pointer_scale: 55.0,
            repulsion_radius: 140.0,
            repulsion_strength: 65.0,
            min_repulsion_distance: 0.1,
            spring_strength: 0.15,
            damping: 0.64,
            drift_speed: 0.0009,
            drift_strength: 55.0,
            pulse_speed: 4.0,
            pulse_phase_step: 0.05,
            base_scale: Vec3::new(0.08, 0.25 * 1.2, 0.18),
        }
    }
}

impl PhysicsParams {
    /// Time for the scale pulse to repeat.
    pub fn pulse_period(&self) -> f32 {
        TAU / self.pulse_speed
    }
}

/// `1 - (1 - t)^3`.
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

/// Fly-in progress in `[0, 1]`.
#[inline]
pub fn entry_progress(t: f32, params: &PhysicsParams) -> f32 {
    (t / params.entry_duration).clamp(0.0, 1.0)
}

/// Pointer position in world space, on the z = 0 plane.
#[inline]
pub fn pointer_world(pointer: Vec2, params: &PhysicsParams) -> Vec3 {
    (pointer * params.pointer_scale).extend(0.0)
}

/// Velocity change pushing `position` directly away from `pointer`.
pub fn repulsion(position: Vec3, pointer: Vec3, params: &PhysicsParams) -> Vec3 {
    let to_pointer = pointer - position;
    let distance = to_pointer.length();
    if distance >= params.repulsion_radius || distance <= params.min_repulsion_distance {
        return Vec3::ZERO;
    }
    let force = (params.repulsion_radius - distance) / params.repulsion_radius;
    -(to_pointer / distance) * force * params.repulsion_strength
}

/// Spring constant for particle `index`.
///
/// Staggered by `index mod 100` between 0.3x and 1.983x the base so the field
/// reassembles in a cascade rather than all at once.
#[inline]
pub fn spring_strength(index: usize, params: &PhysicsParams) -> f32 {
    let delay = (index % 100) as f32 / 100.0;
    params.spring_strength * (0.3 + delay * 1.7)
}

/// Velocity change pulling `position` back to `rest`.
#[inline]
pub fn spring(rest: Vec3, position: Vec3, index: usize, params: &PhysicsParams) -> Vec3 {
    (rest - position) * spring_strength(index, params)
}

/// Ambient wandering for particle `index` at time `t`.
pub fn drift(t: f32, index: usize, phase: Vec3, params: &PhysicsParams) -> Vec3 {
    let i = index as f32;
    let ts = t * params.drift_speed;
    let strength = params.drift_strength;
    Vec3::new(
        (ts + i * 0.5).sin() * phase.x * strength * 0.18,
        (ts + i * 0.5).cos() * phase.y * strength * 0.18,
        (ts * 0.5 + i * 0.2).sin() * phase.z * (strength * 0.8) * 0.28,
    )
}

/// Scale multiplier in `[0.5, 1.5]`.
#[inline]
pub fn pulse(t: f32, index: usize, params: &PhysicsParams) -> f32 {
    (t * params.pulse_speed + index as f32 * params.pulse_phase_step).sin() * 0.5 + 1.0
}

/// Advance every particle to time `t` and write one instance per particle.
///
/// `t` is seconds since the field was initialized and `pointer` the latest
/// normalized pointer reading. `out` is cleared and refilled.
pub fn step(
    store: &mut ParticleStore,
    t: f32,
    pointer: Vec2,
    params: &PhysicsParams,
    opacity: f32,
    out: &mut Vec<ParticleInstance>,
) {
    out.clear();
    out.reserve(store.len());

    let progress = entry_progress(t, params);
    let pointer = pointer_world(pointer, params);

    for (i, particle) in store.as_mut_slice().iter_mut().enumerate() {
        let rest = particle.rest();

        let position = if progress < 1.0 {
            *particle.velocity_mut() = Vec3::ZERO;
            particle.entry_start().lerp(rest, ease_out_cubic(progress))
        } else {
            let current = rest + particle.velocity();
            let delta = repulsion(current, pointer, params)
                + spring(rest, current, i, params)
                + drift(t, i, particle.drift_phase(), params);

            let velocity = particle.velocity_mut();
            *velocity = (*velocity + delta) * params.damping;
            current
        };

        out.push(ParticleInstance::new(
            position,
            params.base_scale * pulse(t, i, params),
            particle.color(),
            opacity,
        ));
    }
}
