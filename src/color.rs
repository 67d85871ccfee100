//! Prism color mapping.
//!
//! Hue follows the angle around the field centre, saturation follows depth
//! and lightness ripples with distance, giving a radial split-light rainbow.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

/// Half of the sampler's default depth range; maps `z` into `[0, 1]`.
const DEPTH_HALF_RANGE: f32 = 4.0;
/// Final brightness boost applied before clamping.
const BOOST: f32 = 1.3;

/// Color for a particle resting at `rest`.
pub fn prism_color(rest: Vec3) -> Vec3 {
    let angle = rest.y.atan2(rest.x);
    let hue = (angle + PI) / TAU * 360.0;
    let distance = rest.truncate().length();
    let depth = (rest.z + DEPTH_HALF_RANGE) / (DEPTH_HALF_RANGE * 2.0);

    let saturation = 0.9 + depth * 0.1;
    let lightness = 0.5 + (distance * 0.95).sin() * 0.2;

    (hsl_to_rgb(hue, saturation, lightness) * BOOST).min(Vec3::ONE)
}

/// HSL to RGB; `hue` in degrees `[0, 360]`, the rest in `[0, 1]`.
pub fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> Vec3 {
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = c * (1.0 - ((hue / 60.0) % 2.0 - 1.0).abs());
    let m = lightness - c / 2.0;

    let rgb = if hue < 60.0 {
        Vec3::new(c, x, 0.0)
    } else if hue < 120.0 {
        Vec3::new(x, c, 0.0)
    } else if hue < 180.0 {
        Vec3::new(0.0, c, x)
    } else if hue < 240.0 {
        Vec3::new(0.0, x, c)
    } else if hue < 300.0 {
        Vec3::new(x, 0.0, c)
    } else {
        Vec3::new(c, 0.0, x)
    };

    rgb + Vec3::splat(m)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-4
    }

    #[test]
    fn test_hsl_primaries() {
        assert!(close(hsl_to_rgb(0.0, 1.0, 0.5), Vec3::new(1.0, 0.0, 0.0)));
        assert!(close(hsl_to_rgb(120.0, 1.0, 0.5), Vec3::new(0.0, 1.0, 0.0)));
        assert!(close(hsl_to_rgb(240.0, 1.0, 0.5), Vec3::new(0.0, 0.0, 1.0)));
        assert!(close(hsl_to_rgb(60.0, 1.0, 0.5), Vec3::new(1.0, 1.0, 0.0)));
    }

    #[test]
    fn test_hsl_grey_when_unsaturated() {
        assert!(close(hsl_to_rgb(200.0, 0.0, 0.25), Vec3::splat(0.25)));
    }

    #[test]
    fn test_prism_color_in_unit_range() {
        for i in 0..360 {
            let angle = (i as f32).to_radians();
            let rest = Vec3::new(angle.cos() * 30.0, angle.sin() * 30.0, (i % 8) as f32 - 4.0);
            let color = prism_color(rest);
            assert!(color.min_element() >= 0.0 && color.max_element() <= 1.0);
        }
    }

    #[test]
    fn test_prism_hue_follows_angle() {
        // Pointing along -x gives angle pi, hue 360: the red end of the wheel.
        let west = prism_color(Vec3::new(-10.0, 0.0, 0.0));
        assert!(west.x > west.y && west.x > west.z);

        // Pointing along +x gives hue 180: cyan.
        let east = prism_color(Vec3::new(10.0, 0.0, 0.0));
        assert!(east.y > east.x && east.z > east.x);
    }
}
