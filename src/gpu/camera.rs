//! Fixed perspective camera for the field.

use glam::{Mat4, Vec3};

const NEAR: f32 = 0.1;
// Fly-in origins reach 1200 units out.
const FAR: f32 = 2000.0;

/// Camera on the +z axis looking at the origin.
pub struct Camera {
    /// Distance from the origin along +z.
    pub distance: f32,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Point the camera looks at.
    pub target: Vec3,
}

impl Camera {
    pub fn new(distance: f32, fov_degrees: f32) -> Self {
        Self {
            distance,
            fov_degrees,
            target: Vec3::ZERO,
        }
    }

    /// Calculate the camera's world position.
    pub fn position(&self) -> Vec3 {
        self.target + Vec3::new(0.0, 0.0, self.distance)
    }

    /// Calculate the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    /// Combined projection * view for a viewport aspect ratio.
    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        let proj = Mat4::perspective_rh(self.fov_degrees.to_radians(), aspect, NEAR, FAR);
        proj * self.view_matrix()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(80.0, 70.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn test_origin_projects_to_centre() {
        let camera = Camera::default();
        let clip = camera.view_proj(16.0 / 9.0) * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn test_halo_fits_vertically() {
        // The default halo is 50 units in radius; at 80 units with a 70 degree
        // FOV the visible half-height is 80 * tan(35 deg) ~= 56.
        let camera = Camera::default();
        let clip = camera.view_proj(1.0) * Vec4::new(0.0, 50.0, 0.0, 1.0);
        let ndc_y = clip.y / clip.w;
        assert!(ndc_y > 0.8 && ndc_y < 1.0, "ndc_y {ndc_y}");
    }
}
