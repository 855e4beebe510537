//! View camera used by the renderer to generate primary rays

use crate::core::types::Vec3;
use crate::math::Ray;

/// Camera defined by eye position, focus point and projection parameters
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    /// World position
    pub position: Vec3,
    /// Point the camera looks at
    pub look_at: Vec3,
    /// World-up reference
    pub up: Vec3,
    /// Vertical field of view in radians
    pub fov_y: f32,
    /// Aspect ratio (width / height)
    pub aspect: f32,
}

impl Camera {
    /// Create camera looking at a target
    pub fn look_at(position: Vec3, target: Vec3, up: Vec3) -> Self {
        Self {
            position,
            look_at: target,
            up,
            fov_y: 45.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
        }
    }

    /// Get forward direction
    pub fn forward(&self) -> Vec3 {
        (self.look_at - self.position).normalize_or(Vec3::NEG_Z)
    }

    /// Get right/up basis vectors; falls back to +X when looking along `up`
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let forward = self.forward();
        let right = forward.cross(self.up).try_normalize().unwrap_or(Vec3::X);
        let up = right.cross(forward);
        (forward, right, up)
    }

    /// Update aspect ratio (call on resize)
    pub fn set_aspect(&mut self, width: f32, height: f32) {
        self.aspect = width / height;
    }

    /// World-space ray through a continuous pixel coordinate.
    ///
    /// Pixel (0, 0) is the bottom-left corner of the image; the centre of
    /// pixel (i, j) is (i + 0.5, j + 0.5).
    pub fn primary_ray(&self, pixel_x: f32, pixel_y: f32, width: u32, height: u32) -> Ray {
        let (forward, right, up) = self.basis();
        let half_h = (self.fov_y * 0.5).tan();
        let half_w = half_h * self.aspect;

        let ndc_x = pixel_x / width as f32 * 2.0 - 1.0;
        let ndc_y = pixel_y / height as f32 * 2.0 - 1.0;

        let direction = (forward + right * (ndc_x * half_w) + up * (ndc_y * half_h)).normalize();
        Ray::new(self.position, direction)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::look_at(Vec3::new(1.0, 1.5, 2.0), Vec3::ZERO, Vec3::Y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_ray_hits_target() {
        let camera = Camera::look_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
        let ray = camera.primary_ray(50.0, 50.0, 100, 100);
        assert!((ray.direction - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn test_corner_directions() {
        let mut camera = Camera::look_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
        camera.set_aspect(1.0, 1.0);

        let bottom_left = camera.primary_ray(0.0, 0.0, 100, 100);
        assert!(bottom_left.direction.x < 0.0);
        assert!(bottom_left.direction.y < 0.0);

        let top_right = camera.primary_ray(100.0, 100.0, 100, 100);
        assert!(top_right.direction.x > 0.0);
        assert!(top_right.direction.y > 0.0);
    }

    #[test]
    fn test_basis_looking_straight_down() {
        let camera = Camera::look_at(Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO, Vec3::Y);
        let (forward, right, up) = camera.basis();
        assert_eq!(right, Vec3::X);
        assert!((forward - Vec3::NEG_Y).length() < 1e-6);
        assert!(up.is_normalized());
    }
}
