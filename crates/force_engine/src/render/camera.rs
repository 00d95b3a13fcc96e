//! Per-frame camera state

use crate::foundation::math::{translation_of, utils, Mat4, Mat4Ext, Vec3};

/// Vertical field of view used when no camera module is present, in degrees
pub const DEFAULT_FOV: f32 = 45.0;
/// Near clip plane used when no camera module is present
pub const DEFAULT_NEAR: f32 = 0.1;
/// Far clip plane used when no camera module is present
pub const DEFAULT_FAR: f32 = 100.0;

/// View, projection and eye position fixed at the start of a frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    /// World → view transform
    pub view: Mat4,
    /// View → clip transform
    pub projection: Mat4,
    /// Eye position in world space
    pub position: Vec3,
}

impl CameraState {
    /// Camera placed by a node's world matrix
    ///
    /// The node looks down its local -Z axis with local +Y up.
    pub fn from_world(world: &Mat4, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        let position = translation_of(world);
        let forward = -world.fixed_view::<3, 1>(0, 2).into_owned();
        let up = world.fixed_view::<3, 1>(0, 1).into_owned();

        let forward = forward.try_normalize(f32::EPSILON).unwrap_or_else(|| -Vec3::z());
        let up = up.try_normalize(f32::EPSILON).unwrap_or_else(Vec3::y);

        Self {
            view: Mat4::look_at(position, position + forward, up),
            projection: Mat4::perspective(utils::deg_to_rad(fov_degrees), aspect, near, far),
            position,
        }
    }

    /// Camera at (0, 0, 3) looking down -Z
    pub fn default_for_aspect(aspect: f32) -> Self {
        let world = Mat4::new_translation(&Vec3::new(0.0, 0.0, 3.0));
        Self::from_world(&world, DEFAULT_FOV, aspect, DEFAULT_NEAR, DEFAULT_FAR)
    }

    /// Projection times view
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Point3;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_camera_sees_origin_in_front() {
        let camera = CameraState::default_for_aspect(4.0 / 3.0);
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, 3.0));

        let origin_in_view = camera.view.transform_point(&Point3::origin());
        assert_relative_eq!(origin_in_view.coords, Vec3::new(0.0, 0.0, -3.0), epsilon = 1e-5);
    }

    #[test]
    fn test_rotated_node_turns_the_view() {
        // Yaw 90° about Y: local -Z now points along world -X
        let world = Mat4::new_rotation(Vec3::new(0.0, std::f32::consts::FRAC_PI_2, 0.0));
        let camera = CameraState::from_world(&world, 60.0, 1.0, 0.1, 10.0);

        let ahead = camera.view.transform_point(&Point3::new(-5.0, 0.0, 0.0));
        assert_relative_eq!(ahead.coords, Vec3::new(0.0, 0.0, -5.0), epsilon = 1e-4);
    }
}
