//! Math utilities and types
//!
//! Provides fundamental math types for 3D graphics and game development.
//! Rotations on scene nodes are stored as XYZ Euler angles in degrees.

pub use nalgebra::{Matrix4, Vector2, Vector3};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Position, Euler rotation (degrees) and scale of a scene node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Position relative to the parent
    pub position: Vec3,

    /// Euler angles in degrees, applied X then Y then Z
    pub rotation: Vec3,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Convert to a transformation matrix
    ///
    /// Composition order is fixed: translate, rotate X, rotate Y, rotate Z, scale.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * euler_rotation_matrix(self.rotation)
            * Mat4::new_nonuniform_scaling(&self.scale)
    }
}

/// Build `Rx * Ry * Rz` from Euler angles given in degrees
pub fn euler_rotation_matrix(degrees: Vec3) -> Mat4 {
    Mat4::rotation_x(utils::deg_to_rad(degrees.x))
        * Mat4::rotation_y(utils::deg_to_rad(degrees.y))
        * Mat4::rotation_z(utils::deg_to_rad(degrees.z))
}

/// Recover XYZ Euler angles (degrees) from a matrix built as `Rx * Ry * Rz`
///
/// Inverse of [`euler_rotation_matrix`]. At gimbal lock (Y = ±90°) the Z angle
/// is folded into X and reported as zero.
pub fn extract_euler_xyz(rotation: &Mat4) -> Vec3 {
    let r00 = rotation[(0, 0)];
    let r01 = rotation[(0, 1)];
    let r02 = rotation[(0, 2)].clamp(-1.0, 1.0);
    let r11 = rotation[(1, 1)];
    let r12 = rotation[(1, 2)];
    let r21 = rotation[(2, 1)];
    let r22 = rotation[(2, 2)];

    let cos_y = (r00 * r00 + r01 * r01).sqrt();
    let y = r02.atan2(cos_y);

    let (x, z) = if cos_y > 1e-6 {
        ((-r12).atan2(r22), (-r01).atan2(r00))
    } else {
        (r21.atan2(r11), 0.0)
    };

    Vec3::new(utils::rad_to_deg(x), utils::rad_to_deg(y), utils::rad_to_deg(z))
}

/// Translation column of an affine matrix
pub fn translation_of(matrix: &Mat4) -> Vec3 {
    Vec3::new(matrix[(0, 3)], matrix[(1, 3)], matrix[(2, 3)])
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }
}

/// Extension trait for Mat4 with additional convenience methods
pub trait Mat4Ext {
    /// Create a rotation matrix around the X axis
    fn rotation_x(angle: f32) -> Mat4;

    /// Create a rotation matrix around the Y axis
    fn rotation_y(angle: f32) -> Mat4;

    /// Create a rotation matrix around the Z axis
    fn rotation_z(angle: f32) -> Mat4;

    /// Create a right-handed perspective projection (clip depth in [-1, 1])
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Create a right-handed look-at view matrix
    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn rotation_x(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::x_axis(), angle)
    }

    fn rotation_y(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::y_axis(), angle)
    }

    fn rotation_z(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::z_axis(), angle)
    }

    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        Mat4::new_perspective(aspect, fov_y, near, far)
    }

    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        Mat4::look_at_rh(&Point3::from(eye), &Point3::from(target), &up)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_transform_order_is_translate_rotate_scale() {
        let transform = Transform {
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Vec3::new(0.0, 0.0, 90.0),
            scale: Vec3::new(2.0, 2.0, 2.0),
        };

        // Local +X scaled by 2, rotated 90° about Z lands on +Y, then translated
        let point = transform.to_matrix().transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(point.coords, Vec3::new(1.0, 4.0, 3.0), epsilon = 1e-5);
    }

    #[test]
    fn test_rotation_x_applied_outermost() {
        // Rx(90) * Ry(90): +Z goes to +X under Ry, then Rx leaves X alone
        let m = euler_rotation_matrix(Vec3::new(90.0, 90.0, 0.0));
        let v = m.transform_vector(&Vec3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(v, Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_euler_extraction_recovers_angles() {
        let angles = Vec3::new(30.0, -45.0, 60.0);
        let m = euler_rotation_matrix(angles);
        assert_relative_eq!(extract_euler_xyz(&m), angles, epsilon = 1e-3);
    }

    #[test]
    fn test_euler_extraction_at_gimbal_lock_rebuilds_same_matrix() {
        let m = euler_rotation_matrix(Vec3::new(20.0, 90.0, 10.0));
        let rebuilt = euler_rotation_matrix(extract_euler_xyz(&m));
        assert_relative_eq!(rebuilt, m, epsilon = 1e-4);
    }

    #[test]
    fn test_translation_of() {
        let m = Mat4::new_translation(&Vec3::new(4.0, -1.0, 2.5));
        assert_eq!(translation_of(&m), Vec3::new(4.0, -1.0, 2.5));
    }
}
