//! Continuous rotation, in place or as an orbit around a pivot

use crate::component::{Component, ComponentContext, ComponentError, TokenStream};
use crate::foundation::math::{euler_rotation_matrix, extract_euler_xyz, utils, Mat4, Vec3};
use nalgebra::Unit;
use std::any::Any;

/// Spins its owner around an axis
///
/// Without a pivot the owner's Euler angles grow along the axis. With a
/// pivot the owner orbits it rigidly: the offset captured at attach time and
/// the attach-time orientation are both rotated by the accumulated angle.
#[derive(Debug, Clone, PartialEq)]
pub struct SpinComponent {
    axis: Unit<Vec3>,
    /// Degrees per second
    pub speed: f32,
    pivot: Option<Vec3>,
    angle: f32,
    initial_offset: Vec3,
    initial_rotation: Mat4,
}

impl SpinComponent {
    /// Registry key
    pub const TYPE_NAME: &'static str = "SpinComponent";

    /// Spin in place around `axis`
    pub fn new(axis: Vec3, speed: f32) -> Result<Self, ComponentError> {
        let axis = Unit::try_new(axis, 1.0e-6)
            .ok_or_else(|| ComponentError::Invalid("spin axis must be non-zero".to_string()))?;
        Ok(Self {
            axis,
            speed,
            pivot: None,
            angle: 0.0,
            initial_offset: Vec3::zeros(),
            initial_rotation: Mat4::identity(),
        })
    }

    /// Orbit `pivot` around `axis`
    pub fn with_pivot(axis: Vec3, speed: f32, pivot: Vec3) -> Result<Self, ComponentError> {
        let mut spin = Self::new(axis, speed)?;
        spin.pivot = Some(pivot);
        Ok(spin)
    }

    /// Parse `ax ay az speed [px py pz]`
    pub fn from_tokens(tokens: &mut TokenStream<'_>) -> Result<Self, ComponentError> {
        let axis = tokens.next_vec3("axis")?;
        let speed = tokens.next_f32("speed")?;
        match tokens.optional_vec3("pivot")? {
            Some(pivot) => Self::with_pivot(axis, speed, pivot),
            None => Self::new(axis, speed),
        }
    }

    /// Normalized spin axis
    pub fn axis(&self) -> Vec3 {
        self.axis.into_inner()
    }

    /// Orbit center, if any
    pub fn pivot(&self) -> Option<Vec3> {
        self.pivot
    }

    /// Degrees turned so far around the pivot
    pub fn angle(&self) -> f32 {
        self.angle
    }
}

impl Component for SpinComponent {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn on_attach(&mut self, ctx: &mut ComponentContext<'_>) {
        let (Some(pivot), Some(transform)) = (self.pivot, ctx.transform()) else {
            return;
        };
        self.initial_offset = transform.position - pivot;
        self.initial_rotation = euler_rotation_matrix(transform.rotation);
    }

    fn on_update(&mut self, ctx: &mut ComponentContext<'_>, delta_time: f32) {
        let Some(transform) = ctx.transform_mut() else {
            return;
        };

        match self.pivot {
            Some(pivot) => {
                self.angle += self.speed * delta_time;
                let orbit = Mat4::from_axis_angle(&self.axis, utils::deg_to_rad(self.angle));
                transform.position = pivot + orbit.transform_vector(&self.initial_offset);
                transform.rotation = extract_euler_xyz(&(orbit * self.initial_rotation));
            }
            None => transform.rotation += self.axis.into_inner() * self.speed * delta_time,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Transform;
    use crate::input::NoInput;
    use crate::scene::Scene;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_optional_pivot() {
        let spin = SpinComponent::from_tokens(&mut TokenStream::new("0 2 0 90")).unwrap();
        assert_eq!(spin.axis(), Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(spin.pivot(), None);

        let spin = SpinComponent::from_tokens(&mut TokenStream::new("0 0 1 45 1 2 3")).unwrap();
        assert_eq!(spin.pivot(), Some(Vec3::new(1.0, 2.0, 3.0)));

        assert!(SpinComponent::from_tokens(&mut TokenStream::new("0 0 0 45")).is_err());
        assert!(SpinComponent::from_tokens(&mut TokenStream::new("0 0 1 45 1 2")).is_err());
    }

    #[test]
    fn test_spin_in_place_accumulates_euler_angles() {
        let mut scene = Scene::new();
        let node = scene.graph.create_node(None);
        let spin = SpinComponent::new(Vec3::new(0.0, 1.0, 0.0), 90.0).unwrap();
        scene.attach(node, Box::new(spin), &NoInput).unwrap();

        scene.update(0.5, &NoInput);
        scene.update(0.5, &NoInput);
        assert_relative_eq!(scene.graph.transform(node).unwrap().rotation, Vec3::new(0.0, 90.0, 0.0));
    }

    #[test]
    fn test_orbit_keeps_relative_orientation() {
        let mut scene = Scene::new();
        let node = scene
            .graph
            .spawn(None, Transform::from_position(Vec3::new(2.0, 0.0, 0.0)), None)
            .unwrap();
        let spin = SpinComponent::with_pivot(Vec3::new(0.0, 0.0, 1.0), 90.0, Vec3::zeros()).unwrap();
        scene.attach(node, Box::new(spin), &NoInput).unwrap();

        scene.update(1.0, &NoInput);
        let transform = *scene.graph.transform(node).unwrap();
        assert_relative_eq!(transform.position, Vec3::new(0.0, 2.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(transform.rotation, Vec3::new(0.0, 0.0, 90.0), epsilon = 1e-3);

        scene.update(1.0, &NoInput);
        let transform = scene.graph.transform(node).unwrap();
        assert_relative_eq!(transform.position, Vec3::new(-2.0, 0.0, 0.0), epsilon = 1e-5);
    }
}
