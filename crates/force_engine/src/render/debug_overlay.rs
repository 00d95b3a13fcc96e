//! Wireframe debug overlay
//!
//! Draws a box at every light and around every collider after the main pass.
//! Reads the scene graph and the collider registry only, so it never touches
//! the render queue. Lights past the upload cap still get a marker.

use super::{BackendResult, CameraState, GraphicsBackend};
use crate::components::LightComponent;
use crate::foundation::math::Vec3;
use crate::physics::{Aabb, ColliderRegistry};
use crate::scene::SceneGraph;
use bitflags::bitflags;

bitflags! {
    /// Shapes drawn by the debug overlay
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct DebugOverlay: u32 {
        /// Small box at every light in the scene
        const LIGHTS = 1 << 0;
        /// Bounding box of every registered collider
        const COLLIDERS = 1 << 1;
    }
}

/// Edges of a box as index pairs into [`Aabb::corners`]
const BOX_EDGES: [(usize, usize); 12] = [
    (0, 1), (1, 2), (2, 3), (3, 0),
    (4, 5), (5, 6), (6, 7), (7, 4),
    (0, 4), (1, 5), (2, 6), (3, 7),
];

/// Overlay pass configuration
#[derive(Debug, Clone)]
pub struct DebugOverlayPass {
    /// Enabled shape kinds
    pub flags: DebugOverlay,
    /// Half size of light markers
    pub light_marker_extent: f32,
    /// Color of light markers
    pub light_color: Vec3,
    /// Color of collider boxes
    pub collider_color: Vec3,
}

impl Default for DebugOverlayPass {
    fn default() -> Self {
        Self {
            flags: DebugOverlay::empty(),
            light_marker_extent: 0.1,
            light_color: Vec3::new(1.0, 1.0, 0.0),
            collider_color: Vec3::new(0.0, 1.0, 0.0),
        }
    }
}

impl DebugOverlayPass {
    /// Pass drawing `flags`
    pub fn new(flags: DebugOverlay) -> Self {
        Self {
            flags,
            ..Self::default()
        }
    }

    /// Draw the enabled shapes; returns the number of boxes drawn
    pub fn draw(
        &self,
        graph: &SceneGraph,
        colliders: &ColliderRegistry,
        camera: &CameraState,
        backend: &mut dyn GraphicsBackend,
    ) -> BackendResult<usize> {
        let view_projection = camera.view_projection();
        let mut boxes = 0;

        if self.flags.contains(DebugOverlay::LIGHTS) {
            let lights = light_positions(graph);
            if !lights.is_empty() {
                let extent = Vec3::repeat(self.light_marker_extent);
                let mut points = Vec::with_capacity(lights.len() * BOX_EDGES.len() * 2);
                for position in &lights {
                    push_box_lines(&Aabb::from_center_extents(*position, extent), &mut points);
                }
                backend.draw_lines(&points, self.light_color, &view_projection)?;
                boxes += lights.len();
            }
        }

        if self.flags.contains(DebugOverlay::COLLIDERS) {
            let bounds: Vec<Aabb> = colliders
                .ids()
                .iter()
                .filter_map(|&id| colliders.bounds(id, graph))
                .collect();
            if !bounds.is_empty() {
                let mut points = Vec::with_capacity(bounds.len() * BOX_EDGES.len() * 2);
                for aabb in &bounds {
                    push_box_lines(aabb, &mut points);
                }
                backend.draw_lines(&points, self.collider_color, &view_projection)?;
                boxes += bounds.len();
            }
        }

        Ok(boxes)
    }
}

/// World position of every light-carrying node, in pre-order
fn light_positions(graph: &SceneGraph) -> Vec<Vec3> {
    graph
        .pre_order()
        .into_iter()
        .filter_map(|id| graph.get(id))
        .filter(|node| node.component::<LightComponent>().is_some())
        .filter_map(|node| node.world_position())
        .collect()
}

/// Append the 12 edges of `aabb` as line-list point pairs
pub fn push_box_lines(aabb: &Aabb, points: &mut Vec<Vec3>) {
    let corners = aabb.corners();
    for (a, b) in BOX_EDGES {
        points.push(corners[a]);
        points.push(corners[b]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Transform;
    use crate::physics::ColliderEntry;
    use crate::render::{BackendCall, RecordingBackend};

    #[test]
    fn test_box_has_twelve_axis_aligned_edges() {
        let mut points = Vec::new();
        push_box_lines(&Aabb::from_center_extents(Vec3::zeros(), Vec3::repeat(1.0)), &mut points);
        assert_eq!(points.len(), 24);
        for pair in points.chunks(2) {
            let delta = pair[1] - pair[0];
            let changed = (0..3).filter(|&i| delta[i] != 0.0).count();
            assert_eq!(changed, 1);
        }
    }

    fn light() -> Box<LightComponent> {
        Box::new(LightComponent::new(Vec3::repeat(1.0), 1.0))
    }

    #[test]
    fn test_overlay_draws_only_enabled_kinds() {
        let mut graph = SceneGraph::new();
        let node = graph.spawn(None, Transform::from_position(Vec3::new(1.0, 0.0, 0.0)), None).unwrap();
        let lamp = graph.create_node(Some("lamp"));
        graph.get_mut(lamp).unwrap().components.push(light());
        graph.recompute_transforms();
        let mut colliders = ColliderRegistry::new();
        colliders.register(ColliderEntry {
            owner: node,
            half_extents: Vec3::repeat(0.5),
            is_trigger: false,
        });
        let camera = CameraState::default_for_aspect(1.0);

        let mut backend = RecordingBackend::new();
        let drawn = DebugOverlayPass::new(DebugOverlay::COLLIDERS)
            .draw(&graph, &colliders, &camera, &mut backend)
            .unwrap();
        assert_eq!(drawn, 1);
        assert_eq!(backend.calls().len(), 1);
        assert!(matches!(backend.calls()[0], BackendCall::DrawLines { points: 24, .. }));

        let mut backend = RecordingBackend::new();
        let drawn = DebugOverlayPass::new(DebugOverlay::all())
            .draw(&graph, &colliders, &camera, &mut backend)
            .unwrap();
        assert_eq!(drawn, 2);
        assert_eq!(backend.calls().len(), 2);
    }

    #[test]
    fn test_every_light_gets_a_marker() {
        let mut graph = SceneGraph::new();
        for x in 0..12_u8 {
            let lamp = graph
                .spawn(None, Transform::from_position(Vec3::new(f32::from(x), 0.0, 0.0)), None)
                .unwrap();
            graph.get_mut(lamp).unwrap().components.push(light());
        }
        graph.recompute_transforms();

        let mut backend = RecordingBackend::new();
        let drawn = DebugOverlayPass::new(DebugOverlay::LIGHTS)
            .draw(&graph, &ColliderRegistry::new(), &CameraState::default_for_aspect(1.0), &mut backend)
            .unwrap();
        assert_eq!(drawn, 12);
        assert!(matches!(backend.calls()[0], BackendCall::DrawLines { points: 288, .. }));
    }
}
