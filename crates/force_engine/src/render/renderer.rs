//! Two-pass scene renderer
//!
//! `begin_scene` fixes the camera and clears last frame's state, `submit`
//! collects lights and draw commands from the graph, `execute` issues them.

use super::{
    BackendResult, CameraState, DebugOverlay, DebugOverlayPass, DrawCommand, GraphicsBackend, LightList, RenderQueue,
    Shader, UniformValue,
};
use crate::components::{CameraComponent, LightComponent, RendererComponent};
use crate::config::RenderConfig;
use crate::physics::ColliderRegistry;
use crate::scene::SceneGraph;
use std::sync::Arc;

/// Name of the light uniform block
pub const LIGHT_BLOCK_NAME: &str = "Lights";

/// Counters for the last frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Draw commands produced by the submit pass
    pub commands_submitted: usize,
    /// Draw calls issued by the execute pass
    pub draws_executed: usize,
    /// Commands skipped because their material had no shader
    pub draws_skipped: usize,
    /// Lights uploaded
    pub lights: usize,
    /// Lights dropped because of the light cap
    pub lights_dropped: usize,
    /// Boxes drawn by the debug overlay
    pub overlay_boxes: usize,
    /// Backend calls that failed
    pub backend_errors: usize,
}

/// Collect-then-draw renderer for a [`SceneGraph`]
#[derive(Debug)]
pub struct SceneRenderer {
    queue: RenderQueue,
    lights: LightList,
    camera: CameraState,
    aspect_ratio: f32,
    default_camera_logged: bool,
    overlay: DebugOverlayPass,
    stats: FrameStats,
}

impl SceneRenderer {
    /// Create a renderer; `aspect_ratio` is used by the fallback camera
    pub fn new(config: &RenderConfig, aspect_ratio: f32) -> Self {
        let flags = if config.debug_overlay {
            DebugOverlay::all()
        } else {
            DebugOverlay::empty()
        };
        Self {
            queue: RenderQueue::new(),
            lights: LightList::new(config.max_lights),
            camera: CameraState::default_for_aspect(aspect_ratio),
            aspect_ratio,
            default_camera_logged: false,
            overlay: DebugOverlayPass::new(flags),
            stats: FrameStats::default(),
        }
    }

    /// Start a frame: clear the queue and lights, fix the camera
    ///
    /// The active camera is the first camera module in pre-order whose node
    /// has a world matrix. Without one, a default camera at (0, 0, 3) is used.
    pub fn begin_scene(&mut self, graph: &SceneGraph) {
        self.queue.clear();
        self.lights.clear();
        self.stats = FrameStats::default();

        let active = graph.pre_order().into_iter().find_map(|id| {
            let node = graph.get(id)?;
            let camera = node.component::<CameraComponent>()?;
            node.world_matrix().map(|world| camera.state(world))
        });

        self.camera = match active {
            Some(camera) => camera,
            None => {
                if !self.default_camera_logged {
                    log::info!("No camera in scene, using default camera at (0, 0, 3)");
                    self.default_camera_logged = true;
                }
                CameraState::default_for_aspect(self.aspect_ratio)
            }
        };
    }

    /// Walk the graph in pre-order collecting lights and draw commands
    ///
    /// A renderer module contributes one command per sub-mesh whose material
    /// resolves: the module's override wins over the model's own slot.
    pub fn submit(&mut self, graph: &SceneGraph) {
        for id in graph.pre_order() {
            let Some(node) = graph.get(id) else {
                continue;
            };

            if let Some(light) = node.component::<LightComponent>() {
                match node.world_position() {
                    Some(position) => {
                        self.lights.push(light.to_active(position));
                    }
                    None => log::trace!("Light on {:?} has no world position yet", id),
                }
            }

            let Some(renderer) = node.component::<RendererComponent>() else {
                continue;
            };
            let Some(model) = renderer.model() else {
                continue;
            };
            let model_matrix = node.world_matrix_or_identity();

            for (mesh, own_material) in model.parts() {
                let material = renderer.material_override().or(own_material);
                if let Some(material) = material {
                    self.queue.push(DrawCommand {
                        node: id,
                        mesh: Arc::clone(mesh),
                        material: Arc::clone(material),
                        model_matrix,
                    });
                }
            }
        }

        self.stats.commands_submitted = self.queue.len();
        self.stats.lights = self.lights.len();
        self.stats.lights_dropped = self.lights.dropped();
    }

    /// Issue every queued command in submission order
    ///
    /// Backend failures are logged and counted; the frame continues.
    pub fn execute(&mut self, backend: &mut dyn GraphicsBackend) -> FrameStats {
        let block = self.lights.to_block();
        let light_bytes = bytemuck::bytes_of(&block);
        let light_count = i32::try_from(self.lights.len()).unwrap_or(i32::MAX);

        for command in self.queue.commands() {
            let Some(shader) = &command.material.shader else {
                self.stats.draws_skipped += 1;
                continue;
            };

            let uniforms = FrameUniforms {
                camera: &self.camera,
                light_bytes,
                light_count,
            };
            let result = issue_draw(command, shader, &uniforms, backend);

            match result {
                Ok(()) => self.stats.draws_executed += 1,
                Err(e) => {
                    log::warn!("Draw for node {:?} failed: {}", command.node, e);
                    self.stats.backend_errors += 1;
                }
            }
        }

        self.stats
    }

    /// Draw the debug overlay, if enabled, after the main pass
    pub fn draw_overlay(
        &mut self,
        graph: &SceneGraph,
        colliders: &ColliderRegistry,
        backend: &mut dyn GraphicsBackend,
    ) -> FrameStats {
        if self.overlay.flags.is_empty() {
            return self.stats;
        }
        match self
            .overlay
            .draw(graph, colliders, &self.camera, backend)
        {
            Ok(boxes) => self.stats.overlay_boxes = boxes,
            Err(e) => {
                log::debug!("Debug overlay failed: {}", e);
                self.stats.backend_errors += 1;
            }
        }
        self.stats
    }

    /// Enable or disable overlay shapes
    pub fn set_overlay(&mut self, flags: DebugOverlay) {
        self.overlay.flags = flags;
    }

    /// Camera fixed by the last `begin_scene`
    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    /// Commands submitted this frame
    pub fn queue(&self) -> &RenderQueue {
        &self.queue
    }

    /// Lights collected this frame
    pub fn lights(&self) -> &LightList {
        &self.lights
    }

    /// Counters for the current frame
    pub fn stats(&self) -> FrameStats {
        self.stats
    }
}

/// State shared by every draw of a frame
struct FrameUniforms<'a> {
    camera: &'a CameraState,
    light_bytes: &'a [u8],
    light_count: i32,
}

fn issue_draw(
    command: &DrawCommand,
    shader: &Shader,
    frame: &FrameUniforms<'_>,
    backend: &mut dyn GraphicsBackend,
) -> BackendResult<()> {
    shader.bind(backend)?;
    shader.set(backend, "view", UniformValue::Mat4(frame.camera.view))?;
    shader.set(backend, "projection", UniformValue::Mat4(frame.camera.projection))?;
    shader.set(backend, "viewPos", UniformValue::Vec3(frame.camera.position))?;
    backend.set_uniform_block(shader.handle, LIGHT_BLOCK_NAME, frame.light_bytes)?;
    shader.set(backend, "lightCount", UniformValue::Int(frame.light_count))?;
    command.material.apply(backend)?;
    shader.set(backend, "model", UniformValue::Mat4(command.model_matrix))?;
    backend.draw_mesh(command.mesh.handle)
}
