//! Core engine implementation

use crate::assets::{
    load_models, AssetContext, ImageDecoder, ImageFileDecoder, LoadReport, ModelImporter, ObjImporter, ResourceCache,
};
use crate::component::ComponentRegistry;
use crate::config::{ConfigError, EngineConfig};
use crate::foundation::time::FrameClock;
use crate::input::{InputSource, KeyCode};
use crate::render::{FrameStats, GraphicsBackend, SceneRenderer};
use crate::scene::{NodeId, Scene, SceneLoader};
use std::sync::Arc;
use thiserror::Error;

/// Key that ends [`Engine::run`]
pub const QUIT_KEY: KeyCode = KeyCode::Escape;

/// Engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Configuration failed validation
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Frames and time covered by [`Engine::run`]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunSummary {
    /// Frames executed
    pub frames: u64,
    /// Simulated seconds
    pub elapsed: f32,
    /// Stats of the last frame
    pub last_frame: FrameStats,
}

/// Main engine struct
///
/// Owns the scene, the resource cache and the renderer, and drives the frame
/// sequence: update, destroy sweep, transform recompute, submit, execute.
pub struct Engine {
    /// Scene graph, components and colliders
    pub scene: Scene,

    /// Shared models, materials, shaders and textures
    pub resources: ResourceCache,

    registry: Arc<ComponentRegistry>,
    renderer: SceneRenderer,
    clock: FrameClock,
    config: EngineConfig,
    importer: Box<dyn ModelImporter>,
    decoder: Box<dyn ImageDecoder>,
    root: NodeId,
    running: bool,
}

impl Engine {
    /// Create an engine around a filled component registry
    pub fn new(config: EngineConfig, registry: ComponentRegistry) -> Result<Self, EngineError> {
        config.validate()?;
        log::info!("Initializing engine ({} component types)", registry.len());

        let mut scene = Scene::new();
        let root = scene.graph.create_node(Some("SceneRoot"));
        let renderer = SceneRenderer::new(&config.render, config.window.aspect_ratio());

        Ok(Self {
            scene,
            resources: ResourceCache::new(),
            registry: Arc::new(registry),
            renderer,
            clock: FrameClock::new(),
            config,
            importer: Box::new(ObjImporter),
            decoder: Box::new(ImageFileDecoder),
            root,
            running: true,
        })
    }

    /// Replace the model-import and image-decode collaborators
    pub fn with_collaborators(mut self, importer: Box<dyn ModelImporter>, decoder: Box<dyn ImageDecoder>) -> Self {
        self.importer = importer;
        self.decoder = decoder;
        self
    }

    /// Node every loaded scene hangs under
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Component constructors used by the scene loader
    pub fn registry(&self) -> &Arc<ComponentRegistry> {
        &self.registry
    }

    /// Active configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Renderer state of the last frame
    pub fn renderer(&self) -> &SceneRenderer {
        &self.renderer
    }

    /// Frame timing
    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Resource access for loaders and procedural spawning
    pub fn assets<'a>(&'a mut self, backend: &'a mut dyn GraphicsBackend) -> AssetContext<'a> {
        AssetContext {
            cache: &mut self.resources,
            backend,
            importer: self.importer.as_ref(),
            decoder: self.decoder.as_ref(),
            config: &self.config.assets,
        }
    }

    /// Load an aggregate-model file into the resource cache
    pub fn load_models(&mut self, path: &str, backend: &mut dyn GraphicsBackend) -> LoadReport {
        let report = load_models(path, &mut self.assets(backend));
        log::info!("Loaded {} models from {}", report.created, path);
        report
    }

    /// Load a scene file under the engine root
    ///
    /// World matrices are computed once loading finishes, so the first
    /// update pass sees valid world positions.
    pub fn load_scene(
        &mut self,
        path: &str,
        backend: &mut dyn GraphicsBackend,
        input: &dyn InputSource,
    ) -> LoadReport {
        let registry = Arc::clone(&self.registry);
        let mut assets = AssetContext {
            cache: &mut self.resources,
            backend,
            importer: self.importer.as_ref(),
            decoder: self.decoder.as_ref(),
            config: &self.config.assets,
        };
        let report = SceneLoader::new(&registry, &mut assets, input).load(path, &mut self.scene, self.root);
        self.scene.recompute_transforms();
        report
    }

    /// Run one frame
    pub fn frame(
        &mut self,
        input: &dyn InputSource,
        backend: &mut dyn GraphicsBackend,
        delta_time: f32,
    ) -> FrameStats {
        self.scene.update(delta_time, input);
        self.scene.destroy_pending();
        self.scene.recompute_transforms();

        self.renderer.begin_scene(&self.scene.graph);
        self.renderer.submit(&self.scene.graph);
        self.renderer.execute(backend);
        self.renderer
            .draw_overlay(&self.scene.graph, &self.scene.colliders, backend)
    }

    /// Run frames until `max_frames` is reached or a quit is requested
    ///
    /// A quit comes from [`QUIT_KEY`] being down or from a component calling
    /// [`ComponentContext::request_quit`](crate::component::ComponentContext::request_quit).
    /// The frame that sees the request still completes. Uses the configured
    /// fixed step when set, wall-clock time otherwise.
    pub fn run(
        &mut self,
        input: &dyn InputSource,
        backend: &mut dyn GraphicsBackend,
        max_frames: Option<u64>,
    ) -> RunSummary {
        log::info!("Starting main loop...");
        let mut summary = RunSummary::default();
        self.running = true;
        self.scene.clear_quit_request();

        while self.running && max_frames.map_or(true, |limit| summary.frames < limit) {
            let delta_time = self.tick();
            summary.last_frame = self.frame(input, backend, delta_time);
            summary.frames += 1;
            summary.elapsed += delta_time;

            if input.is_key_down(QUIT_KEY) {
                log::info!("Quit key pressed");
                self.running = false;
            } else if self.scene.quit_requested() {
                log::info!("Quit requested by a component");
                self.running = false;
            }
        }
        self.running = false;

        log::info!(
            "Main loop finished after {} frames ({:.1} fps)",
            summary.frames,
            self.clock.average_fps()
        );
        summary
    }

    /// Stop [`run`](Self::run) after the current frame
    pub fn request_quit(&mut self) {
        self.running = false;
    }

    /// Whether the loop is still running
    pub fn is_running(&self) -> bool {
        self.running
    }

    fn tick(&mut self) -> f32 {
        match self.config.fixed_time_step {
            Some(step) => self.clock.tick_fixed(step),
            None => self.clock.tick(),
        }
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("scene", &self.scene)
            .field("models", &self.resources.model_count())
            .field("frames", &self.clock.frames())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::testing::{triangle, StubDecoder, StubImporter};
    use crate::components::{ColliderComponent, PhysicsComponent, RendererComponent};
    use crate::config::AssetConfig;
    use crate::foundation::math::Vec3;
    use crate::component::{Component, ComponentContext};
    use crate::input::{KeyboardState, NoInput};
    use crate::render::{BackendCall, RecordingBackend};
    use std::any::Any;
    use std::path::Path;

    fn write(dir: &Path, name: &str, contents: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, contents).unwrap();
    }

    fn engine_in(dir: &Path) -> Engine {
        write(dir, "shaders/lit.vs", "void main() {}");
        write(dir, "shaders/lit.fs", "void main() {}");
        let assets = AssetConfig {
            assets_dir: dir.display().to_string(),
            default_vertex_shader: "shaders/lit.vs".to_string(),
            default_fragment_shader: "shaders/lit.fs".to_string(),
        };
        let config = EngineConfig::new().with_fixed_time_step(0.1).with_assets(assets);

        let mut importer = StubImporter::default();
        importer.meshes.insert("tri.obj".to_string(), vec![triangle(), triangle()]);
        Engine::new(config, ComponentRegistry::with_builtin())
            .unwrap()
            .with_collaborators(Box::new(importer), Box::new(StubDecoder))
    }

    const SCENE: &str = "\
ENTITY Camera
POSITION 0 0 10
COMPONENT CameraComponent 45 1.333 0.1 100

ENTITY Sun
POSITION 0 5 0
COMPONENT LightComponent 1 1 1 1

ENTITY Bird
COMPONENT RendererComponent tri
COMPONENT PhysicsComponent
COMPONENT ColliderComponent 1 1 1

ENTITY Beak
PARENT Bird
POSITION 0.5 0 0
COMPONENT RendererComponent tri materials/beak.mat
";

    fn loaded(dir: &Path, backend: &mut RecordingBackend) -> Engine {
        write(dir, "models.txt", "MODEL tri\nMESH tri.obj\nMATERIAL materials/body.mat\n");
        write(dir, "materials/body.mat", "SHININESS 8\n");
        write(dir, "materials/beak.mat", "SHININESS 64\n");
        write(dir, "game.scene", SCENE);

        let mut engine = engine_in(dir);
        assert!(engine.load_models("models.txt", backend).is_clean());
        let report = engine.load_scene("game.scene", backend, &NoInput);
        assert!(report.is_clean(), "{:?}", report.warnings);
        assert_eq!(report.created, 4);
        engine
    }

    #[test]
    fn test_frame_draws_every_sub_mesh_in_pre_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = RecordingBackend::new();
        let mut engine = loaded(dir.path(), &mut backend);
        backend.clear();

        let stats = engine.frame(&NoInput, &mut backend, 0.1);
        assert_eq!(stats.commands_submitted, 4);
        assert_eq!(stats.draws_executed, 4);
        assert_eq!(stats.lights, 1);
        assert_eq!(backend.drawn_meshes().len(), 4);

        let queue = engine.renderer().queue();
        let bird = engine.scene.graph.find_by_name("Bird").unwrap();
        let beak = engine.scene.graph.find_by_name("Beak").unwrap();
        let owners: Vec<_> = queue.commands().iter().map(|c| c.node).collect();
        assert_eq!(owners, vec![bird, bird, beak, beak]);
        // The beak's override replaces both model materials
        assert!(queue.commands()[2..].iter().all(|c| c.material.shininess == 64.0));
        assert!(queue.commands()[..2].iter().all(|c| c.material.shininess == 8.0));

        assert_eq!(engine.renderer().camera().position, Vec3::new(0.0, 0.0, 10.0));
    }

    #[test]
    fn test_children_follow_moving_parent() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = RecordingBackend::new();
        let mut engine = loaded(dir.path(), &mut backend);

        engine.frame(&NoInput, &mut backend, 0.1);
        let bird = engine.scene.graph.find_by_name("Bird").unwrap();
        let beak = engine.scene.graph.find_by_name("Beak").unwrap();
        let bird_position = engine.scene.graph.world_position(bird).unwrap();
        let beak_position = engine.scene.graph.world_position(beak).unwrap();

        assert!(bird_position.y < 0.0);
        assert!((beak_position.y - bird_position.y).abs() < 0.2);
        let body = engine.scene.graph.component::<PhysicsComponent>(bird).unwrap();
        assert!(body.velocity.y < 0.0);
    }

    #[test]
    fn test_destroyed_subtree_leaves_queue_and_registry() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = RecordingBackend::new();
        let mut engine = loaded(dir.path(), &mut backend);
        assert_eq!(engine.scene.colliders.len(), 1);

        let bird = engine.scene.graph.find_by_name("Bird").unwrap();
        engine.scene.graph.mark_pending_destroy(bird);
        let stats = engine.frame(&NoInput, &mut backend, 0.1);

        assert_eq!(stats.commands_submitted, 0);
        assert!(engine.scene.graph.find_by_name("Beak").is_none());
        assert!(engine.scene.colliders.is_empty());
    }

    #[test]
    fn test_run_stops_at_frame_budget_with_fixed_step() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = RecordingBackend::new();
        let mut engine = engine_in(dir.path());

        let summary = engine.run(&NoInput, &mut backend, Some(5));
        assert_eq!(summary.frames, 5);
        assert!((summary.elapsed - 0.5).abs() < 1e-5);
        assert_eq!(engine.clock().frames(), 5);
    }

    #[test]
    fn test_quit_key_ends_unbounded_run() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = RecordingBackend::new();
        let mut engine = engine_in(dir.path());
        let mut input = KeyboardState::new();
        input.handle_key_input(QUIT_KEY, true);

        let summary = engine.run(&input, &mut backend, None);
        assert_eq!(summary.frames, 1);
        assert!(!engine.is_running());
    }

    /// Asks the loop to stop on its third update
    struct StopAfterThree {
        updates: u32,
    }

    impl Component for StopAfterThree {
        fn type_name(&self) -> &'static str {
            "StopAfterThree"
        }

        fn on_update(&mut self, ctx: &mut ComponentContext<'_>, _delta_time: f32) {
            self.updates += 1;
            if self.updates == 3 {
                ctx.request_quit();
            }
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[test]
    fn test_component_quit_request_ends_run() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = RecordingBackend::new();
        let mut engine = engine_in(dir.path());
        let root = engine.root();
        engine
            .scene
            .attach(root, Box::new(StopAfterThree { updates: 0 }), &NoInput)
            .unwrap();

        let summary = engine.run(&NoInput, &mut backend, None);
        assert_eq!(summary.frames, 3);
        assert!(engine.scene.quit_requested());

        // A new run starts from a cleared request
        let summary = engine.run(&NoInput, &mut backend, Some(2));
        assert_eq!(summary.frames, 2);
    }

    #[test]
    fn test_procedural_spawn_through_assets() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = RecordingBackend::new();
        let mut engine = engine_in(dir.path());

        let model = {
            let mut assets = engine.assets(&mut backend);
            let mesh = assets
                .create_mesh(&crate::assets::primitives::cube(Vec3::new(1.0, 1.0, 1.0), true, true))
                .unwrap();
            let material = assets.default_material().unwrap();
            let mut model = crate::render::Model::new("crate");
            model.push_mesh_with_material(mesh, material);
            assets.register_model(model)
        };

        let root = engine.root();
        let node = engine.scene.graph.spawn(Some("crate"), Default::default(), Some(root)).unwrap();
        engine
            .scene
            .attach(node, Box::new(RendererComponent::new(model)), &NoInput)
            .unwrap();
        engine
            .scene
            .attach(node, Box::new(ColliderComponent::new(Vec3::new(1.0, 1.0, 1.0), false)), &NoInput)
            .unwrap();

        let stats = engine.frame(&NoInput, &mut backend, 0.1);
        assert_eq!(stats.draws_executed, 1);
        assert_eq!(
            backend.count(|call| matches!(call, BackendCall::CreateMesh { vertices: 24, indices: 36, .. })),
            1
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EngineConfig::new().with_fixed_time_step(-1.0);
        assert!(matches!(
            Engine::new(config, ComponentRegistry::new()),
            Err(EngineError::Config(_))
        ));
    }
}
