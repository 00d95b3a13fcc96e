//! Game-specific components

use crate::config::GameplayConfig;
use force_engine::assets::{load_material, primitives, AssetContext};
use force_engine::component::{Component, ComponentContext, ComponentError, ComponentRegistry, TokenStream};
use force_engine::components::{boxed, ColliderComponent, LinearMovementComponent, PhysicsComponent, RendererComponent};
use force_engine::foundation::math::{Transform, Vec3};
use force_engine::physics::ColliderId;
use force_engine::render::Model;
use force_engine::scene::NodeId;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::any::Any;
use std::sync::Arc;

/// Name given to spawned pipe nodes
pub const PIPE_NODE_NAME: &str = "Pipe";

/// Register the game components, capturing the gameplay settings
pub fn register(registry: &mut ComponentRegistry, settings: &GameplayConfig) {
    let settings = settings.clone();
    registry.register(
        GameManagerComponent::TYPE_NAME,
        move |tokens: &mut TokenStream<'_>, assets: &mut AssetContext<'_>| {
            boxed(GameManagerComponent::from_tokens(tokens, assets, &settings))
        },
    );
    registry.register(
        PipeComponent::TYPE_NAME,
        |tokens: &mut TokenStream<'_>, _: &mut AssetContext<'_>| boxed(PipeComponent::from_tokens(tokens)),
    );
}

/// Round logic: collision checks, resets and pipe spawning
pub struct GameManagerComponent {
    /// Name of the player node
    pub player_name: String,

    /// Name of the left boundary node
    pub boundary_name: String,

    settings: GameplayConfig,
    pipe_model: Option<Arc<Model>>,
    root: Option<NodeId>,
    player: Option<NodeId>,
    boundary: Option<NodeId>,
    spawn_timer: f32,
    resets: u32,
    pipes_spawned: u32,
    rng: StdRng,
}

impl GameManagerComponent {
    /// Registry key
    pub const TYPE_NAME: &'static str = "GameManagerComponent";

    /// Create a manager for the named player and boundary nodes
    pub fn new(player_name: &str, boundary_name: &str, settings: GameplayConfig) -> Self {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            player_name: player_name.to_string(),
            boundary_name: boundary_name.to_string(),
            spawn_timer: settings.spawn_interval,
            settings,
            pipe_model: None,
            root: None,
            player: None,
            boundary: None,
            resets: 0,
            pipes_spawned: 0,
            rng,
        }
    }

    /// Model given to spawned pipes
    pub fn with_pipe_model(mut self, model: Arc<Model>) -> Self {
        self.pipe_model = Some(model);
        self
    }

    /// Parse `playerName boundaryName` and build the pipe model
    ///
    /// The pipe is a cube of the configured size. A missing pipe material
    /// falls back to the default material; without either, pipes still
    /// collide but are not drawn.
    pub fn from_tokens(
        tokens: &mut TokenStream<'_>,
        assets: &mut AssetContext<'_>,
        settings: &GameplayConfig,
    ) -> Result<Self, ComponentError> {
        let player_name = tokens.next_str("playerName")?;
        let boundary_name = tokens.next_str("boundaryName")?;
        let mut manager = Self::new(player_name, boundary_name, settings.clone());

        let [x, y, z] = settings.pipe_size;
        let geometry = primitives::cube(Vec3::new(x, y, z), true, true);
        let mesh = assets
            .create_mesh(&geometry)
            .map_err(|e| ComponentError::Invalid(format!("pipe mesh: {e}")))?;

        let (material, _) = load_material(&settings.pipe_material, assets);
        let material = match material {
            Some(material) => Some(material),
            None => assets.default_material().ok(),
        };

        let mut model = Model::new("pipe");
        match material {
            Some(material) => model.push_mesh_with_material(mesh, material),
            None => model.push_mesh(mesh),
        }
        manager.pipe_model = Some(Arc::new(model));
        Ok(manager)
    }

    /// Rounds restarted so far
    pub fn resets(&self) -> u32 {
        self.resets
    }

    /// Pipe nodes spawned so far
    pub fn pipes_spawned(&self) -> u32 {
        self.pipes_spawned
    }

    fn resolve(&mut self, ctx: &ComponentContext<'_>) {
        let Some(root) = ctx.graph.root_of(ctx.owner()) else {
            return;
        };
        self.root = Some(root);
        if self.player.is_none() {
            self.player = ctx.graph.find_descendant(root, &self.player_name);
        }
        if self.boundary.is_none() {
            self.boundary = ctx.graph.find_descendant(root, &self.boundary_name);
        }
    }

    fn player_hit(&self, ctx: &ComponentContext<'_>, player: ColliderId, boundary: ColliderId) -> bool {
        let mut hit = false;
        for (other, _) in ctx.colliders.iter() {
            if other == player || other == boundary {
                continue;
            }
            if ctx.colliders.overlaps(player, other, ctx.graph) {
                hit = true;
                break;
            }
        }
        hit
    }

    fn reset_round(&mut self, ctx: &mut ComponentContext<'_>, player: NodeId, root: NodeId) {
        let [x, y, z] = self.settings.player_start;
        if let Some(transform) = ctx.graph.transform_mut(player) {
            transform.position = Vec3::new(x, y, z);
        }
        if let Some(body) = ctx.graph.component_mut::<PhysicsComponent>(player) {
            body.velocity = Vec3::zeros();
        }

        let pipes: Vec<NodeId> = ctx
            .graph
            .children(root)
            .iter()
            .copied()
            .filter(|&child| ctx.graph.component::<PipeComponent>(child).is_some())
            .collect();
        for pipe in &pipes {
            ctx.graph.mark_pending_destroy(*pipe);
        }

        self.spawn_timer = self.settings.spawn_interval;
        self.resets += 1;
        log::info!("Round reset #{} ({} pipes cleared)", self.resets, pipes.len());
    }

    fn spawn_pipes(&mut self, ctx: &mut ComponentContext<'_>, root: NodeId) {
        let Some(model) = self.pipe_model.clone() else {
            return;
        };
        let settings = &self.settings;
        let gap_center = if settings.gap_center_max > settings.gap_center_min {
            self.rng.gen_range(settings.gap_center_min..=settings.gap_center_max)
        } else {
            settings.gap_center_min
        };
        let half_gap = settings.gap_size / 2.0;
        let half_height = settings.pipe_size[1] / 2.0;
        let [sx, sy, sz] = settings.pipe_size;

        for y in [gap_center - half_gap - half_height, gap_center + half_gap + half_height] {
            let position = Vec3::new(settings.spawn_x, y, 0.0);
            let node = match ctx.graph.spawn(Some(PIPE_NODE_NAME), Transform::from_position(position), Some(root)) {
                Ok(node) => node,
                Err(e) => {
                    log::warn!("Pipe spawn failed: {}", e);
                    return;
                }
            };
            ctx.attach(node, Box::new(RendererComponent::new(Arc::clone(&model))));
            ctx.attach(node, Box::new(ColliderComponent::new(Vec3::new(sx, sy, sz), false)));
            ctx.attach(
                node,
                Box::new(LinearMovementComponent::new(Vec3::new(-settings.pipe_speed, 0.0, 0.0))),
            );
            ctx.attach(node, Box::new(PipeComponent::new(&self.boundary_name)));
            self.pipes_spawned += 1;
        }
        log::debug!("Spawned pipe pair with gap at {:.2}", gap_center);
    }
}

impl Component for GameManagerComponent {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn on_attach(&mut self, ctx: &mut ComponentContext<'_>) {
        self.resolve(ctx);
        if self.player.is_none() || self.boundary.is_none() {
            log::debug!(
                "Game manager waiting for '{}' and '{}'",
                self.player_name,
                self.boundary_name
            );
        }
    }

    fn on_update(&mut self, ctx: &mut ComponentContext<'_>, delta_time: f32) {
        if self.player.is_none() || self.boundary.is_none() {
            self.resolve(ctx);
        }
        let (Some(root), Some(player), Some(boundary)) = (self.root, self.player, self.boundary) else {
            return;
        };
        let (Some(player_collider), Some(boundary_collider)) = (
            ctx.colliders.find_by_owner(player),
            ctx.colliders.find_by_owner(boundary),
        ) else {
            return;
        };

        let hit = self.player_hit(ctx, player_collider, boundary_collider);
        let fell = ctx
            .graph
            .transform(player)
            .is_some_and(|t| t.position.y < self.settings.floor_y);
        if hit || fell {
            self.reset_round(ctx, player, root);
            return;
        }

        self.spawn_timer -= delta_time;
        if self.spawn_timer <= 0.0 {
            self.spawn_timer = self.settings.spawn_interval;
            self.spawn_pipes(ctx, root);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Removes its pipe once it reaches the left boundary
#[derive(Debug, Clone, PartialEq)]
pub struct PipeComponent {
    /// Name of the boundary node
    pub boundary_name: String,
    collider: Option<ColliderId>,
    boundary: Option<NodeId>,
}

impl PipeComponent {
    /// Registry key
    pub const TYPE_NAME: &'static str = "PipeComponent";

    /// Create a pipe watching the named boundary
    pub fn new(boundary_name: &str) -> Self {
        Self {
            boundary_name: boundary_name.to_string(),
            collider: None,
            boundary: None,
        }
    }

    /// Parse `boundaryName`
    pub fn from_tokens(tokens: &mut TokenStream<'_>) -> Result<Self, ComponentError> {
        Ok(Self::new(tokens.next_str("boundaryName")?))
    }
}

impl Component for PipeComponent {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn on_attach(&mut self, ctx: &mut ComponentContext<'_>) {
        self.collider = ctx.sibling::<ColliderComponent>().and_then(ColliderComponent::collider_id);
        if self.collider.is_none() {
            log::warn!("Pipe on {:?} has no collider", ctx.owner());
        }
        self.boundary = ctx
            .graph
            .root_of(ctx.owner())
            .and_then(|root| ctx.graph.find_descendant(root, &self.boundary_name));
    }

    fn on_update(&mut self, ctx: &mut ComponentContext<'_>, _delta_time: f32) {
        let (Some(collider), Some(boundary)) = (self.collider, self.boundary) else {
            return;
        };
        let Some(boundary_collider) = ctx.colliders.find_by_owner(boundary) else {
            return;
        };
        if ctx.colliders.overlaps(collider, boundary_collider, ctx.graph) {
            ctx.destroy_owner();
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
