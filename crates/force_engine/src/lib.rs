//! # Force Engine
//!
//! A data-driven scene runtime: scenes, materials and models are described in
//! line-oriented text files, and behavior is composed from components attached
//! to nodes of a transform hierarchy.
//!
//! ## Features
//!
//! - **Scene Graph**: parent/child transforms with cached world matrices
//! - **Components**: polymorphic behavior modules created by type name
//! - **Text Loaders**: scene, material and aggregate-model files that never fail
//! - **Collision**: axis-aligned overlap queries over a collider registry
//! - **Rendering**: two-pass collect-then-draw over a backend interface
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use force_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EngineConfig::default().with_fixed_time_step(1.0 / 60.0);
//!     let mut engine = Engine::new(config, ComponentRegistry::with_builtin())?;
//!     let mut backend = RecordingBackend::new();
//!
//!     engine.load_models("models.txt", &mut backend);
//!     engine.load_scene("game.scene", &mut backend, &NoInput);
//!     engine.run(&NoInput, &mut backend, Some(600));
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod assets;
pub mod component;
pub mod components;
pub mod config;
pub mod foundation;
pub mod input;
pub mod physics;
pub mod render;
pub mod scene;

mod engine;

pub use engine::{Engine, EngineError, RunSummary, QUIT_KEY};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        assets::{AssetContext, LoadReport, ResourceCache},
        component::{Component, ComponentContext, ComponentError, ComponentRegistry, DetachContext, TokenStream},
        components::{
            CameraComponent, ColliderComponent, FlapControllerComponent, LightComponent, LinearMovementComponent,
            PhysicsComponent, RendererComponent, SpinComponent,
        },
        config::{Config, EngineConfig},
        foundation::{
            math::{Mat4, Transform, Vec3},
            time::FrameClock,
        },
        input::{InputSource, KeyCode, KeyboardState, NoInput},
        physics::{Aabb, ColliderId, ColliderRegistry},
        render::{FrameStats, GraphicsBackend, RecordingBackend},
        scene::{NodeId, Scene, SceneGraph},
        Engine, EngineError, RunSummary,
    };
}
