//! Built-in behavior modules
//!
//! | Type token | Fields |
//! |---|---|
//! | `RendererComponent` | `modelName [materialPath]` |
//! | `PhysicsComponent` | `[gravity] [terminalVelocity]` |
//! | `SpinComponent` | `ax ay az speed [px py pz]` |
//! | `LinearMovementComponent` | `vx vy vz` |
//! | `ColliderComponent` | `sx sy sz [isTrigger]` |
//! | `LightComponent` | `r g b intensity [constant linear quadratic]` |
//! | `CameraComponent` | `[fov [aspect [near [far]]]]` |
//! | `FlapControllerComponent` | `[force] [key]` |

pub mod camera;
pub mod collider;
pub mod flap_controller;
pub mod light;
pub mod linear_movement;
pub mod physics;
pub mod renderer;
pub mod spin;

pub use camera::CameraComponent;
pub use collider::ColliderComponent;
pub use flap_controller::FlapControllerComponent;
pub use light::LightComponent;
pub use linear_movement::LinearMovementComponent;
pub use physics::PhysicsComponent;
pub use renderer::RendererComponent;
pub use spin::SpinComponent;

use crate::assets::AssetContext;
use crate::component::{Component, ComponentError, ComponentRegistry, TokenStream};

/// Register every built-in module under its type token
pub fn register_builtin(registry: &mut ComponentRegistry) {
    registry.register(
        RendererComponent::TYPE_NAME,
        |tokens: &mut TokenStream<'_>, assets: &mut AssetContext<'_>| {
            boxed(RendererComponent::from_tokens(tokens, assets))
        },
    );
    registry.register(
        PhysicsComponent::TYPE_NAME,
        |tokens: &mut TokenStream<'_>, _: &mut AssetContext<'_>| boxed(PhysicsComponent::from_tokens(tokens)),
    );
    registry.register(
        SpinComponent::TYPE_NAME,
        |tokens: &mut TokenStream<'_>, _: &mut AssetContext<'_>| boxed(SpinComponent::from_tokens(tokens)),
    );
    registry.register(
        LinearMovementComponent::TYPE_NAME,
        |tokens: &mut TokenStream<'_>, _: &mut AssetContext<'_>| boxed(LinearMovementComponent::from_tokens(tokens)),
    );
    registry.register(
        ColliderComponent::TYPE_NAME,
        |tokens: &mut TokenStream<'_>, _: &mut AssetContext<'_>| boxed(ColliderComponent::from_tokens(tokens)),
    );
    registry.register(
        LightComponent::TYPE_NAME,
        |tokens: &mut TokenStream<'_>, _: &mut AssetContext<'_>| boxed(LightComponent::from_tokens(tokens)),
    );
    registry.register(
        CameraComponent::TYPE_NAME,
        |tokens: &mut TokenStream<'_>, _: &mut AssetContext<'_>| boxed(CameraComponent::from_tokens(tokens)),
    );
    registry.register(
        FlapControllerComponent::TYPE_NAME,
        |tokens: &mut TokenStream<'_>, _: &mut AssetContext<'_>| boxed(FlapControllerComponent::from_tokens(tokens)),
    );
}

/// Erase a parsed module into the registry's return type
pub fn boxed<C: Component>(component: Result<C, ComponentError>) -> Result<Box<dyn Component>, ComponentError> {
    Ok(Box::new(component?))
}
