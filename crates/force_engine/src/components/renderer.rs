//! Binds a cached model (and optional material override) to a node

use crate::assets::{load_material, AssetContext};
use crate::component::{Component, ComponentError, TokenStream};
use crate::render::{Material, Model};
use std::any::Any;
use std::sync::Arc;

/// Makes its owner visible in the render pass
///
/// The override material, when present, replaces every sub-mesh material of
/// the model. A module without a model draws nothing.
#[derive(Debug, Clone, Default)]
pub struct RendererComponent {
    model: Option<Arc<Model>>,
    material: Option<Arc<Material>>,
}

impl RendererComponent {
    /// Registry key
    pub const TYPE_NAME: &'static str = "RendererComponent";

    /// Draw `model` with its own materials
    pub fn new(model: Arc<Model>) -> Self {
        Self {
            model: Some(model),
            material: None,
        }
    }

    /// Draw every sub-mesh with `material`
    pub fn with_material(mut self, material: Arc<Material>) -> Self {
        self.material = Some(material);
        self
    }

    /// Parse `modelName [materialPath]`
    ///
    /// An unknown model or an unloadable material is logged and leaves the
    /// corresponding slot empty.
    pub fn from_tokens(tokens: &mut TokenStream<'_>, assets: &mut AssetContext<'_>) -> Result<Self, ComponentError> {
        let model_name = tokens.next_str("modelName")?;
        let model = assets.model(model_name);
        if model.is_none() {
            log::warn!("RendererComponent requested unknown model '{}'", model_name);
        }

        let material = match tokens.optional_str() {
            Some(path) => load_material(path, assets).0,
            None => None,
        };
        Ok(Self { model, material })
    }

    /// Model drawn by this module
    pub fn model(&self) -> Option<&Arc<Model>> {
        self.model.as_ref()
    }

    /// Material replacing the model's own
    pub fn material_override(&self) -> Option<&Arc<Material>> {
        self.material.as_ref()
    }

    /// Swap the drawn model
    pub fn set_model(&mut self, model: Option<Arc<Model>>) {
        self.model = model;
    }
}

impl Component for RendererComponent {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
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
    use crate::assets::testing::AssetFixture;

    #[test]
    fn test_resolves_cached_model_and_material() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("gold.mat"), "SHININESS 90\n").unwrap();
        let mut fixture = AssetFixture::in_dir(dir.path());
        fixture.cache.insert_model(Model::new("coin"));

        let renderer =
            RendererComponent::from_tokens(&mut TokenStream::new("coin gold.mat"), &mut fixture.context()).unwrap();
        assert_eq!(renderer.model().map(|m| m.name.as_str()), Some("coin"));
        assert_eq!(renderer.material_override().map(|m| m.shininess), Some(90.0));
    }

    #[test]
    fn test_unknown_model_builds_empty_module() {
        let mut fixture = AssetFixture::new();
        let renderer = RendererComponent::from_tokens(&mut TokenStream::new("ghost"), &mut fixture.context()).unwrap();
        assert!(renderer.model().is_none());
        assert!(renderer.material_override().is_none());
    }

    #[test]
    fn test_model_name_required() {
        let mut fixture = AssetFixture::new();
        assert!(RendererComponent::from_tokens(&mut TokenStream::new(""), &mut fixture.context()).is_err());
    }
}
