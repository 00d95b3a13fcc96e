//! Name → constructor mapping for text-driven component creation
//!
//! The registry is filled once at startup, then shared read-only (typically
//! behind an `Arc`) with every loader. Unknown names are reported, never
//! fatal.

use super::{Component, ComponentError, TokenStream};
use crate::assets::AssetContext;
use std::collections::HashMap;
use thiserror::Error;

/// Constructor signature: consumes its fields from the token stream
pub type ComponentFactory = Box<
    dyn Fn(&mut TokenStream<'_>, &mut AssetContext<'_>) -> Result<Box<dyn Component>, ComponentError>
        + Send
        + Sync,
>;

/// Failures of [`ComponentRegistry::try_create`]
#[derive(Error, Debug)]
pub enum RegistryError {
    /// No constructor registered under this name
    #[error("unknown component type '{0}'")]
    UnknownType(String),

    /// The constructor rejected its fields
    #[error("failed to construct '{type_name}': {source}")]
    Construction {
        /// Requested type name
        type_name: String,
        /// Constructor failure
        #[source]
        source: ComponentError,
    },
}

/// Mapping from type-name token to constructor
#[derive(Default)]
pub struct ComponentRegistry {
    factories: HashMap<String, ComponentFactory>,
}

impl ComponentRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in component type
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        crate::components::register_builtin(&mut registry);
        registry
    }

    /// Register `factory` under `type_name`, replacing any previous entry
    pub fn register<F>(&mut self, type_name: impl Into<String>, factory: F)
    where
        F: Fn(&mut TokenStream<'_>, &mut AssetContext<'_>) -> Result<Box<dyn Component>, ComponentError>
            + Send
            + Sync
            + 'static,
    {
        let type_name = type_name.into();
        if self.factories.insert(type_name.clone(), Box::new(factory)).is_some() {
            log::warn!("Replaced constructor for component type '{}'", type_name);
        } else {
            log::debug!("Registered component type '{}'", type_name);
        }
    }

    /// Whether `type_name` has a constructor
    pub fn is_registered(&self, type_name: &str) -> bool {
        self.factories.contains_key(type_name)
    }

    /// Registered type names, sorted
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Construct a component, reporting why it could not be built
    pub fn try_create(
        &self,
        type_name: &str,
        tokens: &mut TokenStream<'_>,
        assets: &mut AssetContext<'_>,
    ) -> Result<Box<dyn Component>, RegistryError> {
        let factory = self
            .factories
            .get(type_name)
            .ok_or_else(|| RegistryError::UnknownType(type_name.to_string()))?;

        factory(tokens, assets).map_err(|source| RegistryError::Construction {
            type_name: type_name.to_string(),
            source,
        })
    }

    /// Construct a component, logging and returning `None` on failure
    pub fn create(
        &self,
        type_name: &str,
        tokens: &mut TokenStream<'_>,
        assets: &mut AssetContext<'_>,
    ) -> Option<Box<dyn Component>> {
        match self.try_create(type_name, tokens, assets) {
            Ok(component) => Some(component),
            Err(e) => {
                log::warn!("{}", e);
                None
            }
        }
    }
}

impl std::fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("types", &self.type_names())
            .finish()
    }
}
