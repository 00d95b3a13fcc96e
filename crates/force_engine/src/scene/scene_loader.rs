//! Scene text files
//!
//! ```text
//! ENTITY Bird
//! POSITION -2 0 0
//! COMPONENT RendererComponent bird materials/bird.mat
//! COMPONENT PhysicsComponent
//!
//! ENTITY Wing
//! PARENT Bird
//! ROTATION 0 0 15
//! ```
//!
//! Every directive after `ENTITY` applies to the most recently declared
//! entity. Entities start under the load root; `PARENT` moves the current
//! entity under an entity declared earlier in the same file.

use super::{NodeId, Scene};
use crate::assets::{AssetContext, LoadReport};
use crate::component::{ComponentRegistry, TokenStream};
use crate::foundation::math::{Transform, Vec3};
use crate::input::InputSource;
use std::collections::HashMap;

/// Builds scene nodes and components from text
pub struct SceneLoader<'l, 'a> {
    registry: &'l ComponentRegistry,
    assets: &'l mut AssetContext<'a>,
    input: &'l dyn InputSource,
}

impl<'l, 'a> SceneLoader<'l, 'a> {
    /// Create a loader resolving component types through `registry`
    pub fn new(registry: &'l ComponentRegistry, assets: &'l mut AssetContext<'a>, input: &'l dyn InputSource) -> Self {
        Self {
            registry,
            assets,
            input,
        }
    }

    /// Load the scene file at `path` under `root`
    ///
    /// A missing file is reported and leaves the scene untouched.
    pub fn load(&mut self, path: &str, scene: &mut Scene, root: NodeId) -> LoadReport {
        let resolved = self.assets.resolve(path);
        match std::fs::read_to_string(&resolved) {
            Ok(source) => {
                let report = self.parse(&source, path, scene, root);
                log::info!(
                    "Loaded scene {}: {} entities, {} warnings",
                    path,
                    report.created,
                    report.warnings.len()
                );
                report
            }
            Err(e) => {
                let mut report = LoadReport::default();
                report.warn(path, 0, format!("cannot open scene file: {e}"));
                report
            }
        }
    }

    /// Build the scene described by `source` under `root`
    ///
    /// `report.created` counts the entities created.
    pub fn parse(&mut self, source: &str, file: &str, scene: &mut Scene, root: NodeId) -> LoadReport {
        let mut report = LoadReport::default();
        let mut declared: HashMap<String, NodeId> = HashMap::new();
        let mut current: Option<NodeId> = None;

        for (index, line) in source.lines().enumerate() {
            let line_number = index + 1;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (tag, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
            let mut tokens = TokenStream::new(rest);

            if tag == "ENTITY" {
                let name = tokens.optional_str();
                match scene.graph.spawn(name, Transform::default(), Some(root)) {
                    Ok(id) => {
                        if let Some(name) = name {
                            declared.insert(name.to_string(), id);
                        }
                        current = Some(id);
                        report.created += 1;
                    }
                    Err(e) => report.warn(file, line_number, format!("ENTITY: {e}")),
                }
                continue;
            }

            let Some(entity) = current else {
                report.warn(file, line_number, format!("{tag} before any ENTITY"));
                continue;
            };

            match tag {
                "PARENT" => {
                    let Some(parent_name) = tokens.optional_str() else {
                        report.warn(file, line_number, "PARENT expects a name");
                        continue;
                    };
                    match declared.get(parent_name) {
                        Some(&parent) => {
                            if let Err(e) = scene.graph.add_child(parent, entity) {
                                report.warn(file, line_number, format!("PARENT: {e}"));
                            }
                        }
                        None => report.warn(
                            file,
                            line_number,
                            format!("parent '{parent_name}' not declared before child"),
                        ),
                    }
                }
                "POSITION" | "ROTATION" | "SCALE" => {
                    let value = match tokens.next_vec3("xyz") {
                        Ok(value) => value,
                        Err(e) => {
                            report.warn(file, line_number, format!("{tag}: {e}"));
                            continue;
                        }
                    };
                    if let Some(transform) = scene.graph.transform_mut(entity) {
                        set_field(transform, tag, value);
                    }
                }
                "COMPONENT" => {
                    let Some(type_name) = tokens.optional_str() else {
                        report.warn(file, line_number, "COMPONENT expects a type name");
                        continue;
                    };
                    match self.registry.try_create(type_name, &mut tokens, self.assets) {
                        Ok(component) => {
                            if let Err(e) = scene.attach(entity, component, self.input) {
                                report.warn(file, line_number, format!("{type_name}: {e}"));
                            }
                        }
                        Err(e) => report.warn(file, line_number, e.to_string()),
                    }
                }
                _ => report.warn(file, line_number, format!("unknown directive '{tag}'")),
            }
        }
        report
    }
}

fn set_field(transform: &mut Transform, tag: &str, value: Vec3) {
    match tag {
        "POSITION" => transform.position = value,
        "ROTATION" => transform.rotation = value,
        _ => transform.scale = value,
    }
}
