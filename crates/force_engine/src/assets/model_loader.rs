//! Aggregate model text files
//!
//! ```text
//! MODEL pipe
//! MESH models/pipe_body.obj
//! MESH models/pipe_cap.obj
//! MATERIAL materials/pipe.mat
//! ```
//!
//! `MESH` appends every sub-mesh of the imported file with an empty material
//! slot. `MATERIAL` fills the trailing run of empty slots, walking backward
//! and stopping at the first slot that already has a material.

use super::{load_material, AssetContext, LoadReport};
use crate::render::Model;

/// Build every model described in `source` and store them in the cache
///
/// `report.created` counts the models stored.
pub fn parse_models(source: &str, file: &str, ctx: &mut AssetContext<'_>) -> LoadReport {
    let mut report = LoadReport::default();
    let mut current: Option<Model> = None;

    for (index, line) in source.lines().enumerate() {
        let line_number = index + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut tokens = line.split_whitespace();
        let Some(tag) = tokens.next() else {
            continue;
        };
        let argument = tokens.next();

        match (tag, argument) {
            ("MODEL", Some(name)) => {
                if let Some(model) = current.take() {
                    finish(model, ctx, &mut report);
                }
                current = Some(Model::new(name));
            }
            ("MESH", Some(path)) => {
                let Some(model) = current.as_mut() else {
                    report.warn(file, line_number, "MESH before any MODEL");
                    continue;
                };
                match ctx.import_meshes(path) {
                    Ok(meshes) => meshes.into_iter().for_each(|mesh| model.push_mesh(mesh)),
                    Err(e) => report.warn(file, line_number, format!("cannot import {path}: {e}")),
                }
            }
            ("MATERIAL", Some(path)) => {
                let Some(model) = current.as_mut() else {
                    report.warn(file, line_number, "MATERIAL before any MODEL");
                    continue;
                };
                let (material, material_report) = load_material(path, ctx);
                report.warnings.extend(material_report.warnings);
                if let Some(material) = material {
                    let assigned = model.assign_material_backward(&material);
                    if assigned == 0 {
                        log::debug!("{}:{}: no unassigned sub-meshes for {}", file, line_number, path);
                    }
                }
            }
            ("MODEL" | "MESH" | "MATERIAL", None) => {
                report.warn(file, line_number, format!("{tag} expects an argument"));
            }
            _ => report.warn(file, line_number, format!("unknown directive '{tag}'")),
        }
    }

    if let Some(model) = current {
        finish(model, ctx, &mut report);
    }
    report
}

fn finish(model: Model, ctx: &mut AssetContext<'_>, report: &mut LoadReport) {
    log::info!(
        "Model '{}': {} sub-meshes",
        model.name,
        model.sub_mesh_count()
    );
    ctx.register_model(model);
    report.created += 1;
}

/// Load every model described in the file at `path`
pub fn load_models(path: &str, ctx: &mut AssetContext<'_>) -> LoadReport {
    let resolved = ctx.resolve(path);
    match std::fs::read_to_string(&resolved) {
        Ok(source) => parse_models(&source, path, ctx),
        Err(e) => {
            let mut report = LoadReport::default();
            report.warn(path, 0, format!("cannot open model file: {e}"));
            report
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::testing::{triangle, AssetFixture};
    use std::sync::Arc;

    fn fixture(dir: &std::path::Path) -> AssetFixture {
        std::fs::write(dir.join("red.mat"), "SHININESS 1\n").unwrap();
        std::fs::write(dir.join("blue.mat"), "SHININESS 2\n").unwrap();
        AssetFixture::in_dir(dir)
            .with_model_file("body.obj", vec![triangle(), triangle()])
            .with_model_file("cap.obj", vec![triangle()])
    }

    #[test]
    fn test_material_covers_preceding_meshes() {
        let dir = tempfile::tempdir().unwrap();
        let mut fixture = fixture(dir.path());
        let report = parse_models(
            "MODEL pipe\nMESH body.obj\nMESH cap.obj\nMATERIAL red.mat\n",
            "models.txt",
            &mut fixture.context(),
        );

        assert!(report.is_clean(), "{:?}", report.warnings);
        assert_eq!(report.created, 1);
        let model = fixture.cache.model("pipe").unwrap();
        assert_eq!(model.sub_mesh_count(), 3);
        assert!(model.materials().iter().all(|m| m.as_ref().map(|m| m.shininess) == Some(1.0)));
    }

    #[test]
    fn test_material_stops_at_assigned_boundary() {
        let dir = tempfile::tempdir().unwrap();
        let mut fixture = fixture(dir.path());
        parse_models(
            "MODEL pipe\nMESH body.obj\nMATERIAL red.mat\nMESH cap.obj\nMATERIAL blue.mat\n",
            "models.txt",
            &mut fixture.context(),
        );

        let model = fixture.cache.model("pipe").unwrap();
        let shininess: Vec<f32> = model
            .materials()
            .iter()
            .map(|m| m.as_ref().map_or(0.0, |m| m.shininess))
            .collect();
        assert_eq!(shininess, vec![1.0, 1.0, 2.0]);
    }

    #[test]
    fn test_mesh_without_material_keeps_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let mut fixture = fixture(dir.path());
        parse_models("MODEL a\nMESH cap.obj\nMODEL b\nMESH body.obj\n", "models.txt", &mut fixture.context());

        assert_eq!(fixture.cache.model_count(), 2);
        let a = fixture.cache.model("a").unwrap();
        assert!(a.materials()[0].is_none());
    }

    #[test]
    fn test_imports_shared_between_models() {
        let dir = tempfile::tempdir().unwrap();
        let mut fixture = fixture(dir.path());
        parse_models("MODEL a\nMESH cap.obj\nMODEL b\nMESH cap.obj\n", "models.txt", &mut fixture.context());

        let a = fixture.cache.model("a").unwrap();
        let b = fixture.cache.model("b").unwrap();
        assert!(Arc::ptr_eq(&a.meshes()[0], &b.meshes()[0]));
    }

    #[test]
    fn test_recoverable_errors() {
        let dir = tempfile::tempdir().unwrap();
        let mut fixture = fixture(dir.path());
        let report = parse_models(
            "MESH cap.obj\nMODEL a\nMESH ghost.obj\nMATERIAL ghost.mat\nMESH\nMESH cap.obj\n",
            "models.txt",
            &mut fixture.context(),
        );

        let lines: Vec<usize> = report.warnings.iter().map(|w| w.line).collect();
        // Missing material file is reported against the material file itself
        assert_eq!(lines, vec![1, 3, 0, 5]);
        let model = fixture.cache.model("a").unwrap();
        assert_eq!(model.sub_mesh_count(), 1);
    }

    #[test]
    fn test_missing_model_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut fixture = fixture(dir.path());
        let report = load_models("nothing.txt", &mut fixture.context());
        assert_eq!(report.created, 0);
        assert_eq!(report.warnings.len(), 1);
    }
}
