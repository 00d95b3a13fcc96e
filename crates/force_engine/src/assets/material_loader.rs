//! Material text files
//!
//! One directive per line, in any order; a later line overrides an earlier
//! one for the same field:
//!
//! ```text
//! SHADER shaders/lit.vs shaders/lit.fs
//! DIFFUSE textures/pipe.png
//! SPECULAR textures/pipe_spec.png
//! NORMAL textures/pipe_normal.png
//! SHININESS 64
//! TEXTURE_SCALE 1 4
//! ```
//!
//! Parsing collects a [`MaterialDesc`] first; resources are only requested
//! once the whole file has been read, so overridden lines never load.

use super::{AssetContext, LoadReport};
use crate::component::tokens::{TokenError, TokenStream};
use crate::foundation::math::Vec2;
use crate::render::Material;
use std::sync::Arc;

/// Parsed but unresolved material file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialDesc {
    /// Vertex and fragment shader paths
    pub shader: Option<(String, String)>,
    /// Diffuse map path
    pub diffuse: Option<String>,
    /// Specular map path
    pub specular: Option<String>,
    /// Normal map path
    pub normal: Option<String>,
    /// Specular exponent
    pub shininess: Option<f32>,
    /// UV multiplier
    pub texture_scale: Option<Vec2>,
}

impl MaterialDesc {
    /// Parse material text; bad lines are reported and skipped
    pub fn parse(source: &str, file: &str, report: &mut LoadReport) -> Self {
        let mut desc = Self::default();

        for (index, line) in source.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (tag, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
            let mut tokens = TokenStream::new(rest);
            if let Err(e) = desc.apply(tag, &mut tokens) {
                report.warn(file, index + 1, format!("{tag}: {e}"));
            }
        }
        desc
    }

    fn apply(&mut self, tag: &str, tokens: &mut TokenStream<'_>) -> Result<(), LineError> {
        match tag {
            "SHADER" => {
                let vertex = tokens.next_str("vertex shader")?;
                let fragment = tokens.next_str("fragment shader")?;
                self.shader = Some((vertex.to_string(), fragment.to_string()));
            }
            "DIFFUSE" => self.diffuse = Some(tokens.next_str("path")?.to_string()),
            "SPECULAR" => self.specular = Some(tokens.next_str("path")?.to_string()),
            "NORMAL" => self.normal = Some(tokens.next_str("path")?.to_string()),
            "SHININESS" => self.shininess = Some(tokens.next_f32("shininess")?),
            "TEXTURE_SCALE" => {
                let x = tokens.next_f32("x")?;
                let y = tokens.next_f32("y")?;
                self.texture_scale = Some(Vec2::new(x, y));
            }
            _ => return Err(LineError::UnknownTag),
        }
        Ok(())
    }

    /// Resolve every path through the cache
    ///
    /// Without a `SHADER` line the configured default shader is used. Maps or
    /// shaders that fail to load are reported and left empty.
    pub fn build(&self, file: &str, ctx: &mut AssetContext<'_>, report: &mut LoadReport) -> Material {
        let mut material = Material::default();

        let (vertex, fragment) = match &self.shader {
            Some((vertex, fragment)) => (vertex.clone(), fragment.clone()),
            None => (
                ctx.config.default_vertex_shader.clone(),
                ctx.config.default_fragment_shader.clone(),
            ),
        };
        match ctx.load_shader(&vertex, &fragment) {
            Ok(shader) => material.shader = Some(shader),
            Err(e) => report.warn(file, 0, format!("shader unavailable: {e}")),
        }

        let maps = [
            (&self.diffuse, &mut material.diffuse),
            (&self.specular, &mut material.specular),
            (&self.normal, &mut material.normal),
        ];
        for (path, slot) in maps {
            let Some(path) = path else {
                continue;
            };
            match ctx.load_texture(path) {
                Ok(texture) => *slot = Some(texture),
                Err(e) => report.warn(file, 0, format!("texture unavailable: {e}")),
            }
        }

        if let Some(shininess) = self.shininess {
            material.shininess = shininess;
        }
        if let Some(scale) = self.texture_scale {
            material.texture_scale = scale;
        }
        material
    }
}

#[derive(Debug, thiserror::Error)]
enum LineError {
    #[error("unknown directive")]
    UnknownTag,
    #[error(transparent)]
    Tokens(#[from] TokenError),
}

/// Parse and resolve material text without touching the material cache
pub fn parse_material(source: &str, file: &str, ctx: &mut AssetContext<'_>) -> (Material, LoadReport) {
    let mut report = LoadReport::default();
    let desc = MaterialDesc::parse(source, file, &mut report);
    let material = desc.build(file, ctx, &mut report);
    report.created = 1;
    (material, report)
}

/// Load (or reuse) the material file at `path`
///
/// A missing file yields `None` and a warning.
pub fn load_material(path: &str, ctx: &mut AssetContext<'_>) -> (Option<Arc<Material>>, LoadReport) {
    let resolved = ctx.resolve(path);
    if let Some(material) = ctx.cache.material(&resolved) {
        return (Some(material), LoadReport::default());
    }

    let source = match std::fs::read_to_string(&resolved) {
        Ok(source) => source,
        Err(e) => {
            let mut report = LoadReport::default();
            report.warn(path, 0, format!("cannot open material file: {e}"));
            return (None, report);
        }
    };

    let (material, report) = parse_material(&source, path, ctx);
    log::debug!("Loaded material {} ({} warnings)", path, report.warnings.len());
    (Some(ctx.cache.insert_material(resolved, material)), report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::testing::AssetFixture;

    #[test]
    fn test_later_lines_override_earlier() {
        let mut report = LoadReport::default();
        let desc = MaterialDesc::parse(
            "# pipe\nSHININESS 8\nDIFFUSE a.png\n\nSHININESS 64\nTEXTURE_SCALE 1 4\nDIFFUSE b.png\n",
            "pipe.mat",
            &mut report,
        );

        assert!(report.is_clean());
        assert_eq!(desc.shininess, Some(64.0));
        assert_eq!(desc.diffuse.as_deref(), Some("b.png"));
        assert_eq!(desc.texture_scale, Some(Vec2::new(1.0, 4.0)));
    }

    #[test]
    fn test_bad_lines_are_skipped() {
        let mut report = LoadReport::default();
        let desc = MaterialDesc::parse(
            "SHININESS shiny\nTEXTURE_SCALE 2\nGLOSS 1\nSPECULAR s.png\n",
            "bad.mat",
            &mut report,
        );

        assert_eq!(report.warnings.len(), 3);
        assert_eq!(report.warnings[0].line, 1);
        assert_eq!(report.warnings[2].line, 3);
        assert_eq!(desc.shininess, None);
        assert_eq!(desc.specular.as_deref(), Some("s.png"));
    }

    #[test]
    fn test_build_falls_back_to_default_shader() {
        let dir = tempfile::tempdir().unwrap();
        let mut fixture = AssetFixture::in_dir(dir.path());
        let (material, report) = parse_material("DIFFUSE wall.png\nSHININESS 16", "wall.mat", &mut fixture.context());

        assert!(report.is_clean(), "{:?}", report.warnings);
        let shader = material.shader.as_ref().unwrap();
        assert_eq!(shader.fragment_path, "shaders/lit.fs");
        assert!(material.diffuse.is_some());
        assert!(material.specular.is_none());
        assert_eq!(material.shininess, 16.0);
    }

    #[test]
    fn test_unloadable_shader_leaves_material_without_shader() {
        let dir = tempfile::tempdir().unwrap();
        let mut fixture = AssetFixture::in_dir(dir.path());
        let (material, report) = parse_material("SHADER missing.vs missing.fs", "m.mat", &mut fixture.context());

        assert!(material.shader.is_none());
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_load_material_caches_by_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bird.mat"), "SHININESS 12\n").unwrap();
        let mut fixture = AssetFixture::in_dir(dir.path());

        let (first, _) = load_material("bird.mat", &mut fixture.context());
        let (second, report) = load_material("bird.mat", &mut fixture.context());

        assert!(Arc::ptr_eq(first.as_ref().unwrap(), second.as_ref().unwrap()));
        assert!(report.is_clean());
        assert_eq!(fixture.cache.material_count(), 1);
    }

    #[test]
    fn test_missing_material_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut fixture = AssetFixture::in_dir(dir.path());
        let (material, report) = load_material("nope.mat", &mut fixture.context());

        assert!(material.is_none());
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(fixture.cache.material_count(), 0);
    }
}
