//! Resource cache
//!
//! CPU-side bookkeeping for everything uploaded through the graphics
//! backend. Every key is loaded at most once; later requests share the same
//! `Arc`. Entries live until [`ResourceCache::clear`] or until the last
//! holder drops them after a clear.

use super::{AssetError, ImageDecoder, MeshData, ModelImporter};
use crate::config::AssetConfig;
use crate::render::{GraphicsBackend, Material, Mesh, Model, Shader, Texture};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Shared models, materials, shaders, textures and raw imports
#[derive(Debug, Default)]
pub struct ResourceCache {
    /// Aggregate models by logical name
    models: HashMap<String, Arc<Model>>,

    /// Imported sub-meshes by resolved file path
    imports: HashMap<PathBuf, Vec<Arc<Mesh>>>,

    /// Materials by resolved file path
    materials: HashMap<PathBuf, Arc<Material>>,

    /// Shaders by (vertex path, fragment path)
    shaders: HashMap<(PathBuf, PathBuf), Arc<Shader>>,

    /// Textures by resolved file path
    textures: HashMap<PathBuf, Arc<Texture>>,

    /// Material built from the configured default shader
    default_material: Option<Arc<Material>>,
}

impl ResourceCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a model by logical name
    pub fn model(&self, name: &str) -> Option<Arc<Model>> {
        self.models.get(name).cloned()
    }

    /// Look up a material by resolved path
    pub fn material(&self, path: &Path) -> Option<Arc<Material>> {
        self.materials.get(path).cloned()
    }

    /// Store a material under its resolved path
    pub fn insert_material(&mut self, path: PathBuf, material: Material) -> Arc<Material> {
        let material = Arc::new(material);
        self.materials.insert(path, Arc::clone(&material));
        material
    }

    /// Store a model under its name, replacing any earlier model of that name
    pub fn insert_model(&mut self, model: Model) -> Arc<Model> {
        let model = Arc::new(model);
        if self.models.insert(model.name.clone(), Arc::clone(&model)).is_some() {
            log::debug!("Model '{}' redefined", model.name);
        }
        model
    }

    /// Names of every cached model
    pub fn model_names(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    /// Number of cached models
    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    /// Number of cached materials
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Number of cached shaders
    pub fn shader_count(&self) -> usize {
        self.shaders.len()
    }

    /// Number of cached textures
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Drop every cached entry
    ///
    /// Components keep their own `Arc`s, so resources in use stay alive.
    pub fn clear(&mut self) {
        log::info!(
            "Clearing resource cache ({} models, {} materials, {} shaders, {} textures)",
            self.models.len(),
            self.materials.len(),
            self.shaders.len(),
            self.textures.len()
        );
        self.models.clear();
        self.imports.clear();
        self.materials.clear();
        self.shaders.clear();
        self.textures.clear();
        self.default_material = None;
    }
}

/// Everything a loader or component constructor needs to reach resources
///
/// Borrows the cache together with the collaborators that fill it.
pub struct AssetContext<'a> {
    /// Cache being filled
    pub cache: &'a mut ResourceCache,
    /// Upload target
    pub backend: &'a mut dyn GraphicsBackend,
    /// Model-import collaborator
    pub importer: &'a dyn ModelImporter,
    /// Image-decode collaborator
    pub decoder: &'a dyn ImageDecoder,
    /// Asset root and fallback shaders
    pub config: &'a AssetConfig,
}

impl AssetContext<'_> {
    /// Resolve a path from a text file against the asset root
    pub fn resolve(&self, path: &str) -> PathBuf {
        self.config.resolve(path)
    }

    /// Compile (or reuse) the program built from two shader files
    pub fn load_shader(&mut self, vertex_path: &str, fragment_path: &str) -> Result<Arc<Shader>, AssetError> {
        let key = (self.resolve(vertex_path), self.resolve(fragment_path));
        if let Some(shader) = self.cache.shaders.get(&key) {
            return Ok(Arc::clone(shader));
        }

        let vertex_source = std::fs::read_to_string(&key.0).map_err(|e| AssetError::io(&key.0, e))?;
        let fragment_source = std::fs::read_to_string(&key.1).map_err(|e| AssetError::io(&key.1, e))?;
        let handle = self.backend.compile_shader(&vertex_source, &fragment_source)?;

        log::debug!("Compiled shader {} + {}", key.0.display(), key.1.display());
        let shader = Arc::new(Shader {
            handle,
            vertex_path: vertex_path.to_string(),
            fragment_path: fragment_path.to_string(),
        });
        self.cache.shaders.insert(key, Arc::clone(&shader));
        Ok(shader)
    }

    /// Decode and upload (or reuse) a texture
    pub fn load_texture(&mut self, path: &str) -> Result<Arc<Texture>, AssetError> {
        let resolved = self.resolve(path);
        if let Some(texture) = self.cache.textures.get(&resolved) {
            return Ok(Arc::clone(texture));
        }

        let image = self.decoder.decode(&resolved)?;
        let handle = self.backend.create_texture(&image)?;

        let texture = Arc::new(Texture {
            handle,
            width: image.width,
            height: image.height,
            channels: image.channels,
            path: path.to_string(),
        });
        self.cache.textures.insert(resolved, Arc::clone(&texture));
        Ok(texture)
    }

    /// Import (or reuse) every sub-mesh of a model file
    pub fn import_meshes(&mut self, path: &str) -> Result<Vec<Arc<Mesh>>, AssetError> {
        let resolved = self.resolve(path);
        if let Some(meshes) = self.cache.imports.get(&resolved) {
            return Ok(meshes.clone());
        }

        let data = self.importer.import(&resolved)?;
        let meshes = data
            .iter()
            .map(|mesh| self.create_mesh(mesh))
            .collect::<Result<Vec<_>, _>>()?;

        log::info!("Imported {} sub-meshes from {}", meshes.len(), resolved.display());
        self.cache.imports.insert(resolved, meshes.clone());
        Ok(meshes)
    }

    /// Upload geometry that is not backed by a file
    pub fn create_mesh(&mut self, data: &MeshData) -> Result<Arc<Mesh>, AssetError> {
        let handle = self.backend.create_mesh(data)?;
        Ok(Arc::new(Mesh {
            handle,
            vertex_count: data.vertex_count(),
            index_count: data.indices.len(),
            has_normals: data.has_normals,
            has_uvs: data.has_uvs,
        }))
    }

    /// Look up a model by logical name
    pub fn model(&self, name: &str) -> Option<Arc<Model>> {
        self.cache.model(name)
    }

    /// Store a finished model
    pub fn register_model(&mut self, model: Model) -> Arc<Model> {
        self.cache.insert_model(model)
    }

    /// Material drawn with the configured default shader, built on first use
    pub fn default_material(&mut self) -> Result<Arc<Material>, AssetError> {
        if let Some(material) = &self.cache.default_material {
            return Ok(Arc::clone(material));
        }

        let vertex = self.config.default_vertex_shader.clone();
        let fragment = self.config.default_fragment_shader.clone();
        let material = Arc::new(Material::with_shader(self.load_shader(&vertex, &fragment)?));
        self.cache.default_material = Some(Arc::clone(&material));
        Ok(material)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::testing::{triangle, AssetFixture};
    use crate::render::BackendCall;

    #[test]
    fn test_shader_compiled_once_per_pair() {
        let dir = tempfile::tempdir().unwrap();
        let mut fixture = AssetFixture::in_dir(dir.path());

        let (first, second) = {
            let mut ctx = fixture.context();
            let first = ctx.load_shader("shaders/lit.vs", "shaders/lit.fs").unwrap();
            let second = ctx.load_shader("shaders/lit.vs", "shaders/lit.fs").unwrap();
            (first, second)
        };

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(fixture.cache.shader_count(), 1);
        assert_eq!(
            fixture.backend.count(|call| matches!(call, BackendCall::CompileShader(_))),
            1
        );
    }

    #[test]
    fn test_missing_shader_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut fixture = AssetFixture::in_dir(dir.path());
        let err = fixture.context().load_shader("shaders/nope.vs", "shaders/lit.fs").unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
        assert_eq!(fixture.cache.shader_count(), 0);
    }

    #[test]
    fn test_texture_reused_by_path() {
        let mut fixture = AssetFixture::new();
        let (a, b) = {
            let mut ctx = fixture.context();
            (ctx.load_texture("wall.png").unwrap(), ctx.load_texture("wall.png").unwrap())
        };
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!((a.width, a.height, a.channels), (2, 2, 4));
        assert_eq!(fixture.cache.texture_count(), 1);
    }

    #[test]
    fn test_import_uploads_each_sub_mesh_once() {
        let mut fixture = AssetFixture::new().with_model_file("pair.obj", vec![triangle(), triangle()]);
        let (first, second) = {
            let mut ctx = fixture.context();
            (ctx.import_meshes("pair.obj").unwrap(), ctx.import_meshes("pair.obj").unwrap())
        };

        assert_eq!(first.len(), 2);
        assert!(Arc::ptr_eq(&first[1], &second[1]));
        assert_eq!(first[0].index_count, 3);
        assert_eq!(
            fixture.backend.count(|call| matches!(call, BackendCall::CreateMesh { .. })),
            2
        );
    }

    #[test]
    fn test_unknown_import_is_error() {
        let mut fixture = AssetFixture::new();
        assert!(matches!(
            fixture.context().import_meshes("ghost.obj"),
            Err(AssetError::Import(_))
        ));
    }

    #[test]
    fn test_clear_drops_entries_but_not_held_arcs() {
        let mut fixture = AssetFixture::new();
        let texture = fixture.context().load_texture("wall.png").unwrap();
        fixture.cache.insert_model(Model::new("bird"));

        fixture.cache.clear();
        assert_eq!(fixture.cache.texture_count(), 0);
        assert!(fixture.cache.model("bird").is_none());
        assert_eq!(texture.path, "wall.png");
    }

    #[test]
    fn test_default_material_uses_configured_shader() {
        let dir = tempfile::tempdir().unwrap();
        let mut fixture = AssetFixture::in_dir(dir.path());
        let material = fixture.context().default_material().unwrap();
        let shader = material.shader.as_ref().unwrap();
        assert_eq!(shader.vertex_path, "shaders/lit.vs");

        let again = fixture.context().default_material().unwrap();
        assert!(Arc::ptr_eq(&material, &again));
    }
}
