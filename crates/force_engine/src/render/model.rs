//! Aggregate models: sub-meshes with parallel material slots

use super::{Material, Mesh};
use std::sync::Arc;

/// Named collection of sub-meshes and their materials
///
/// `meshes` and `materials` always have the same length; a `None` material
/// is a placeholder waiting for a later assignment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    /// Logical name the model is cached under
    pub name: String,
    meshes: Vec<Arc<Mesh>>,
    materials: Vec<Option<Arc<Material>>>,
}

impl Model {
    /// Create an empty model
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            meshes: Vec::new(),
            materials: Vec::new(),
        }
    }

    /// Append a sub-mesh with a placeholder material
    pub fn push_mesh(&mut self, mesh: Arc<Mesh>) {
        self.meshes.push(mesh);
        self.materials.push(None);
    }

    /// Append a sub-mesh with a known material
    pub fn push_mesh_with_material(&mut self, mesh: Arc<Mesh>, material: Arc<Material>) {
        self.meshes.push(mesh);
        self.materials.push(Some(material));
    }

    /// Assign `material` to the trailing run of placeholder slots
    ///
    /// Walks backward from the last sub-mesh and stops at the first slot that
    /// already has a material. Returns how many slots were filled.
    pub fn assign_material_backward(&mut self, material: &Arc<Material>) -> usize {
        let mut assigned = 0;
        for slot in self.materials.iter_mut().rev() {
            if slot.is_some() {
                break;
            }
            *slot = Some(Arc::clone(material));
            assigned += 1;
        }
        assigned
    }

    /// Sub-meshes in order
    pub fn meshes(&self) -> &[Arc<Mesh>] {
        &self.meshes
    }

    /// Material slots, parallel to [`meshes`](Self::meshes)
    pub fn materials(&self) -> &[Option<Arc<Material>>] {
        &self.materials
    }

    /// Number of sub-meshes
    pub fn sub_mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Sub-meshes paired with their material slot
    pub fn parts(&self) -> impl Iterator<Item = (&Arc<Mesh>, Option<&Arc<Material>>)> {
        self.meshes
            .iter()
            .zip(self.materials.iter().map(Option::as_ref))
    }
}
