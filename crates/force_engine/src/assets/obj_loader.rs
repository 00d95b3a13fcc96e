//! Wavefront OBJ importer
//!
//! Default [`ModelImporter`]. Each `o`/`g` group becomes its own sub-mesh;
//! faces are fan-triangulated and vertices are emitted per face corner.

use super::{AssetError, MeshData, ModelImporter};
use std::path::Path;

/// [`ModelImporter`] for `.obj` files
#[derive(Debug, Default, Clone, Copy)]
pub struct ObjImporter;

impl ModelImporter for ObjImporter {
    fn import(&self, path: &Path) -> Result<Vec<MeshData>, AssetError> {
        let source = std::fs::read_to_string(path).map_err(|e| AssetError::io(path, e))?;
        let meshes = parse_obj(&source).map_err(|e| AssetError::Import(format!("{}: {}", path.display(), e)))?;
        log::debug!("Imported {} sub-mesh(es) from {:?}", meshes.len(), path);
        Ok(meshes)
    }
}

/// Corner of a face: position, optional UV and normal indices (0-based)
type Corner = (usize, Option<usize>, Option<usize>);

#[derive(Default)]
struct Group {
    faces: Vec<Vec<Corner>>,
}

/// Parse OBJ text into one [`MeshData`] per non-empty group
pub fn parse_obj(source: &str) -> Result<Vec<MeshData>, String> {
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();
    let mut tex_coords: Vec<[f32; 2]> = Vec::new();
    let mut groups: Vec<Group> = vec![Group::default()];

    for (index, line) in source.lines().enumerate() {
        let line_number = index + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts[0] {
            "v" => positions.push(parse_floats::<3>(&parts[1..], line_number)?),
            "vn" => normals.push(parse_floats::<3>(&parts[1..], line_number)?),
            "vt" => tex_coords.push(parse_floats::<2>(&parts[1..], line_number)?),
            "o" | "g" => {
                if groups.last().is_some_and(|g| !g.faces.is_empty()) {
                    groups.push(Group::default());
                }
            }
            "f" => {
                if parts.len() < 4 {
                    return Err(format!("line {}: face needs at least 3 vertices", line_number));
                }
                let corners = parts[1..]
                    .iter()
                    .map(|corner| parse_corner(corner, [positions.len(), tex_coords.len(), normals.len()], line_number))
                    .collect::<Result<Vec<_>, _>>()?;
                if let Some(group) = groups.last_mut() {
                    group.faces.push(corners);
                }
            }
            _ => {
                // Materials, smoothing groups and the rest are not needed
            }
        }
    }

    let meshes: Vec<MeshData> = groups
        .iter()
        .filter(|g| !g.faces.is_empty())
        .map(|g| build_mesh(g, &positions, &normals, &tex_coords))
        .collect();

    if meshes.is_empty() {
        return Err("no faces found".to_string());
    }
    Ok(meshes)
}

fn parse_floats<const N: usize>(parts: &[&str], line: usize) -> Result<[f32; N], String> {
    if parts.len() < N {
        return Err(format!("line {}: expected {} values", line, N));
    }
    let mut out = [0.0; N];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = part
            .parse()
            .map_err(|_| format!("line {}: invalid number '{}'", line, part))?;
    }
    Ok(out)
}

/// `counts` holds the number of positions, UVs and normals seen so far
fn parse_corner(corner: &str, counts: [usize; 3], line: usize) -> Result<Corner, String> {
    let mut fields = corner.split('/');
    let resolve = |field: Option<&str>, count: usize| -> Result<Option<usize>, String> {
        match field {
            None | Some("") => Ok(None),
            Some(text) => {
                let value: i64 = text
                    .parse()
                    .map_err(|_| format!("line {}: invalid index '{}'", line, text))?;
                // Negative indices count back from the end
                let resolved = if value < 0 { count as i64 + value } else { value - 1 };
                usize::try_from(resolved)
                    .map(Some)
                    .map_err(|_| format!("line {}: index {} out of range", line, value))
            }
        }
    };

    let position = resolve(fields.next(), counts[0])?
        .ok_or_else(|| format!("line {}: face corner without position", line))?;
    if position >= counts[0] {
        return Err(format!("line {}: position index out of bounds", line));
    }
    let uv = resolve(fields.next(), counts[1])?;
    let normal = resolve(fields.next(), counts[2])?;
    Ok((position, uv, normal))
}

fn build_mesh(group: &Group, positions: &[[f32; 3]], normals: &[[f32; 3]], tex_coords: &[[f32; 2]]) -> MeshData {
    let corners = || group.faces.iter().flatten();
    let has_normals = corners().all(|c| c.2.is_some_and(|i| i < normals.len()));
    let has_uvs = corners().all(|c| c.1.is_some_and(|i| i < tex_coords.len()));

    let mut mesh = MeshData {
        has_normals,
        has_uvs,
        ..MeshData::default()
    };

    for face in &group.faces {
        let base = (mesh.vertices.len() / mesh.stride()) as u32;
        for &(position, uv, normal) in face {
            mesh.vertices.extend_from_slice(&positions[position]);
            if has_normals {
                if let Some(n) = normal.and_then(|i| normals.get(i)) {
                    mesh.vertices.extend_from_slice(n);
                }
            }
            if has_uvs {
                if let Some(t) = uv.and_then(|i| tex_coords.get(i)) {
                    mesh.vertices.extend_from_slice(t);
                }
            }
        }
        // Fan triangulation
        for i in 1..(face.len() as u32 - 1) {
            mesh.indices.extend_from_slice(&[base, base + i, base + i + 1]);
        }
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quad_is_fan_triangulated() {
        let source = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";
        let meshes = parse_obj(source).unwrap();
        assert_eq!(meshes.len(), 1);
        assert_eq!(meshes[0].vertex_count(), 4);
        assert_eq!(meshes[0].indices, vec![0, 1, 2, 0, 2, 3]);
        assert!(!meshes[0].has_normals);
    }

    #[test]
    fn test_groups_become_sub_meshes_with_attributes() {
        let source = "\
v 0 0 0
v 1 0 0
v 0 1 0
vn 0 0 1
vt 0 0
o first
f 1/1/1 2/1/1 3/1/1
o second
f -3//1 -2//1 -1//1
";
        let meshes = parse_obj(source).unwrap();
        assert_eq!(meshes.len(), 2);
        assert!(meshes[0].has_normals && meshes[0].has_uvs);
        assert_eq!(meshes[0].stride(), 8);
        assert!(meshes[1].has_normals && !meshes[1].has_uvs);
        assert_eq!(meshes[1].vertices.len(), 3 * 6);
    }

    #[test]
    fn test_bad_index_is_rejected() {
        assert!(parse_obj("v 0 0 0\nf 1 2 3\n").is_err());
        assert!(parse_obj("v 0 0 0\n").is_err());
    }
}
