//! Procedural geometry
//!
//! Builders return [`MeshData`] centered at the origin. Normals and UVs are
//! only interleaved when requested, matching what imported meshes carry.

use super::MeshData;
use crate::foundation::math::{constants::PI, Vec3};
use std::collections::HashMap;

/// Subdivision levels past this are clamped
pub const MAX_ICOSPHERE_SUBDIVISIONS: u32 = 6;

const ICOSAHEDRON_X: f32 = 0.525_731_1;
const ICOSAHEDRON_Z: f32 = 0.850_650_8;

const ICOSAHEDRON_FACES: [[u32; 3]; 20] = [
    [0, 4, 1], [0, 9, 4], [9, 5, 4], [4, 5, 8], [4, 8, 1],
    [8, 10, 1], [8, 3, 10], [5, 3, 8], [5, 2, 3], [2, 7, 3],
    [7, 10, 3], [7, 6, 10], [7, 11, 6], [11, 0, 6], [0, 1, 6],
    [6, 1, 10], [9, 0, 11], [9, 11, 2], [9, 2, 5], [7, 2, 11],
];

/// One face of a box: outward normal plus the in-plane U and V directions
const BOX_FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
    ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
    ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
    ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
    ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
];

/// Axis-aligned box with the given full size; 4 vertices per face
pub fn cube(size: Vec3, has_normals: bool, has_uvs: bool) -> MeshData {
    let half = size * 0.5;
    let mut mesh = MeshData {
        has_normals,
        has_uvs,
        ..MeshData::default()
    };

    for (face, (normal, u_axis, v_axis)) in BOX_FACES.iter().enumerate() {
        let normal = Vec3::from(*normal);
        let u_axis = Vec3::from(*u_axis);
        let v_axis = Vec3::from(*v_axis);

        for (u, v) in [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)] {
            let offset = normal + u_axis * (u * 2.0 - 1.0) + v_axis * (v * 2.0 - 1.0);
            let position = offset.component_mul(&half);
            push_vertex(&mut mesh, position, normal, [u, v]);
        }

        let base = face as u32 * 4;
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }
    mesh
}

/// UV sphere with `sectors` slices around Y and `stacks` bands pole to pole
pub fn sphere(sectors: u32, stacks: u32, radius: f32, has_normals: bool, has_uvs: bool) -> MeshData {
    let sectors = sectors.max(3);
    let stacks = stacks.max(2);
    let mut mesh = MeshData {
        has_normals,
        has_uvs,
        ..MeshData::default()
    };

    let sector_step = 2.0 * PI / sectors as f32;
    let stack_step = PI / stacks as f32;

    for i in 0..=stacks {
        let stack_angle = PI / 2.0 - i as f32 * stack_step;
        let ring = radius * stack_angle.cos();
        let y = radius * stack_angle.sin();

        for j in 0..=sectors {
            let sector_angle = j as f32 * sector_step;
            let position = Vec3::new(ring * sector_angle.cos(), y, ring * sector_angle.sin());
            let normal = position / radius;
            let uv = [1.0 - j as f32 / sectors as f32, 1.0 - i as f32 / stacks as f32];
            push_vertex(&mut mesh, position, normal, uv);
        }
    }

    for i in 0..stacks {
        let mut k1 = i * (sectors + 1);
        let mut k2 = k1 + sectors + 1;
        for _ in 0..sectors {
            if i != 0 {
                mesh.indices.extend_from_slice(&[k1, k2, k1 + 1]);
            }
            if i != stacks - 1 {
                mesh.indices.extend_from_slice(&[k1 + 1, k2, k2 + 1]);
            }
            k1 += 1;
            k2 += 1;
        }
    }
    mesh
}

/// Sphere made by splitting each icosahedron triangle into four, `subdivisions` times
///
/// Vertices on shared edges are shared. UVs are spherical, so the seam
/// triangles stretch across the texture.
pub fn icosphere(subdivisions: u32, radius: f32, has_normals: bool, has_uvs: bool) -> MeshData {
    let (x, z) = (ICOSAHEDRON_X, ICOSAHEDRON_Z);
    let mut directions = vec![
        Vec3::new(-x, 0.0, z),
        Vec3::new(x, 0.0, z),
        Vec3::new(-x, 0.0, -z),
        Vec3::new(x, 0.0, -z),
        Vec3::new(0.0, z, x),
        Vec3::new(0.0, z, -x),
        Vec3::new(0.0, -z, x),
        Vec3::new(0.0, -z, -x),
        Vec3::new(z, x, 0.0),
        Vec3::new(-z, x, 0.0),
        Vec3::new(z, -x, 0.0),
        Vec3::new(-z, -x, 0.0),
    ];
    let mut faces = ICOSAHEDRON_FACES.to_vec();
    let mut midpoints: HashMap<(u32, u32), u32> = HashMap::new();

    for _ in 0..subdivisions.min(MAX_ICOSPHERE_SUBDIVISIONS) {
        let mut refined = Vec::with_capacity(faces.len() * 4);
        for [v1, v2, v3] in faces {
            let a = midpoint(v1, v2, &mut directions, &mut midpoints);
            let b = midpoint(v2, v3, &mut directions, &mut midpoints);
            let c = midpoint(v3, v1, &mut directions, &mut midpoints);
            refined.extend_from_slice(&[[v1, a, c], [v2, b, a], [v3, c, b], [a, b, c]]);
        }
        faces = refined;
    }

    let mut mesh = MeshData {
        has_normals,
        has_uvs,
        ..MeshData::default()
    };
    for direction in &directions {
        let u = 0.5 + direction.z.atan2(direction.x) / (2.0 * PI);
        let v = 0.5 - direction.y.clamp(-1.0, 1.0).asin() / PI;
        push_vertex(&mut mesh, direction * radius, *direction, [u, v]);
    }
    mesh.indices = faces.into_iter().flatten().collect();
    mesh
}

/// Index of the unit-length midpoint of edge `a`-`b`, added once per edge
fn midpoint(a: u32, b: u32, directions: &mut Vec<Vec3>, cache: &mut HashMap<(u32, u32), u32>) -> u32 {
    let key = (a.min(b), a.max(b));
    if let Some(&index) = cache.get(&key) {
        return index;
    }
    let middle = (directions[a as usize] + directions[b as usize]).normalize();
    let index = directions.len() as u32;
    directions.push(middle);
    cache.insert(key, index);
    index
}

fn push_vertex(mesh: &mut MeshData, position: Vec3, normal: Vec3, uv: [f32; 2]) {
    mesh.vertices.extend_from_slice(position.as_slice());
    if mesh.has_normals {
        mesh.vertices.extend_from_slice(normal.as_slice());
    }
    if mesh.has_uvs {
        mesh.vertices.extend_from_slice(&uv);
    }
}
