//! OBJ mesh loading
//!
//! Supports the basic OBJ subset the book and decor models use: vertices
//! (v), texture coords (vt), normals (vn) and faces (f) with fan
//! triangulation for quads and n-gons. Anything else in the file is ignored.

use super::AssetError;
use macroquad::color::Color;
use macroquad::math::{vec2, Vec2, Vec3};
use macroquad::models::{Mesh, Vertex};
use macroquad::texture::Texture2D;
use std::collections::HashMap;

/// One deduplicated mesh vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshVertex {
    pub position: Vec3,
    pub uv: Vec2,
    pub normal: Vec3,
}

/// Parsed mesh data, decoupled from the GPU so it can load on a worker
/// thread and be turned into a macroquad `Mesh` on the main thread.
#[derive(Debug, Clone)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u16>,
}

impl MeshData {
    /// Build a drawable mesh. The tint lands in every vertex colour, which
    /// is how dimmed items are rendered.
    pub fn to_mesh(&self, texture: Option<Texture2D>, tint: Color) -> Mesh {
        Mesh {
            vertices: self
                .vertices
                .iter()
                .map(|v| {
                    Vertex::new(v.position.x, v.position.y, v.position.z, v.uv.x, v.uv.y, tint)
                })
                .collect(),
            indices: self.indices.clone(),
            texture,
        }
    }

    /// Radius of the bounding sphere around the local origin. Used for
    /// pointer picking.
    pub fn bounding_radius(&self) -> f32 {
        self.vertices
            .iter()
            .map(|v| v.position.length())
            .fold(0.0, f32::max)
    }
}

/// Parse OBJ file contents.
pub fn parse_obj(contents: &str) -> Result<MeshData, AssetError> {
    let mut positions: Vec<Vec3> = Vec::new();
    let mut tex_coords: Vec<Vec2> = Vec::new();
    let mut normals: Vec<Vec3> = Vec::new();

    let mut vertices: Vec<MeshVertex> = Vec::new();
    let mut indices: Vec<u16> = Vec::new();

    // Unique (pos, uv, normal) index triples -> vertex index
    let mut vertex_cache: HashMap<(usize, usize, usize), u16> = HashMap::new();

    for (line_num, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts[0] {
            "v" => {
                if parts.len() < 4 {
                    return Err(parse_error(line_num, "vertex position needs 3 values"));
                }
                positions.push(Vec3::new(
                    parse_float(parts[1], line_num)?,
                    parse_float(parts[2], line_num)?,
                    parse_float(parts[3], line_num)?,
                ));
            }

            "vt" => {
                if parts.len() < 3 {
                    return Err(parse_error(line_num, "texture coordinate needs 2 values"));
                }
                // OBJ uses a bottom-left UV origin; textures sample top-left
                let u = parse_float(parts[1], line_num)?;
                let v = parse_float(parts[2], line_num)?;
                tex_coords.push(vec2(u, 1.0 - v));
            }

            "vn" => {
                if parts.len() < 4 {
                    return Err(parse_error(line_num, "normal needs 3 values"));
                }
                normals.push(Vec3::new(
                    parse_float(parts[1], line_num)?,
                    parse_float(parts[2], line_num)?,
                    parse_float(parts[3], line_num)?,
                ));
            }

            "f" => {
                if parts.len() < 4 {
                    return Err(parse_error(line_num, "face needs at least 3 vertices"));
                }

                let mut face_verts = Vec::with_capacity(parts.len() - 1);
                for spec in &parts[1..] {
                    face_verts.push(resolve_face_vertex(
                        spec,
                        line_num,
                        &positions,
                        &tex_coords,
                        &normals,
                        &mut vertices,
                        &mut vertex_cache,
                    )?);
                }

                // Fan triangulation handles quads and n-gons
                for i in 1..(face_verts.len() - 1) {
                    indices.push(face_verts[0]);
                    indices.push(face_verts[i]);
                    indices.push(face_verts[i + 1]);
                }
            }

            // Ignore other OBJ commands (o, g, s, usemtl, mtllib, ...)
            _ => {}
        }
    }

    if vertices.is_empty() {
        return Err(AssetError::Parse("no vertices found in OBJ".to_string()));
    }
    if indices.is_empty() {
        return Err(AssetError::Parse("no faces found in OBJ".to_string()));
    }

    Ok(MeshData { vertices, indices })
}

fn parse_error(line_num: usize, msg: &str) -> AssetError {
    AssetError::Parse(format!("line {}: {}", line_num + 1, msg))
}

fn parse_float(s: &str, line_num: usize) -> Result<f32, AssetError> {
    s.parse::<f32>()
        .map_err(|_| parse_error(line_num, &format!("invalid float '{}'", s)))
}

fn parse_index(s: &str, len: usize, line_num: usize) -> Result<usize, AssetError> {
    let idx: usize = s
        .parse()
        .map_err(|_| parse_error(line_num, &format!("invalid index '{}'", s)))?;
    if idx == 0 || idx > len {
        return Err(parse_error(
            line_num,
            &format!("index {} out of range (1..={})", idx, len),
        ));
    }
    Ok(idx - 1) // OBJ indices are 1-based
}

/// Resolve a face vertex spec like "1/2/3", "1//3" or "1" to a vertex index,
/// deduplicating through the cache.
fn resolve_face_vertex(
    spec: &str,
    line_num: usize,
    positions: &[Vec3],
    tex_coords: &[Vec2],
    normals: &[Vec3],
    vertices: &mut Vec<MeshVertex>,
    vertex_cache: &mut HashMap<(usize, usize, usize), u16>,
) -> Result<u16, AssetError> {
    let parts: Vec<&str> = spec.split('/').collect();

    if parts[0].is_empty() {
        return Err(parse_error(line_num, "missing position index in face"));
    }
    let pos_idx = parse_index(parts[0], positions.len(), line_num)?;

    let uv_idx = match parts.get(1) {
        Some(s) if !s.is_empty() => Some(parse_index(s, tex_coords.len(), line_num)?),
        _ => None,
    };
    let norm_idx = match parts.get(2) {
        Some(s) if !s.is_empty() => Some(parse_index(s, normals.len(), line_num)?),
        _ => None,
    };

    let key = (pos_idx, uv_idx.unwrap_or(usize::MAX), norm_idx.unwrap_or(usize::MAX));
    if let Some(&idx) = vertex_cache.get(&key) {
        return Ok(idx);
    }

    if vertices.len() > u16::MAX as usize {
        return Err(AssetError::Parse(format!(
            "mesh has more than {} unique vertices",
            u16::MAX
        )));
    }

    let vertex = MeshVertex {
        position: positions[pos_idx],
        uv: uv_idx.map(|i| tex_coords[i]).unwrap_or(Vec2::ZERO),
        normal: norm_idx.map(|i| normals[i]).unwrap_or(Vec3::Y),
    };
    let idx = vertices.len() as u16;
    vertices.push(vertex);
    vertex_cache.insert(key, idx);
    Ok(idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &str = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvt 1 0\nvt 0 1\nf 1/1 2/2 3/3\n";

    #[test]
    fn test_parse_triangle() {
        let mesh = parse_obj(TRIANGLE).unwrap();
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        assert_eq!(mesh.vertices[1].position, Vec3::new(1.0, 0.0, 0.0));
        // V coordinate is flipped to a top-left origin
        assert_eq!(mesh.vertices[1].uv, vec2(1.0, 1.0));
    }

    #[test]
    fn test_quad_fan_triangulation() {
        let obj = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";
        let mesh = parse_obj(obj).unwrap();
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn test_vertex_dedup_across_faces() {
        let obj = "v 0 0 0\nv 1 0 0\nv 0 1 0\nv 1 1 0\nf 1 2 3\nf 3 2 4\n";
        let mesh = parse_obj(obj).unwrap();
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices.len(), 6);
    }

    #[test]
    fn test_normals_and_missing_uvs() {
        let obj = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//1\n";
        let mesh = parse_obj(obj).unwrap();
        assert_eq!(mesh.vertices[0].normal, Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(mesh.vertices[0].uv, Vec2::ZERO);
    }

    #[test]
    fn test_comments_and_unknown_commands_ignored() {
        let obj = format!("# a book\no book\ns off\nusemtl cover\n{}", TRIANGLE);
        assert!(parse_obj(&obj).is_ok());
    }

    #[test]
    fn test_empty_and_malformed_inputs() {
        assert!(matches!(parse_obj(""), Err(AssetError::Parse(_))));
        assert!(parse_obj("v 0 0 0\n").is_err()); // no faces
        assert!(parse_obj("v 0 0\n").is_err()); // short position
        assert!(parse_obj("v 0 0 zebra\n").is_err()); // bad float
        assert!(parse_obj("v 0 0 0\nf 1 2 3\n").is_err()); // index out of range
    }

    #[test]
    fn test_bounding_radius() {
        let obj = "v 3 0 0\nv 0 4 0\nv 0 0 1\nf 1 2 3\n";
        let mesh = parse_obj(obj).unwrap();
        assert!((mesh.bounding_radius() - 4.0).abs() < 1e-6);
    }
}
