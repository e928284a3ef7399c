//! OBJ file loader for level geometry
//!
//! Reads `v`, `vt`, `vn` and `f` records. Polygons are fan-triangulated
//! around their first corner, and identical `p/t/n` corner strings share a
//! single output vertex. Everything else (`o`, `g`, `s`, `usemtl`, ...) is
//! skipped; `mtllib` names can be listed with
//! [`ObjLoader::material_libraries`].

use crate::render::{Mesh, Vertex};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Texture coordinate used when a corner has none
const DEFAULT_TEX_COORD: [f32; 2] = [0.0, 0.0];

/// Normal used when a corner has none
const DEFAULT_NORMAL: [f32; 3] = [0.0, 1.0, 0.0];

/// Errors produced while loading an OBJ file
#[derive(Error, Debug)]
pub enum ObjError {
    /// The file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A record held something that is not a number
    #[error("Line {line}: {message}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// What went wrong
        message: String,
    },

    /// A face corner references a position that was never declared
    #[error("Line {line}: position index {index} out of range ({count} positions)")]
    PositionOutOfRange {
        /// 1-based line number
        line: usize,
        /// Index as written in the file
        index: i64,
        /// Positions declared so far
        count: usize,
    },

    /// The file contained no faces
    #[error("No faces found in OBJ data")]
    Empty,
}

/// Wavefront OBJ loader
pub struct ObjLoader;

impl ObjLoader {
    /// Load an OBJ file and return a mesh
    pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Mesh, ObjError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let mesh = Self::parse(&text)?;
        log::info!(
            "Loaded OBJ {}: {} vertices, {} triangles",
            path.display(),
            mesh.vertex_count(),
            mesh.triangle_count()
        );
        Ok(mesh)
    }

    /// Parse OBJ text into a mesh
    pub fn parse(text: &str) -> Result<Mesh, ObjError> {
        let mut positions: Vec<[f32; 3]> = Vec::new();
        let mut normals: Vec<[f32; 3]> = Vec::new();
        let mut tex_coords: Vec<[f32; 2]> = Vec::new();

        let mut vertices = Vec::new();
        let mut indices = Vec::new();
        let mut cache: HashMap<&str, u32> = HashMap::new();

        for (line_index, raw) in text.lines().enumerate() {
            let line = line_index + 1;
            let mut parts = raw.split_whitespace();

            match parts.next() {
                Some("v") => positions.push(parse_floats(&mut parts, line, "v")?),
                Some("vn") => normals.push(parse_floats(&mut parts, line, "vn")?),
                Some("vt") => tex_coords.push(parse_floats(&mut parts, line, "vt")?),
                Some("f") => {
                    let corners: Vec<&str> = parts.collect();
                    if corners.len() < 3 {
                        log::warn!("OBJ line {}: face with {} corner(s) skipped", line, corners.len());
                        continue;
                    }

                    let mut face = Vec::with_capacity(corners.len());
                    for corner in corners {
                        let index = match cache.get(corner) {
                            Some(&index) => index,
                            None => {
                                let vertex = build_vertex(corner, line, &positions, &tex_coords, &normals)?;
                                let index = vertices.len() as u32;
                                vertices.push(vertex);
                                cache.insert(corner, index);
                                index
                            }
                        };
                        face.push(index);
                    }

                    for i in 1..face.len() - 1 {
                        indices.extend_from_slice(&[face[0], face[i], face[i + 1]]);
                    }
                }
                _ => {}
            }
        }

        if indices.is_empty() {
            return Err(ObjError::Empty);
        }

        log::debug!(
            "Parsed OBJ: {} positions, {} unique vertices, {} triangles",
            positions.len(),
            vertices.len(),
            indices.len() / 3
        );
        Ok(Mesh::new(vertices, indices))
    }

    /// Names of the material libraries referenced by `mtllib` records
    pub fn material_libraries(text: &str) -> Vec<String> {
        text.lines()
            .filter_map(|line| line.trim().strip_prefix("mtllib "))
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect()
    }
}

/// Parse the first `N` numbers of a record; missing trailing values are zero
fn parse_floats<'a, const N: usize>(
    parts: &mut impl Iterator<Item = &'a str>,
    line: usize,
    record: &str,
) -> Result<[f32; N], ObjError> {
    let mut values = [0.0; N];
    for (value, token) in values.iter_mut().zip(parts) {
        *value = token.parse().map_err(|_| ObjError::Parse {
            line,
            message: format!("{} has invalid number '{}'", record, token),
        })?;
    }
    Ok(values)
}

/// Resolve a 1-based (or negative, relative) OBJ index
fn resolve_index(index: i64, count: usize) -> Option<usize> {
    let resolved = if index < 0 { count as i64 + index } else { index - 1 };
    usize::try_from(resolved).ok().filter(|i| *i < count)
}

fn parse_index(token: &str, line: usize) -> Result<Option<i64>, ObjError> {
    if token.is_empty() {
        return Ok(None);
    }
    token.parse().map(Some).map_err(|_| ObjError::Parse {
        line,
        message: format!("invalid face index '{}'", token),
    })
}

fn build_vertex(
    corner: &str,
    line: usize,
    positions: &[[f32; 3]],
    tex_coords: &[[f32; 2]],
    normals: &[[f32; 3]],
) -> Result<Vertex, ObjError> {
    let mut fields = corner.split('/');
    let position_index = parse_index(fields.next().unwrap_or(""), line)?;
    let tex_index = parse_index(fields.next().unwrap_or(""), line)?;
    let normal_index = parse_index(fields.next().unwrap_or(""), line)?;

    let written = position_index.ok_or_else(|| ObjError::Parse {
        line,
        message: format!("face corner '{}' has no position index", corner),
    })?;
    let position = resolve_index(written, positions.len())
        .map(|i| positions[i])
        .ok_or(ObjError::PositionOutOfRange { line, index: written, count: positions.len() })?;

    let tex_coord = tex_index
        .and_then(|i| resolve_index(i, tex_coords.len()))
        .map_or(DEFAULT_TEX_COORD, |i| tex_coords[i]);
    let normal = normal_index
        .and_then(|i| resolve_index(i, normals.len()))
        .map_or(DEFAULT_NORMAL, |i| normals[i]);

    Ok(Vertex::new(position, tex_coord, normal))
}
