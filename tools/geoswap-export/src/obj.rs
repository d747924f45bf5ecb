//! OBJ parsing for collision meshes
//!
//! Collision meshes only need positions, so texture coordinates, normals,
//! groups and materials are skipped. Vertices are kept shared (faces index
//! into the position list directly) to stay inside the 255-vertex limit of
//! a collision chunk.

use anyhow::{Context, Result, bail};
use geoswap_common::CollisionMesh;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Parse an OBJ file into a collision mesh.
pub fn parse_obj(input: &Path) -> Result<CollisionMesh> {
    let file = File::open(input).with_context(|| format!("Failed to open OBJ: {:?}", input))?;
    parse_obj_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse OBJ: {:?}", input))
}

/// Parse OBJ text from any buffered reader.
pub fn parse_obj_reader(reader: impl BufRead) -> Result<CollisionMesh> {
    let mut vertex_buffer: Vec<f32> = Vec::new();
    let mut index_buffer: Vec<u32> = Vec::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts[0] {
            "v" if parts.len() >= 4 => {
                for coord in &parts[1..4] {
                    let value: f32 = coord.parse().with_context(|| {
                        format!("Line {}: invalid coordinate {:?}", line_no + 1, coord)
                    })?;
                    vertex_buffer.push(value);
                }
            }
            "f" if parts.len() >= 4 => {
                let vertex_count = vertex_buffer.len() / 3;
                let face: Vec<u32> = parts[1..]
                    .iter()
                    .map(|v| parse_face_vertex(v, vertex_count))
                    .collect::<Option<_>>()
                    .with_context(|| format!("Line {}: invalid face {:?}", line_no + 1, line))?;

                // Fan triangulation for convex polygons
                for i in 1..face.len() - 1 {
                    index_buffer.extend_from_slice(&[face[0], face[i], face[i + 1]]);
                }
            }
            _ => {}
        }
    }

    if vertex_buffer.is_empty() {
        bail!("No vertices found in OBJ file");
    }

    tracing::info!(
        "Parsed OBJ collision mesh: {} vertices, {} faces",
        vertex_buffer.len() / 3,
        index_buffer.len() / 3
    );

    Ok(CollisionMesh::new(vertex_buffer, index_buffer))
}

/// Resolve the position index of a face vertex: "v", "v/vt", "v/vt/vn",
/// or "v//vn". Negative indices count back from the last vertex.
fn parse_face_vertex(s: &str, vertex_count: usize) -> Option<u32> {
    let index: i64 = s.split('/').next()?.parse().ok()?;
    let resolved = match index {
        i if i > 0 => i - 1,
        i if i < 0 => vertex_count as i64 + i,
        _ => return None,
    };
    if resolved < 0 || resolved >= vertex_count as i64 {
        return None;
    }
    u32::try_from(resolved).ok()
}
