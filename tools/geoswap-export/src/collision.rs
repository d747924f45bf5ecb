//! OBJ to collision chunk conversion

use anyhow::{Context, Result};
use geoswap_common::CollisionMesh;
use std::path::Path;

use crate::obj::parse_obj;

/// Convert an OBJ file to an encoded collision container in memory.
pub fn convert_obj_to_memory(input: &Path) -> Result<Vec<u8>> {
    let mesh = parse_obj(input)?;
    encode_mesh(&mesh)
}

/// Convert an OBJ file and write the encoded container to `output`.
pub fn convert_obj_to_collision(input: &Path, output: &Path) -> Result<()> {
    let bytes = convert_obj_to_memory(input)?;
    std::fs::write(output, &bytes)
        .with_context(|| format!("Failed to write output: {:?}", output))?;
    tracing::info!("Wrote collision chunk: {} bytes", bytes.len());
    Ok(())
}

fn encode_mesh(mesh: &CollisionMesh) -> Result<Vec<u8>> {
    mesh.encode().with_context(|| {
        format!(
            "Failed to encode collision mesh ({} vertices, {} faces)",
            mesh.vertex_count(),
            mesh.face_count()
        )
    })
}
