//! Shrub inspection

use anyhow::{Context, Result};
use geoswap_common::{CullingSphere, ShrubModel, TextureConfig};
use serde::Serialize;
use std::path::Path;

/// JSON-friendly overview of a decoded shrub.
#[derive(Debug, Clone, Serialize)]
pub struct ShrubSummary {
    pub id: i16,
    pub culling: CullingSphere,
    pub vertex_count: usize,
    pub face_count: usize,
    pub texture_configs: Vec<TextureConfig>,
    /// Axis-aligned bounds of the vertex positions, `None` for empty models
    pub bounds: Option<([f32; 3], [f32; 3])>,
}

impl ShrubSummary {
    pub fn from_model(model: &ShrubModel) -> Self {
        let bounds = model
            .vertex_buffer
            .chunks_exact(geoswap_common::formats::shrub::VERTEX_STRIDE)
            .map(|v| [v[0], v[1], v[2]])
            .fold(None, |acc: Option<([f32; 3], [f32; 3])>, p| {
                Some(match acc {
                    None => (p, p),
                    Some((min, max)) => (
                        [min[0].min(p[0]), min[1].min(p[1]), min[2].min(p[2])],
                        [max[0].max(p[0]), max[1].max(p[1]), max[2].max(p[2])],
                    ),
                })
            });

        Self {
            id: model.id,
            culling: model.culling,
            vertex_count: model.vertex_count(),
            face_count: model.face_count(),
            texture_configs: model.texture_configs.clone(),
            bounds,
        }
    }
}

/// Decode the shrub whose header sits at `offset` in `input`.
///
/// Header pointers are resolved against `body` when given, otherwise
/// against `input` itself.
pub fn read_shrub(
    input: &Path,
    offset: usize,
    face_count: usize,
    body: Option<&Path>,
) -> Result<ShrubModel> {
    let head =
        std::fs::read(input).with_context(|| format!("Failed to read shrub file: {:?}", input))?;
    let body_bytes = match body {
        Some(path) => Some(
            std::fs::read(path).with_context(|| format!("Failed to read body file: {:?}", path))?,
        ),
        None => None,
    };

    let model = ShrubModel::decode(&head, offset, body_bytes.as_deref().unwrap_or(&head), face_count)
        .with_context(|| format!("Failed to decode shrub at {:#x} in {:?}", offset, input))?;

    tracing::info!(
        "Decoded shrub {}: {} vertices, {} faces, {} textures",
        model.id,
        model.vertex_count(),
        model.face_count(),
        model.texture_configs.len()
    );
    Ok(model)
}
