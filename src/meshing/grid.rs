use bevy::log::{debug, warn};
use bevy::prelude::Vec3;

use super::TerrainMeshData;
use crate::{color::ColorPolicy, heightmap::HeightSampleGrid};

/// Height relative to the grid maximum. A grid with no height at all is treated as
/// uniformly flat ground.
pub fn normalized_height(scaled_height: f32, max_height: f32) -> f32 {
    if max_height > 0. {
        scaled_height / max_height
    } else {
        0.
    }
}

/// Whether a grid with this many vertices can be addressed by a `u32` index buffer.
pub fn fits_u32_indices(vertex_count: usize) -> bool {
    u32::try_from(vertex_count).is_ok()
}

/// Builds one vertex per grid cell and two triangles per interior quad.
///
/// Grids narrower or shorter than two cells can't form a quad, and grids with more
/// cells than a `u32` index can reach can't be indexed; both come back as a
/// vertex-only mesh with an empty index buffer.
pub fn heightmap_to_grid_mesh(
    terrain: &HeightSampleGrid,
    scale_factor: f32,
    color_policy: &impl ColorPolicy,
) -> TerrainMeshData {
    let (width, height) = terrain.dim();

    let indexable = fits_u32_indices(width * height);

    if width < 2 || height < 2 {
        warn!("heightmap is {width}x{height}, terrain will have no triangles");
    } else if !indexable {
        warn!("heightmap is {width}x{height}, too large for u32 indices, terrain will have no triangles");
    }

    // Colors are relative to this heightmap's own peak, so it has to be known up front
    let max_height = terrain.max_scaled_height(scale_factor);

    let quads = if indexable {
        width.saturating_sub(1) * height.saturating_sub(1)
    } else {
        0
    };

    let mut vertices = Vec::with_capacity(width * height);
    let mut colors = Vec::with_capacity(width * height);
    let mut normalized_heights = Vec::with_capacity(width * height);
    let mut triangles = Vec::with_capacity(quads * 6);

    let idx = |x: usize, z: usize| -> u32 { (z * width + x) as u32 };

    for z in 0..height {
        for x in 0..width {
            let y = terrain.scaled_height_at(x, z, scale_factor);
            let normalized = normalized_height(y, max_height);

            vertices.push(Vec3::new(x as f32, y, z as f32));
            normalized_heights.push(normalized);
            colors.push(color_policy.color(normalized));

            if indexable && z + 1 < height && x + 1 < width {
                let top_left = idx(x, z);
                let top_right = top_left + 1;
                let bottom_left = idx(x, z + 1);
                let bottom_right = bottom_left + 1;

                triangles.extend([top_left, bottom_left, top_right]);
                triangles.extend([top_right, bottom_left, bottom_right]);
            }
        }
    }

    debug!(
        "built {width}x{height} terrain: {} vertices, {} triangles",
        vertices.len(),
        triangles.len() / 3
    );

    TerrainMeshData {
        vertices,
        colors,
        normalized_heights,
        triangles,
    }
}
