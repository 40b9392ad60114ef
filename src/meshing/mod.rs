mod grid;

pub use grid::{fits_u32_indices, heightmap_to_grid_mesh, normalized_height};

use bevy::{
    prelude::*,
    render::{mesh::Indices, render_resource::PrimitiveTopology},
};

/// Indexed triangle mesh produced from a heightmap. Vertex `i` belongs to grid cell
/// `(i % width, i / width)`.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainMeshData {
    vertices: Vec<Vec3>,
    colors: Vec<[f32; 4]>,
    normalized_heights: Vec<f32>,
    triangles: Vec<u32>,
}

impl TerrainMeshData {
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn colors(&self) -> &[[f32; 4]] {
        &self.colors
    }

    /// Per-vertex height relative to the tallest cell of the source grid.
    pub fn normalized_heights(&self) -> &[f32] {
        &self.normalized_heights
    }

    /// Flat index buffer, three entries per triangle.
    pub fn indices(&self) -> &[u32] {
        &self.triangles
    }

    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.triangles.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    /// Smooth normals: every triangle adds its area-weighted face normal to its three
    /// corners. Vertices without any triangle point straight up.
    pub fn compute_vertex_normals(&self) -> Vec<Vec3> {
        let mut normals = vec![Vec3::ZERO; self.vertices.len()];

        for [a, b, c] in self.triangles() {
            let (a, b, c) = (a as usize, b as usize, c as usize);
            let face = (self.vertices[b] - self.vertices[a])
                .cross(self.vertices[c] - self.vertices[a]);

            normals[a] += face;
            normals[b] += face;
            normals[c] += face;
        }

        normals
            .into_iter()
            .map(|n| n.try_normalize().unwrap_or(Vec3::Y))
            .collect()
    }

    pub fn into_render_mesh(self) -> Mesh {
        let normals = self.compute_vertex_normals();

        let mut mesh = Mesh::new(PrimitiveTopology::TriangleList);

        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, self.vertices);
        mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
        mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, self.colors);

        mesh.set_indices(Some(Indices::U32(self.triangles)));

        mesh
    }
}
