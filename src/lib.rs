pub mod color;
pub mod heightmap;
pub mod meshing;
pub mod sampler;
pub mod scene;
pub mod settings;

pub use color::{ColorBands, ColorPolicy, HeightColorPolicy};
pub use heightmap::{GridError, HeightSampleGrid};
pub use meshing::{heightmap_to_grid_mesh, TerrainMeshData};
pub use sampler::{grid_from_image, SampleError};
pub use settings::TerrainSettings;
