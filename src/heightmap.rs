use ndarray::Array2;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("heightmap must be at least 1x1, got {width}x{height}")]
    Empty { width: usize, height: usize },

    #[error("expected {expected} samples for a {width}x{height} heightmap, got {actual}")]
    SampleCount {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },
}

/// Raw brightness samples of a heightmap image, one byte per cell.
///
/// Indexed `[[x, z]]` with dimension `(width, height)`.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightSampleGrid(pub(crate) Array2<u8>);

impl HeightSampleGrid {
    /// Builds a grid from samples stored row by row, so cell `(x, z)` is
    /// `samples[z * width + x]`.
    pub fn from_row_major(width: usize, height: usize, samples: Vec<u8>) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::Empty { width, height });
        }

        let expected = width * height;
        if samples.len() != expected {
            return Err(GridError::SampleCount {
                width,
                height,
                expected,
                actual: samples.len(),
            });
        }

        Ok(Self(Array2::from_shape_fn((width, height), |(x, z)| {
            samples[z * width + x]
        })))
    }

    pub fn from_fn(
        (width, height): (usize, usize),
        f: impl FnMut((usize, usize)) -> u8,
    ) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::Empty { width, height });
        }

        Ok(Self(Array2::from_shape_fn((width, height), f)))
    }

    pub fn sample_at(&self, x: usize, z: usize) -> u8 {
        self.0[[x, z]]
    }

    pub fn scaled_height_at(&self, x: usize, z: usize, scale_factor: f32) -> f32 {
        self.sample_at(x, z) as f32 * scale_factor
    }

    /// Largest scaled height anywhere in the grid. Samples are never negative, so an
    /// all-zero grid yields 0.
    pub fn max_scaled_height(&self, scale_factor: f32) -> f32 {
        self.0
            .iter()
            .fold(0.0_f32, |max, &sample| max.max(sample as f32 * scale_factor))
    }

    pub fn width(&self) -> usize {
        self.0.dim().0
    }

    pub fn height(&self) -> usize {
        self.0.dim().1
    }

    pub fn dim(&self) -> (usize, usize) {
        self.0.dim()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
