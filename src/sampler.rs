use bevy::render::{render_resource::TextureFormat, texture::Image};
use thiserror::Error;

use crate::heightmap::{GridError, HeightSampleGrid};

#[derive(Debug, Error)]
pub enum SampleError {
    #[error("heightmap texture format {0:?} is not an 8 or 16-bit color format")]
    UnsupportedFormat(TextureFormat),

    #[error("heightmap texture holds {actual} bytes, expected {expected}")]
    DataLength { expected: usize, actual: usize },

    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Byte stride of one pixel and the offset of the byte read from it. For 16-bit
/// channels that is the high byte of red, stored second (little-endian).
fn red_channel_layout(format: TextureFormat) -> Option<(usize, usize)> {
    match format {
        TextureFormat::R8Unorm => Some((1, 0)),
        TextureFormat::Rg8Unorm => Some((2, 0)),
        TextureFormat::Rgba8Unorm | TextureFormat::Rgba8UnormSrgb => Some((4, 0)),
        TextureFormat::Bgra8Unorm | TextureFormat::Bgra8UnormSrgb => Some((4, 2)),
        TextureFormat::R16Uint => Some((2, 1)),
        TextureFormat::Rg16Uint => Some((4, 1)),
        TextureFormat::Rgba16Uint => Some((8, 1)),
        _ => None,
    }
}

/// Turns a decoded image into height samples. Only the red channel is read, a
/// grayscale heightmap stores the same value in every channel anyway.
pub fn grid_from_image(image: &Image) -> Result<HeightSampleGrid, SampleError> {
    let format = image.texture_descriptor.format;
    let (stride, offset) =
        red_channel_layout(format).ok_or(SampleError::UnsupportedFormat(format))?;

    let width = image.texture_descriptor.size.width as usize;
    let height = image.texture_descriptor.size.height as usize;

    let expected = width * height * stride;
    if image.data.len() != expected {
        return Err(SampleError::DataLength {
            expected,
            actual: image.data.len(),
        });
    }

    let samples = image
        .data
        .chunks_exact(stride)
        .map(|pixel| pixel[offset])
        .collect();

    Ok(HeightSampleGrid::from_row_major(width, height, samples)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::render::render_resource::{Extent3d, TextureDimension};

    fn image(width: u32, height: u32, data: Vec<u8>, format: TextureFormat) -> Image {
        Image::new(
            Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            TextureDimension::D2,
            data,
            format,
        )
    }

    #[test]
    fn reads_red_channel_of_rgba() {
        #[rustfmt::skip]
        let data = vec![
            10, 99, 99, 255,   20, 99, 99, 255,
            30, 99, 99, 255,   40, 99, 99, 255,
        ];
        let grid = grid_from_image(&image(2, 2, data, TextureFormat::Rgba8UnormSrgb)).unwrap();

        assert_eq!(grid.sample_at(0, 0), 10);
        assert_eq!(grid.sample_at(1, 0), 20);
        assert_eq!(grid.sample_at(0, 1), 30);
        assert_eq!(grid.sample_at(1, 1), 40);
    }

    #[test]
    fn reads_red_channel_of_bgra() {
        let data = vec![1, 2, 3, 255, 4, 5, 6, 255];
        let grid = grid_from_image(&image(2, 1, data, TextureFormat::Bgra8Unorm)).unwrap();

        assert_eq!(grid.sample_at(0, 0), 3);
        assert_eq!(grid.sample_at(1, 0), 6);
    }

    #[test]
    fn reads_single_channel() {
        let grid = grid_from_image(&image(3, 1, vec![7, 8, 9], TextureFormat::R8Unorm)).unwrap();
        assert_eq!(grid.dim(), (3, 1));
        assert_eq!(grid.sample_at(2, 0), 9);
    }

    #[test]
    fn reads_high_byte_of_16_bit_gray() {
        // 0x12ff and 0xab00, little-endian
        let data = vec![0xff, 0x12, 0x00, 0xab];
        let grid = grid_from_image(&image(2, 1, data, TextureFormat::R16Uint)).unwrap();

        assert_eq!(grid.sample_at(0, 0), 0x12);
        assert_eq!(grid.sample_at(1, 0), 0xab);
    }

    #[test]
    fn reads_high_byte_of_16_bit_gray_alpha() {
        let data = vec![0x00, 0x40, 0xff, 0xff, 0x00, 0x80, 0xff, 0xff];
        let grid = grid_from_image(&image(2, 1, data, TextureFormat::Rg16Uint)).unwrap();

        assert_eq!(grid.sample_at(0, 0), 0x40);
        assert_eq!(grid.sample_at(1, 0), 0x80);
    }

    #[test]
    fn reads_high_byte_of_16_bit_rgba() {
        #[rustfmt::skip]
        let data = vec![
            0x00, 0x10, 0x00, 0x99, 0x00, 0x99, 0xff, 0xff,
            0x00, 0x20, 0x00, 0x99, 0x00, 0x99, 0xff, 0xff,
            0x00, 0x30, 0x00, 0x99, 0x00, 0x99, 0xff, 0xff,
            0x00, 0xf0, 0x00, 0x99, 0x00, 0x99, 0xff, 0xff,
        ];
        let grid = grid_from_image(&image(2, 2, data, TextureFormat::Rgba16Uint)).unwrap();

        assert_eq!(grid.sample_at(0, 0), 0x10);
        assert_eq!(grid.sample_at(1, 0), 0x20);
        assert_eq!(grid.sample_at(0, 1), 0x30);
        assert_eq!(grid.sample_at(1, 1), 0xf0);
    }

    #[test]
    fn rejects_float_textures() {
        let img = image(1, 1, vec![0; 16], TextureFormat::Rgba32Float);
        assert!(matches!(
            grid_from_image(&img),
            Err(SampleError::UnsupportedFormat(TextureFormat::Rgba32Float))
        ));
    }

    #[test]
    fn rejects_truncated_data() {
        let mut img = image(2, 2, vec![0; 16], TextureFormat::Rgba8Unorm);
        img.data.truncate(12);

        assert!(matches!(
            grid_from_image(&img),
            Err(SampleError::DataLength {
                expected: 16,
                actual: 12
            })
        ));
    }
}
