/// Maps a normalized height in `[0, 1]` to an RGBA vertex color.
pub trait ColorPolicy {
    fn color(&self, normalized_height: f32) -> [f32; 4];
}

impl<F> ColorPolicy for F
where
    F: Fn(f32) -> [f32; 4],
{
    fn color(&self, normalized_height: f32) -> [f32; 4] {
        self(normalized_height)
    }
}

pub const GRASS: [f32; 4] = [0., 1., 0., 1.];
pub const DIRT: [f32; 4] = [0.6, 0.3, 0., 1.];
pub const SNOW: [f32; 4] = [1., 1., 1., 1.];

/// Three flat color bands split at two normalized-height thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorBands {
    pub low: [f32; 4],
    pub mid: [f32; 4],
    pub high: [f32; 4],
    pub mid_threshold: f32,
    pub high_threshold: f32,
}

impl Default for ColorBands {
    fn default() -> Self {
        Self {
            low: GRASS,
            mid: DIRT,
            high: SNOW,
            mid_threshold: 0.5,
            high_threshold: 0.8,
        }
    }
}

impl ColorBands {
    pub fn color(&self, normalized_height: f32) -> [f32; 4] {
        if normalized_height < self.mid_threshold {
            self.low
        } else if normalized_height < self.high_threshold {
            self.mid
        } else {
            self.high
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeightColorPolicy {
    /// Low ground green, slopes brown, peaks white.
    Banded(ColorBands),
    /// Inverted grayscale: the lowest cells are white, the highest black.
    Grayscale,
}

impl Default for HeightColorPolicy {
    fn default() -> Self {
        Self::Banded(ColorBands::default())
    }
}

impl ColorPolicy for HeightColorPolicy {
    fn color(&self, normalized_height: f32) -> [f32; 4] {
        match self {
            Self::Banded(bands) => bands.color(normalized_height),
            Self::Grayscale => {
                let v = 1. - normalized_height;
                [v, v, v, 1.]
            }
        }
    }
}
