use bevy::prelude::Resource;
use thiserror::Error;

use crate::color::HeightColorPolicy;

pub const USAGE: &str = "usage: terrain [HEIGHTMAP_PATH] [--grayscale] [--view=city|heightmap|cube]";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgsError {
    #[error("help requested")]
    Help,

    #[error("unknown flag {0}")]
    UnknownFlag(String),

    #[error("unknown view {0}, expected city, heightmap or cube")]
    UnknownView(String),
}

/// Which of the demo scenes to set up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SceneView {
    /// Terrain under a moving sun with a paper plane flying over it.
    #[default]
    City,
    /// Terrain lit by a spot light, with a normal-mapped cube hovering above.
    Heightmap,
    /// A single spinning cube, no terrain.
    Cube,
}

impl SceneView {
    pub fn has_terrain(self) -> bool {
        !matches!(self, Self::Cube)
    }
}

impl std::str::FromStr for SceneView {
    type Err = ArgsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "city" => Ok(Self::City),
            "heightmap" => Ok(Self::Heightmap),
            "cube" => Ok(Self::Cube),
            _ => Err(ArgsError::UnknownView(s.to_string())),
        }
    }
}

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct TerrainSettings {
    /// Relative to the `assets` folder.
    pub heightmap_path: String,
    /// World units of height per unit of pixel brightness.
    pub scale_factor: f32,
    pub color_policy: HeightColorPolicy,
    pub cast_shadows: bool,
    pub view: SceneView,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            heightmap_path: "texture/heightmap.png".to_string(),
            scale_factor: 0.1,
            color_policy: HeightColorPolicy::default(),
            cast_shadows: true,
            view: SceneView::default(),
        }
    }
}

impl TerrainSettings {
    pub fn with_heightmap_path(mut self, path: impl Into<String>) -> Self {
        self.heightmap_path = path.into();
        self
    }

    pub fn with_scale_factor(mut self, scale_factor: f32) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    pub fn with_color_policy(mut self, color_policy: HeightColorPolicy) -> Self {
        self.color_policy = color_policy;
        self
    }

    pub fn with_view(mut self, view: SceneView) -> Self {
        self.view = view;
        self
    }

    /// Parses the arguments described by [`USAGE`]. Anything starting with `-` that
    /// isn't a known flag is an error rather than a heightmap path.
    pub fn from_args(args: impl IntoIterator<Item = String>) -> Result<Self, ArgsError> {
        let mut settings = Self::default();

        for arg in args {
            if arg == "--help" || arg == "-h" {
                return Err(ArgsError::Help);
            } else if arg == "--grayscale" {
                settings = settings.with_color_policy(HeightColorPolicy::Grayscale);
            } else if let Some(view) = arg.strip_prefix("--view=") {
                settings = settings.with_view(view.parse()?);
            } else if arg.starts_with('-') {
                return Err(ArgsError::UnknownFlag(arg));
            } else {
                settings = settings.with_heightmap_path(arg);
            }
        }

        Ok(settings)
    }
}
