use crate::gfx::lighting::LightSpace;

/// Which lighting program draws the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, clap::ValueEnum)]
pub enum ShadingMode {
    /// Per-fragment lighting.
    #[default]
    Phong,
    /// Per-vertex lighting.
    Gouraud,
}

impl ShadingMode {
    pub const ALL: [ShadingMode; 2] = [ShadingMode::Phong, ShadingMode::Gouraud];

    pub fn label(self) -> &'static str {
        match self {
            ShadingMode::Phong => "Phong",
            ShadingMode::Gouraud => "Gouraud",
        }
    }
}

/// Fixed-function state for a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RasterState {
    pub backface_culling: bool,
    pub depth_test: bool,
}

impl Default for RasterState {
    fn default() -> Self {
        Self {
            backface_culling: true,
            depth_test: true,
        }
    }
}

/// Toggles consumed at the start of each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub backface_culling: bool,
    pub depth_test: bool,
    pub wireframe: bool,
    pub shading_mode: ShadingMode,
    pub light_space: LightSpace,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            backface_culling: true,
            depth_test: true,
            wireframe: false,
            shading_mode: ShadingMode::Phong,
            light_space: LightSpace::World,
        }
    }
}

impl RenderOptions {
    pub fn raster_state(&self) -> RasterState {
        RasterState {
            backface_culling: self.backface_culling,
            depth_test: self.depth_test,
        }
    }
}
