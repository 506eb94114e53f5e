//! Startup configuration from command-line flags and the environment.

use std::{fmt::Display, path::PathBuf, str::FromStr};

use clap::Parser;

use crate::gfx::{
    lighting::LightSpace,
    rendering::{RenderOptions, ShadingMode},
    scene::ModelPaths,
};

pub const BUNNY_ENV: &str = "LIGHTBENCH_BUNNY";
pub const COW_ENV: &str = "LIGHTBENCH_COW";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid window size '{0}', expected <width>x<height>")]
    InvalidSize(String),
}

/// Initial window size in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

impl FromStr for WindowSize {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidSize(s.to_string());
        let (w, h) = s.split_once(|c: char| c == 'x' || c == 'X').ok_or_else(invalid)?;
        let width: u32 = w.trim().parse().map_err(|_| invalid())?;
        let height: u32 = h.trim().parse().map_err(|_| invalid())?;
        if width == 0 || height == 0 {
            return Err(invalid());
        }
        Ok(Self { width, height })
    }
}

impl Display for WindowSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Interactive multi-light shading viewer.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "lightbench", version)]
pub struct ViewerConfig {
    #[arg(long, value_enum, default_value_t)]
    /// Shading program for the first frame
    pub shading: ShadingMode,

    #[arg(long, value_enum, default_value_t)]
    /// Frame the light positions are expressed in
    pub light_space: LightSpace,

    #[arg(long)]
    /// Draw edges instead of filled triangles
    pub wireframe: bool,

    #[arg(long)]
    /// Wait for vertical sync
    pub vsync: bool,

    #[arg(long, env = BUNNY_ENV)]
    /// OBJ file for the bunny; a sphere is drawn without one
    pub bunny: Option<PathBuf>,

    #[arg(long, env = COW_ENV)]
    /// OBJ file for the cow; a sphere is drawn without one
    pub cow: Option<PathBuf>,

    #[arg(long, default_value_t)]
    /// Initial window size in format `width`x`height`
    pub size: WindowSize,
}

impl ViewerConfig {
    /// Render options the viewer starts with.
    pub fn options(&self) -> RenderOptions {
        RenderOptions {
            wireframe: self.wireframe,
            shading_mode: self.shading,
            light_space: self.light_space,
            ..RenderOptions::default()
        }
    }

    pub fn models(&self) -> ModelPaths {
        ModelPaths {
            bunny: self.bunny.clone(),
            cow: self.cow.clone(),
        }
    }
}
