//! CLI enum types for the generation presets: size, quality, style.

use clap::ValueEnum;
use reimagine_core::config::{ImageQuality, ImageSize, ImageStyle};

/// Output resolution.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Size {
    /// 1024x1024
    Square,
    /// 1792x1024 widescreen
    Landscape,
    /// 1024x1792 portrait
    Portrait,
}

impl From<Size> for ImageSize {
    fn from(size: Size) -> Self {
        match size {
            Size::Square => ImageSize::Square,
            Size::Landscape => ImageSize::Landscape,
            Size::Portrait => ImageSize::Portrait,
        }
    }
}

/// Rendering quality tier.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Quality {
    Standard,
    /// Finer detail, slower
    Hd,
}

impl From<Quality> for ImageQuality {
    fn from(quality: Quality) -> Self {
        match quality {
            Quality::Standard => ImageQuality::Standard,
            Quality::Hd => ImageQuality::Hd,
        }
    }
}

/// Stylistic preset.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Style {
    /// Hyper-real, dramatic colors
    Vivid,
    /// More photographic
    Natural,
}

impl From<Style> for ImageStyle {
    fn from(style: Style) -> Self {
        match style {
            Style::Vivid => ImageStyle::Vivid,
            Style::Natural => ImageStyle::Natural,
        }
    }
}
