
use anyhow::{Result, bail};
use bitflags::bitflags;

/// Source alpha (summed over the kernel, in `0..=255` units) below which an
/// alpha-normalized filter emits a fully transparent black pixel.
pub const MINIMUM_ALPHA: f32 = 4.0;

/// Upper bound on the Kaiser window sharpness.
pub const MAX_KAISER_ALPHA: f32 = 16.0;

/// How a pixel's channels are interpreted while filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    /// Plain weighted average of every channel.
    Linear = 0,
    /// Color weighted by alpha, so transparent texels do not dilute the result.
    LinearAlphaNorm = 1,
    /// Color averaged in linear light, alpha in its native space.
    Srgb = 2,
    /// [`FilterKind::Srgb`] with alpha-weighted color.
    SrgbAlphaNorm = 3,
    /// Tangent-space normals, renormalized after averaging.
    NormalMap = 4,
    /// [`FilterKind::NormalMap`] with alpha-weighted vectors.
    NormalMapAlphaNorm = 5,
    /// Normals that keep their X/Y magnitude across mip levels.
    NormalMapSustain = 6,
    /// [`FilterKind::NormalMapSustain`] with alpha-weighted vectors.
    NormalMapSustainAlphaNorm = 7,
    /// Two-component direction plus a dithered foam mask in blue.
    WaterMap = 8,
    /// Vegetation maps, whose alpha coverage is boosted to survive minification.
    PlantMap = 9,
    Foliage = 10,
    Sky = 11,
    Fog = 12,
}

impl TryFrom<i64> for FilterKind {
    type Error = anyhow::Error;

    fn try_from(val: i64) -> Result<Self> {
        Ok(match val {
            0 => Self::Linear,
            1 => Self::LinearAlphaNorm,
            2 => Self::Srgb,
            3 => Self::SrgbAlphaNorm,
            4 => Self::NormalMap,
            5 => Self::NormalMapAlphaNorm,
            6 => Self::NormalMapSustain,
            7 => Self::NormalMapSustainAlphaNorm,
            8 => Self::WaterMap,
            9 => Self::PlantMap,
            10 => Self::Foliage,
            11 => Self::Sky,
            12 => Self::Fog,
            _ => bail!("Invalid value for 'filter', must be 0-12, got {val}."),
        })
    }
}

impl FilterKind {
    /// Filters that require power-of-two sources for divisor reduction.
    #[must_use]
    pub fn requires_pow2(self) -> bool {
        matches!(self, Self::WaterMap | Self::PlantMap)
    }
}

/// Sampling policy of the arbitrary-size reduction at the image border.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EdgeMode {
    /// Drop taps that fall outside the image and renormalize by the taps used.
    #[default]
    Clip,
    /// Sample the image as a torus, for tileable textures.
    Wrap,
}

/// Parameters shared by every reduction call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeOptions {
    pub filter: FilterKind,
    /// Support half-width of the kernel, in destination pixels.
    pub hopcount: u32,
    /// Kaiser window sharpness. Values above 16 are treated as 16.
    pub alpha: f32,
    /// Gain applied to normal X/Y before renormalization. Values below 1 are treated as 1.
    pub amplify_normal: f32,
    /// Strength of the detail preservation in the sustain normal filters.
    pub normal_sustain_factor: f32,
    pub edge: EdgeMode,
}

impl Default for ResizeOptions {
    fn default() -> Self {
        Self {
            filter: FilterKind::Linear,
            hopcount: 2,
            alpha: 2.0,
            amplify_normal: 1.0,
            normal_sustain_factor: 0.0,
            edge: EdgeMode::Clip,
        }
    }
}

impl ResizeOptions {
    pub fn new(
        filter: FilterKind,
        hopcount: u32,
        alpha: f32,
        amplify_normal: f32,
        normal_sustain_factor: f32,
    ) -> Result<Self> {
        let options = Self {
            filter,
            hopcount,
            alpha,
            amplify_normal,
            normal_sustain_factor,
            edge: EdgeMode::default(),
        };
        options.validate()?;
        Ok(options)
    }

    #[must_use]
    pub fn with_edge(mut self, edge: EdgeMode) -> Self {
        self.edge = edge;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.hopcount == 0 || self.hopcount > 64 {
            bail!(
                "Invalid value for 'hopcount', must be 1-64, got {}.",
                self.hopcount
            );
        }
        if !self.alpha.is_finite() || self.alpha < 0.0 {
            bail!(
                "Invalid value for 'alpha', must be a non-negative number, got {}.",
                self.alpha
            );
        }
        if !self.amplify_normal.is_finite() {
            bail!(
                "Invalid value for 'amplify_normal', must be finite, got {}.",
                self.amplify_normal
            );
        }
        if !self.normal_sustain_factor.is_finite() || self.normal_sustain_factor < 0.0 {
            bail!(
                "Invalid value for 'normal_sustain_factor', must be a non-negative number, got {}.",
                self.normal_sustain_factor
            );
        }
        Ok(())
    }

    /// Kaiser sharpness after capping.
    #[must_use]
    pub fn kaiser_alpha(&self) -> f32 {
        self.alpha.min(MAX_KAISER_ALPHA)
    }

    /// Normal X/Y gain after flooring at unity.
    #[must_use]
    pub fn normal_gain(&self) -> f32 {
        self.amplify_normal.max(1.0)
    }
}

bitflags! {
    /// Optional passes of the mipmap cascade builder.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct CascadeFlags: u32 {
        /// Spread opaque colors into transparent neighbors of the base level.
        const COLOR_BORDER_BASE = 0x0000_0001;
        /// Spread opaque colors into transparent neighbors of every generated level.
        const COLOR_BORDER_MIPMAPS = 0x0000_0002;
    }
}
