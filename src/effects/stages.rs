use glam::Vec2;

use super::{EffectStage, StageKind, UniformValue, Uniforms};

macro_rules! default_from_new {
    ($($stage:ty),*) => {
        $(impl Default for $stage {
            fn default() -> Self {
                Self::new()
            }
        })*
    };
}

default_from_new!(RenderStage, LuminosityStage, DotScreenStage, RgbShiftStage);

/// Draws the scene into the chain's read buffer.
pub struct RenderStage {
    enabled: bool,
}

impl RenderStage {
    pub fn new() -> Self {
        Self { enabled: true }
    }
}

impl EffectStage for RenderStage {
    fn kind(&self) -> StageKind {
        StageKind::Render
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn needs_swap(&self) -> bool {
        false
    }
}

/// Grayscale pre-pass feeding the Sobel stage.
pub struct LuminosityStage {
    enabled: bool,
}

impl LuminosityStage {
    pub fn new() -> Self {
        Self { enabled: true }
    }
}

impl EffectStage for LuminosityStage {
    fn kind(&self) -> StageKind {
        StageKind::Luminosity
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

/// Sobel edge detection over the red channel of its input.
pub struct SobelStage {
    enabled: bool,
    resolution: Vec2,
}

impl SobelStage {
    pub fn new(resolution: Vec2) -> Self {
        Self {
            enabled: true,
            resolution,
        }
    }

}

impl EffectStage for SobelStage {
    fn kind(&self) -> StageKind {
        StageKind::Sobel
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn uniforms(&mut self) -> Uniforms {
        vec![("resolution", UniformValue::Vec2(self.resolution))]
    }

    fn resize(&mut self, resolution: Vec2) {
        self.resolution = resolution;
    }
}

pub struct DotScreenStage {
    enabled: bool,
    center: Vec2,
    angle: f32,
    scale: f32,
    t_size: Vec2,
}

impl DotScreenStage {
    pub fn new() -> Self {
        Self {
            enabled: true,
            center: Vec2::splat(0.5),
            angle: 1.57,
            scale: 4.0,
            t_size: Vec2::splat(256.0),
        }
    }
}

impl EffectStage for DotScreenStage {
    fn kind(&self) -> StageKind {
        StageKind::DotScreen
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn uniforms(&mut self) -> Uniforms {
        vec![
            ("center", UniformValue::Vec2(self.center)),
            ("angle", UniformValue::Float(self.angle)),
            ("scale", UniformValue::Float(self.scale)),
            ("tSize", UniformValue::Vec2(self.t_size)),
        ]
    }
}

/// Splits the red and blue channels apart along `angle`.
pub struct RgbShiftStage {
    enabled: bool,
    amount: f32,
    angle: f32,
}

impl RgbShiftStage {
    pub fn new() -> Self {
        Self {
            enabled: true,
            amount: 0.003,
            angle: 0.0,
        }
    }
}

impl EffectStage for RgbShiftStage {
    fn kind(&self) -> StageKind {
        StageKind::RgbShift
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn uniforms(&mut self) -> Uniforms {
        vec![
            ("amount", UniformValue::Float(self.amount)),
            ("angle", UniformValue::Float(self.angle)),
        ]
    }
}
