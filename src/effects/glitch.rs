use std::f32::consts::PI;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::{DataTexture, EffectStage, StageKind, UniformValue, Uniforms};

/// Edge length of the random displacement map.
pub const DISPLACEMENT_SIZE: u32 = 64;

const COLUMN_SIZE: f32 = 0.05;

/// What the glitch stage drew on a given frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlitchPhase {
    /// Full-strength tear, rolled on the trigger frame.
    Burst,
    /// Mild jitter during the first fifth of the interval.
    Jitter,
    /// Input passed through untouched.
    Bypass,
}

#[derive(Debug, Clone, Copy, Default)]
struct GlitchParams {
    amount: f32,
    angle: f32,
    seed_x: f32,
    seed_y: f32,
    distortion_x: f32,
    distortion_y: f32,
}

/// Digital glitch: bursts of torn, colour-split frames at random intervals.
pub struct GlitchStage {
    enabled: bool,
    rng: SmallRng,
    frame: u32,
    interval: u32,
    params: GlitchParams,
    displacement: DataTexture,
    last_phase: Option<GlitchPhase>,
}

impl GlitchStage {
    pub fn new(seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let len = (DISPLACEMENT_SIZE * DISPLACEMENT_SIZE) as usize;
        let data = (0..len).map(|_| rng.random::<u8>()).collect();
        let interval = rng.random_range(120..=240);
        Self {
            enabled: true,
            rng,
            frame: 0,
            interval,
            params: GlitchParams::default(),
            displacement: DataTexture {
                size: DISPLACEMENT_SIZE,
                data,
            },
            last_phase: None,
        }
    }

    /// Frames between bursts, redrawn from 120..=240 after each burst.
    pub fn interval(&self) -> u32 {
        self.interval
    }

    pub fn last_phase(&self) -> Option<GlitchPhase> {
        self.last_phase
    }

    fn advance(&mut self) -> GlitchPhase {
        let pos = self.frame % self.interval;
        let phase = if pos == 0 {
            self.params = GlitchParams {
                amount: self.rng.random::<f32>() / 30.0,
                angle: self.rng.random_range(-PI..PI),
                seed_x: self.rng.random_range(-1.0..1.0),
                seed_y: self.rng.random_range(-1.0..1.0),
                distortion_x: self.rng.random::<f32>(),
                distortion_y: self.rng.random::<f32>(),
            };
            self.frame = 0;
            self.interval = self.rng.random_range(120..=240);
            GlitchPhase::Burst
        } else if (pos as f32) < self.interval as f32 / 5.0 {
            self.params = GlitchParams {
                amount: self.rng.random::<f32>() / 90.0,
                angle: self.rng.random_range(-PI..PI),
                distortion_x: self.rng.random::<f32>(),
                distortion_y: self.rng.random::<f32>(),
                seed_x: self.rng.random_range(-0.3..0.3),
                seed_y: self.rng.random_range(-0.3..0.3),
            };
            GlitchPhase::Jitter
        } else {
            GlitchPhase::Bypass
        };
        self.frame += 1;
        self.last_phase = Some(phase);
        phase
    }
}

impl EffectStage for GlitchStage {
    fn kind(&self) -> StageKind {
        StageKind::Glitch
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn uniforms(&mut self) -> Uniforms {
        let seed = self.rng.random::<f32>();
        let phase = self.advance();
        let p = self.params;
        vec![
            ("byp", UniformValue::Int((phase == GlitchPhase::Bypass) as i32)),
            ("seed", UniformValue::Float(seed)),
            ("amount", UniformValue::Float(p.amount)),
            ("angle", UniformValue::Float(p.angle)),
            ("seed_x", UniformValue::Float(p.seed_x)),
            ("seed_y", UniformValue::Float(p.seed_y)),
            ("distortion_x", UniformValue::Float(p.distortion_x)),
            ("distortion_y", UniformValue::Float(p.distortion_y)),
            ("col_s", UniformValue::Float(COLUMN_SIZE)),
        ]
    }

    fn data_texture(&self) -> Option<&DataTexture> {
        Some(&self.displacement)
    }
}
