//! Post-processing chain layered over the base scene render.
//!
//! Stages run in a fixed order. Each frame [`EffectChain::plan`] turns the
//! enabled stages into a list of [`PassInvocation`]s that a GPU backend
//! executes verbatim: the render stage draws into the read buffer, every
//! shader stage reads the read buffer and writes the write buffer before the
//! two swap, and the last enabled stage goes straight to the screen.

mod glitch;
mod stages;

use glam::Vec2;

pub use glitch::{GlitchPhase, GlitchStage, DISPLACEMENT_SIZE};
pub use stages::{DotScreenStage, LuminosityStage, RenderStage, RgbShiftStage, SobelStage};

/// Identifies a stage's shader program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    Render,
    Luminosity,
    Sobel,
    Glitch,
    DotScreen,
    RgbShift,
}

/// Uniform value handed to a stage's shader. Samplers are bound by the backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec2(Vec2),
}

pub type Uniforms = Vec<(&'static str, UniformValue)>;

/// Square single-channel texture a stage samples alongside its input.
#[derive(Debug, Clone, PartialEq)]
pub struct DataTexture {
    pub size: u32,
    pub data: Vec<u8>,
}

/// One toggleable unit of the chain.
pub trait EffectStage {
    fn kind(&self) -> StageKind;

    fn is_enabled(&self) -> bool;

    fn set_enabled(&mut self, enabled: bool);

    /// Whether the ping-pong buffers swap after this stage runs.
    fn needs_swap(&self) -> bool {
        true
    }

    /// Uniforms for the frame about to be drawn. Only called on enabled
    /// stages, so stateful stages advance only while visible.
    fn uniforms(&mut self) -> Uniforms {
        Vec::new()
    }

    /// New drawing-buffer resolution for resolution-dependent stages.
    fn resize(&mut self, _resolution: Vec2) {}

    fn data_texture(&self) -> Option<&DataTexture> {
        None
    }
}

/// The optional stages exposed to the control panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Toggle {
    Glitch,
    EdgeDetect,
    DotScreen,
    RgbShift,
}

impl Toggle {
    pub const ALL: [Toggle; 4] = [
        Toggle::Glitch,
        Toggle::EdgeDetect,
        Toggle::DotScreen,
        Toggle::RgbShift,
    ];

    /// Stable key used in the query string and DOM ids.
    pub fn key(self) -> &'static str {
        match self {
            Toggle::Glitch => "glitch",
            Toggle::EdgeDetect => "sobel",
            Toggle::DotScreen => "dotscreen",
            Toggle::RgbShift => "rgbshift",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "glitch" => Some(Toggle::Glitch),
            "sobel" | "edge" => Some(Toggle::EdgeDetect),
            "dotscreen" => Some(Toggle::DotScreen),
            "rgbshift" => Some(Toggle::RgbShift),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Toggle::Glitch => "Glitch noise",
            Toggle::EdgeDetect => "Edge detection",
            Toggle::DotScreen => "Dot screen",
            Toggle::RgbShift => "RGB shift",
        }
    }

    pub fn stage_kind(self) -> StageKind {
        match self {
            Toggle::Glitch => StageKind::Glitch,
            Toggle::EdgeDetect => StageKind::Sobel,
            Toggle::DotScreen => StageKind::DotScreen,
            Toggle::RgbShift => StageKind::RgbShift,
        }
    }
}

/// Desired on/off state of every optional stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToggleState {
    pub glitch: bool,
    pub edge_detect: bool,
    pub dot_screen: bool,
    pub rgb_shift: bool,
}

impl ToggleState {
    pub fn get(&self, toggle: Toggle) -> bool {
        match toggle {
            Toggle::Glitch => self.glitch,
            Toggle::EdgeDetect => self.edge_detect,
            Toggle::DotScreen => self.dot_screen,
            Toggle::RgbShift => self.rgb_shift,
        }
    }

    pub fn set(&mut self, toggle: Toggle, value: bool) {
        match toggle {
            Toggle::Glitch => self.glitch = value,
            Toggle::EdgeDetect => self.edge_detect = value,
            Toggle::DotScreen => self.dot_screen = value,
            Toggle::RgbShift => self.rgb_shift = value,
        }
    }
}

/// One of the two ping-pong render targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Buffer {
    A,
    B,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Buffer(Buffer),
    Screen,
}

/// A single draw the backend must perform this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PassInvocation {
    pub kind: StageKind,
    pub uniforms: Uniforms,
    /// Texture sampled as `tDiffuse`; `None` for the scene render.
    pub source: Option<Buffer>,
    pub target: Target,
}

pub struct EffectChain {
    stages: Vec<Box<dyn EffectStage>>,
    /// Stage index per `Toggle`, in `Toggle::ALL` order.
    slots: [usize; 4],
}

impl EffectChain {
    /// Render, luminosity, Sobel, glitch, dot-screen, RGB shift.
    pub fn new(resolution: Vec2, toggles: &ToggleState, seed: u64) -> Self {
        let mut stages: Vec<Box<dyn EffectStage>> = vec![
            Box::new(RenderStage::new()),
            Box::new(LuminosityStage::new()),
            Box::new(SobelStage::new(resolution)),
            Box::new(GlitchStage::new(seed)),
            Box::new(DotScreenStage::new()),
            Box::new(RgbShiftStage::new()),
        ];

        let mut slots = [0; 4];
        for (i, toggle) in Toggle::ALL.into_iter().enumerate() {
            let idx = stages
                .iter()
                .position(|s| s.kind() == toggle.stage_kind())
                .unwrap_or_else(|| unreachable!("no stage for {toggle:?}"));
            stages[idx].set_enabled(toggles.get(toggle));
            slots[i] = idx;
        }

        Self { stages, slots }
    }

    fn slot(&self, toggle: Toggle) -> usize {
        self.slots[toggle as usize]
    }

    pub fn set_enabled(&mut self, toggle: Toggle, enabled: bool) {
        let idx = self.slot(toggle);
        self.stages[idx].set_enabled(enabled);
        tracing::debug!(stage = ?toggle, enabled, "effect toggled");
    }

    pub fn is_enabled(&self, toggle: Toggle) -> bool {
        self.stages[self.slot(toggle)].is_enabled()
    }

    pub fn stages(&self) -> impl Iterator<Item = &dyn EffectStage> {
        self.stages.iter().map(|s| s.as_ref())
    }

    /// Forward a new resolution to the Sobel stage.
    pub fn set_edge_resolution(&mut self, resolution: Vec2) {
        let idx = self.slot(Toggle::EdgeDetect);
        self.stages[idx].resize(resolution);
    }

    /// Build this frame's pass list from the enabled stages.
    pub fn plan(&mut self) -> Vec<PassInvocation> {
        let last = self.stages.iter().rposition(|s| s.is_enabled());
        let mut read = Buffer::A;
        let mut write = Buffer::B;
        let mut passes = Vec::new();

        for (i, stage) in self.stages.iter_mut().enumerate() {
            if !stage.is_enabled() {
                continue;
            }
            let to_screen = Some(i) == last;
            let kind = stage.kind();
            let uniforms = stage.uniforms();

            if kind == StageKind::Render {
                passes.push(PassInvocation {
                    kind,
                    uniforms,
                    source: None,
                    target: if to_screen { Target::Screen } else { Target::Buffer(read) },
                });
            } else {
                passes.push(PassInvocation {
                    kind,
                    uniforms,
                    source: Some(read),
                    target: if to_screen { Target::Screen } else { Target::Buffer(write) },
                });
            }

            if stage.needs_swap() {
                std::mem::swap(&mut read, &mut write);
            }
        }
        passes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(toggles: ToggleState) -> EffectChain {
        EffectChain::new(Vec2::new(800.0, 600.0), &toggles, 7)
    }

    fn kinds(plan: &[PassInvocation]) -> Vec<StageKind> {
        plan.iter().map(|p| p.kind).collect()
    }

    #[test]
    fn stage_order_is_fixed() {
        let c = chain(ToggleState::default());
        let order: Vec<_> = c.stages().map(|s| s.kind()).collect();
        assert_eq!(
            order,
            [
                StageKind::Render,
                StageKind::Luminosity,
                StageKind::Sobel,
                StageKind::Glitch,
                StageKind::DotScreen,
                StageKind::RgbShift,
            ]
        );
    }

    #[test]
    fn initial_flags_follow_toggle_state() {
        let c = chain(ToggleState {
            glitch: false,
            edge_detect: true,
            dot_screen: false,
            rgb_shift: true,
        });
        assert!(c.is_enabled(Toggle::EdgeDetect));
        assert!(c.is_enabled(Toggle::RgbShift));
        assert!(!c.is_enabled(Toggle::Glitch));
        assert!(!c.is_enabled(Toggle::DotScreen));
    }

    #[test]
    fn all_off_renders_scene_then_grayscale() {
        let mut c = chain(ToggleState::default());
        let plan = c.plan();
        assert_eq!(kinds(&plan), [StageKind::Render, StageKind::Luminosity]);
        assert_eq!(plan[0].source, None);
        assert_eq!(plan[0].target, Target::Buffer(Buffer::A));
        assert_eq!(plan[1].source, Some(Buffer::A));
        assert_eq!(plan[1].target, Target::Screen);
    }

    #[test]
    fn passes_ping_pong_between_buffers() {
        let mut c = chain(ToggleState {
            glitch: false,
            edge_detect: true,
            dot_screen: true,
            rgb_shift: true,
        });
        let plan = c.plan();
        assert_eq!(
            kinds(&plan),
            [
                StageKind::Render,
                StageKind::Luminosity,
                StageKind::Sobel,
                StageKind::DotScreen,
                StageKind::RgbShift,
            ]
        );
        for pair in plan.windows(2).skip(1) {
            assert_eq!(Target::Buffer(pair[1].source.unwrap()), pair[0].target);
        }
        assert_eq!(plan.last().unwrap().target, Target::Screen);
        assert!(plan[..plan.len() - 1].iter().all(|p| p.target != Target::Screen));
    }

    #[test]
    fn toggles_do_not_interfere() {
        let mut c = chain(ToggleState::default());
        c.set_enabled(Toggle::DotScreen, true);
        c.set_enabled(Toggle::Glitch, true);
        c.set_enabled(Toggle::Glitch, false);
        assert!(c.is_enabled(Toggle::DotScreen));
        assert!(!c.is_enabled(Toggle::Glitch));
        assert!(!c.is_enabled(Toggle::EdgeDetect));
        assert!(!c.is_enabled(Toggle::RgbShift));
    }

    #[test]
    fn stage_parameters() {
        let mut c = chain(ToggleState {
            glitch: false,
            edge_detect: true,
            dot_screen: true,
            rgb_shift: true,
        });
        let plan = c.plan();
        let uniform = |kind: StageKind, name: &str| {
            plan.iter()
                .find(|p| p.kind == kind)
                .and_then(|p| p.uniforms.iter().find(|(n, _)| *n == name))
                .map(|(_, v)| *v)
        };
        assert_eq!(
            uniform(StageKind::Sobel, "resolution"),
            Some(UniformValue::Vec2(Vec2::new(800.0, 600.0)))
        );
        assert_eq!(uniform(StageKind::DotScreen, "scale"), Some(UniformValue::Float(4.0)));
        assert_eq!(uniform(StageKind::RgbShift, "amount"), Some(UniformValue::Float(0.003)));
    }

    #[test]
    fn edge_resolution_can_be_refreshed() {
        let mut c = chain(ToggleState {
            edge_detect: true,
            ..ToggleState::default()
        });
        c.set_edge_resolution(Vec2::new(2048.0, 1536.0));
        let plan = c.plan();
        let sobel = plan.iter().find(|p| p.kind == StageKind::Sobel).unwrap();
        assert_eq!(
            sobel.uniforms,
            vec![("resolution", UniformValue::Vec2(Vec2::new(2048.0, 1536.0)))]
        );
    }

    #[test]
    fn toggle_keys_round_trip() {
        for t in Toggle::ALL {
            assert_eq!(Toggle::from_key(t.key()), Some(t));
        }
        assert_eq!(Toggle::from_key("edge"), Some(Toggle::EdgeDetect));
        assert_eq!(Toggle::from_key("bloom"), None);
    }
}
