//! Boolean controls bound one-way to the effect chain.

use crate::effects::{EffectChain, Toggle, ToggleState};

/// A single checkbox as presented to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Control {
    pub toggle: Toggle,
    pub label: &'static str,
    pub value: bool,
}

/// Owns the bound [`ToggleState`] and forwards every change to the chain.
#[derive(Debug, Clone, Default)]
pub struct ControlPanel {
    state: ToggleState,
}

impl ControlPanel {
    pub fn new(state: ToggleState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &ToggleState {
        &self.state
    }

    pub fn controls(&self) -> [Control; 4] {
        Toggle::ALL.map(|toggle| Control {
            toggle,
            label: toggle.label(),
            value: self.state.get(toggle),
        })
    }

    /// Record `value` and enable or disable the matching stage.
    pub fn change(&mut self, toggle: Toggle, value: bool, chain: &mut EffectChain) {
        self.state.set(toggle, value);
        chain.set_enabled(toggle, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn stages_mirror_latest_value() {
        let mut panel = ControlPanel::default();
        let mut chain = EffectChain::new(Vec2::new(640.0, 480.0), panel.state(), 11);

        let changes = [
            (Toggle::Glitch, true),
            (Toggle::RgbShift, true),
            (Toggle::Glitch, false),
            (Toggle::EdgeDetect, true),
            (Toggle::EdgeDetect, true),
            (Toggle::DotScreen, true),
            (Toggle::RgbShift, false),
        ];
        for (toggle, value) in changes {
            panel.change(toggle, value, &mut chain);
            for t in Toggle::ALL {
                assert_eq!(chain.is_enabled(t), panel.state().get(t), "{t:?} after {toggle:?}");
            }
        }
        assert_eq!(
            *panel.state(),
            ToggleState {
                glitch: false,
                edge_detect: true,
                dot_screen: true,
                rgb_shift: false,
            }
        );
    }

    #[test]
    fn controls_are_labeled() {
        let panel = ControlPanel::new(ToggleState {
            dot_screen: true,
            ..ToggleState::default()
        });
        let controls = panel.controls();
        assert_eq!(controls.len(), 4);
        assert_eq!(controls[2].toggle, Toggle::DotScreen);
        assert!(controls[2].value);
        assert!(controls.iter().all(|c| !c.label.is_empty()));
    }
}
