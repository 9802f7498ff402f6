use cubefx_wasm::effects::{StageKind, Target, Toggle, ToggleState};
use cubefx_wasm::{App, Config, Viewport};

fn app(toggles: ToggleState) -> App {
    let config = Config {
        toggles,
        ..Config::default()
    };
    App::new(&config, Viewport::new(800, 600).unwrap(), 1.0, 2024)
}

fn kinds(app: &mut App) -> Vec<StageKind> {
    app.compose().iter().map(|p| p.kind).collect()
}

#[test]
fn glitch_round_trip_restores_plan() {
    let mut app = app(ToggleState::default());
    let baseline = app.compose();
    assert_eq!(
        baseline.iter().map(|p| p.kind).collect::<Vec<_>>(),
        [StageKind::Render, StageKind::Luminosity]
    );

    app.set_toggle(Toggle::Glitch, true);
    let glitched = app.compose();
    assert_eq!(
        glitched.iter().map(|p| p.kind).collect::<Vec<_>>(),
        [StageKind::Render, StageKind::Luminosity, StageKind::Glitch]
    );
    assert_eq!(glitched.last().unwrap().target, Target::Screen);

    app.set_toggle(Toggle::Glitch, false);
    assert_eq!(app.compose(), baseline);
}

#[test]
fn grayscale_pass_survives_every_toggle_combination() {
    for bits in 0..16u8 {
        let toggles = ToggleState {
            glitch: bits & 1 != 0,
            edge_detect: bits & 2 != 0,
            dot_screen: bits & 4 != 0,
            rgb_shift: bits & 8 != 0,
        };
        let mut app = app(toggles);
        let plan = kinds(&mut app);
        assert_eq!(&plan[..2], [StageKind::Render, StageKind::Luminosity], "{toggles:?}");
        assert_eq!(plan.len(), 2 + bits.count_ones() as usize);
    }
}

#[test]
fn stages_track_latest_toggle_values() {
    let mut app = app(ToggleState::default());
    let sequence = [
        (Toggle::EdgeDetect, true),
        (Toggle::RgbShift, true),
        (Toggle::EdgeDetect, false),
        (Toggle::DotScreen, true),
        (Toggle::Glitch, true),
        (Toggle::DotScreen, false),
    ];
    for (toggle, value) in sequence {
        app.set_toggle(toggle, value);
        for t in Toggle::ALL {
            assert_eq!(app.chain.is_enabled(t), app.panel.state().get(t));
        }
    }
    assert_eq!(
        kinds(&mut app),
        [StageKind::Render, StageKind::Luminosity, StageKind::Glitch, StageKind::RgbShift]
    );
}

#[test]
fn frames_rotate_mesh_and_leave_idle_camera() {
    let mut app = app(ToggleState::default());
    let camera_before = app.scene.camera.position();

    let n = 100;
    for _ in 0..n {
        app.rotate_mesh();
        app.update_controls();
        app.compose();
    }

    let rotation = app.scene.mesh.rotation;
    assert!((rotation.x - 0.01 * n as f32).abs() < 1e-4);
    assert!((rotation.y - 0.01 * n as f32).abs() < 1e-4);
    assert!(app.scene.camera.position().abs_diff_eq(camera_before, 1e-2));
}

#[test]
fn query_string_drives_initial_state() {
    let config = Config::from_query("?effects=dotscreen,rgbshift&seed=3").unwrap();
    let mut app = App::new(&config, Viewport::new(640, 480).unwrap(), 1.0, config.seed.unwrap());
    assert_eq!(
        kinds(&mut app),
        [
            StageKind::Render,
            StageKind::Luminosity,
            StageKind::DotScreen,
            StageKind::RgbShift
        ]
    );
}
