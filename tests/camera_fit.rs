use cubefx_wasm::camera::{fit_distance, PerspectiveCamera};
use cubefx_wasm::{App, Config, Viewport};
use glam::{Mat4, Vec4};

fn approx(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps * b.abs().max(1.0)
}

#[test]
fn distance_fills_vertical_extent_for_any_size() {
    let sizes = [(1, 1), (320, 480), (800, 600), (1920, 1080), (1080, 1920), (3840, 2160)];
    let tan = 22.5_f32.to_radians().tan();

    for (w, h) in sizes {
        let vp = Viewport::new(w, h).unwrap();
        let camera = PerspectiveCamera::fitted(&vp);
        let d = (h as f32 / 2.0) / tan;

        assert!(approx(camera.position().z, d, 1e-5), "{w}x{h}");
        assert!(approx(camera.far(), 2.0 * d, 1e-5), "{w}x{h}");
        assert!(approx(fit_distance(h as f32, 45.0), d, 1e-5));

        // Half the viewport height above the origin lands on the top clip edge.
        let clip = camera.view_projection_matrix() * Vec4::new(0.0, h as f32 / 2.0, 0.0, 1.0);
        assert!(approx(clip.y / clip.w, 1.0, 1e-3), "{w}x{h}");
    }
}

fn expected_projection(aspect: f32, near: f32, far: f32) -> Mat4 {
    Mat4::perspective_rh_gl(45_f32.to_radians(), aspect, near, far)
}

#[test]
fn resize_recomputes_a_stale_projection() {
    let mut app = App::new(&Config::default(), Viewport::new(800, 600).unwrap(), 1.0, 1);
    app.scene.camera.set_aspect(2.0);

    let surface = app.resize(Viewport::new(1024, 768).unwrap());

    let camera = &app.scene.camera;
    assert!(approx(camera.aspect(), 1024.0 / 768.0, 1e-6));
    let expected = expected_projection(1024.0 / 768.0, camera.near(), camera.far());
    assert!(camera.projection_matrix().abs_diff_eq(expected, 1e-6));
    assert_eq!(surface, (1024, 768));
    assert_eq!(app.viewport(), Viewport::new(1024, 768).unwrap());
}

#[test]
fn resize_to_a_wider_aspect_changes_the_projection() {
    let mut app = App::new(&Config::default(), Viewport::new(800, 600).unwrap(), 1.0, 1);
    let before = app.scene.camera.projection_matrix();

    app.resize(Viewport::new(1280, 720).unwrap());

    let camera = &app.scene.camera;
    assert!(approx(camera.aspect(), 16.0 / 9.0, 1e-6));
    assert!(!camera.projection_matrix().abs_diff_eq(before, 1e-3));
    let expected = expected_projection(16.0 / 9.0, camera.near(), camera.far());
    assert!(camera.projection_matrix().abs_diff_eq(expected, 1e-6));
}

#[test]
fn resize_keeps_camera_distance() {
    let mut app = App::new(&Config::default(), Viewport::new(800, 600).unwrap(), 2.0, 1);
    let far = app.scene.camera.far();
    let surface = app.resize(Viewport::new(1280, 720).unwrap());
    assert_eq!(app.scene.camera.far(), far);
    assert_eq!(surface, (2560, 1440));
}
