use cgmath::Vector3;
use clap::Parser;
use lightbench::{
    config::ViewerConfig,
    gfx::{
        camera::{NavKey, ViewerKey},
        lighting::{LightKind, LightSpace, DEFAULT_LIGHT_COUNT},
        program::UniformValue,
        rendering::{context::RecordingContext, FrameRenderer, PrimitiveKind, ShadingMode},
        scene::{Scene, SceneMeshes},
    },
    state::ViewerState,
    ui::{BindingValue, PanelBindings},
};

fn startup(args: &[&str]) -> (FrameRenderer, PanelBindings, RecordingContext) {
    let config =
        ViewerConfig::try_parse_from(std::iter::once("lightbench").chain(args.iter().copied())).unwrap();
    let scene = Scene::standard(SceneMeshes::load(&config.models()));

    let mut state = ViewerState::default();
    state.options = config.options();
    let bindings = PanelBindings::for_state(state.lights.len());

    let mut renderer = FrameRenderer::new(state, scene);
    let mut ctx = RecordingContext::new();
    renderer.init(&mut ctx);
    (renderer, bindings, ctx)
}

#[test]
fn startup_scene_has_one_enabled_spotlight() {
    let (mut renderer, _, mut ctx) = startup(&[]);
    renderer.tick(&mut ctx).unwrap();

    assert_eq!(renderer.state.lights.len(), DEFAULT_LIGHT_COUNT);
    let light = renderer.state.lights.get(0).unwrap();
    assert!(light.enabled);
    assert_eq!(light.kind(), LightKind::Spotlight);
    assert!(renderer.state.lights.iter().skip(1).all(|l| !l.enabled));

    let uniforms = &ctx.draws[0].uniforms;
    assert_eq!(uniforms.read("u_n_lights"), Some(UniformValue::Int(3)));
    assert_eq!(uniforms.read("u_lights[0].enabled"), Some(UniformValue::Int(1)));
    assert_eq!(uniforms.read("u_lights[2].enabled"), Some(UniformValue::Int(0)));
}

#[test]
fn command_line_options_drive_the_first_frame() {
    let (mut renderer, _, mut ctx) = startup(&["--shading", "gouraud", "--wireframe", "--light-space", "camera"]);
    renderer.tick(&mut ctx).unwrap();

    assert_eq!(renderer.state.options.light_space, LightSpace::Camera);
    assert!(ctx.draws.iter().all(|d| d.mode == ShadingMode::Gouraud));
    assert!(ctx.draws.iter().all(|d| d.kind == PrimitiveKind::Lines));
}

#[test]
fn panel_edits_show_up_in_the_next_frame() {
    let (mut renderer, bindings, mut ctx) = startup(&[]);

    bindings
        .set("lights.1.enabled", &mut renderer.state, BindingValue::Bool(true))
        .unwrap();
    bindings
        .set("options.shading_mode", &mut renderer.state, BindingValue::Index(1))
        .unwrap();
    bindings
        .set("material.Kd.g", &mut renderer.state, BindingValue::Float(42.0))
        .unwrap();

    renderer.tick(&mut ctx).unwrap();

    assert!(ctx.draws.iter().all(|d| d.mode == ShadingMode::Gouraud));
    let first = &ctx.draws[0].uniforms;
    assert_eq!(first.read("u_lights[1].enabled"), Some(UniformValue::Int(1)));

    // Only the bunny uses the editable material.
    let bunny = ctx.draws.last().unwrap();
    assert_eq!(ctx.mesh_label(bunny.mesh), Some("bunny"));
    match bunny.uniforms.read("u_material.Kd") {
        Some(UniformValue::Vec3(kd)) => assert_eq!(kd[1], 42.0),
        other => panic!("unexpected Kd {other:?}"),
    }
}

#[test]
fn reset_restores_camera_and_material_but_not_lights() {
    let (mut renderer, bindings, mut ctx) = startup(&[]);
    let initial_pose = renderer.state.camera.pose();
    let initial_material = *renderer.state.initial_material();

    renderer.state.camera.eye += Vector3::new(1.0, 2.0, 3.0);
    bindings
        .set("material.shininess", &mut renderer.state, BindingValue::Float(7.0))
        .unwrap();
    bindings
        .set("lights.2.enabled", &mut renderer.state, BindingValue::Bool(true))
        .unwrap();

    renderer.handle_key(ViewerKey::Reset, true);
    renderer.tick(&mut ctx).unwrap();

    assert_eq!(renderer.state.camera.pose(), initial_pose);
    assert_eq!(renderer.state.material, initial_material);
    assert!(renderer.state.lights.get(2).unwrap().enabled);
}

#[test]
fn held_key_moves_the_camera_every_tick() {
    let (mut renderer, _, mut ctx) = startup(&[]);
    let start = renderer.state.camera.eye;

    renderer.handle_key(ViewerKey::Nav(NavKey::Rise), true);
    assert!(renderer.is_key_held(NavKey::Rise));
    renderer.tick(&mut ctx).unwrap();
    renderer.tick(&mut ctx).unwrap();
    renderer.handle_key(ViewerKey::Nav(NavKey::Rise), false);
    renderer.tick(&mut ctx).unwrap();

    let climbed = renderer.state.camera.eye.y - start.y;
    assert!((climbed - 0.2).abs() < 1e-5, "climbed {climbed}");
    assert_eq!(renderer.stack_depth(), 0);
}
