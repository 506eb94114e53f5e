use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalPosition, PhysicalSize},
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::{
    config::ViewerConfig,
    gfx::{
        camera::ViewerKey,
        rendering::{FrameRenderer, RenderEngine},
        scene::{Scene, SceneMeshes},
    },
    state::ViewerState,
    ui::{editing_panel, PanelBindings, UiManager},
};

/// The viewer application: owns the event loop and everything it drives.
pub struct LightbenchApp {
    event_loop: EventLoop<()>,
    app_state: AppState,
}

struct AppState {
    config: ViewerConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    renderer: FrameRenderer,
    bindings: PanelBindings,
    cursor: PhysicalPosition<f64>,
    error: Option<anyhow::Error>,
}

impl LightbenchApp {
    /// Loads the scene meshes and prepares the initial state. No window is
    /// opened until [`LightbenchApp::run`].
    pub fn new(config: ViewerConfig) -> anyhow::Result<Self> {
        let event_loop = EventLoop::new()?;

        let meshes = SceneMeshes::load(&config.models());
        let scene = Scene::standard(meshes);

        let mut state = ViewerState::default();
        state.options = config.options();
        let bindings = PanelBindings::for_state(state.lights.len());

        Ok(Self {
            event_loop,
            app_state: AppState {
                config,
                window: None,
                render_engine: None,
                ui_manager: None,
                renderer: FrameRenderer::new(state, scene),
                bindings,
                cursor: PhysicalPosition::new(0.0, 0.0),
                error: None,
            },
        })
    }

    /// Runs until the window closes. Errors raised inside the loop are
    /// returned once it stops.
    pub fn run(self) -> anyhow::Result<()> {
        let Self {
            event_loop,
            mut app_state,
        } = self;

        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut app_state)?;

        match app_state.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.error = Some(err);
        event_loop.exit();
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.renderer.resize(width, height);
        if let Some(engine) = self.render_engine.as_mut() {
            engine.resize(width, height);
        }
        if let Some(ui) = self.ui_manager.as_mut() {
            ui.update_display_size(width, height);
        }
    }

    fn redraw(&mut self) -> anyhow::Result<()> {
        let (Some(window), Some(engine), Some(ui)) = (
            self.window.as_ref(),
            self.render_engine.as_mut(),
            self.ui_manager.as_mut(),
        ) else {
            return Ok(());
        };

        self.renderer.tick(engine)?;

        let bindings = &self.bindings;
        let state = &mut self.renderer.state;
        ui.update_logic(window, |frame| editing_panel(frame, bindings, state));

        engine.present(|device, queue, encoder, view| {
            ui.render_display_only(device, queue, encoder, view)
        })?;
        Ok(())
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = WindowAttributes::default()
            .with_title("lightbench")
            .with_inner_size(LogicalSize::new(self.config.size.width, self.config.size.height));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => return self.fail(event_loop, err.into()),
        };

        let (width, height) = window.inner_size().into();
        let vsync = self.config.vsync;
        let mut engine = match pollster::block_on(RenderEngine::new(window.clone(), width, height, vsync)) {
            Ok(engine) => engine,
            Err(err) => return self.fail(event_loop, err),
        };

        self.renderer.init(&mut engine);
        self.renderer.resize(width, height);

        let mut ui = UiManager::new(engine.device(), engine.queue(), engine.surface_format(), &window);
        ui.update_display_size(width, height);

        log::info!("window ready at {width}x{height}");
        self.ui_manager = Some(ui);
        self.render_engine = Some(engine);
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(window) = self.window.clone() else {
            return;
        };

        // Events the panel captures never reach navigation.
        if let Some(ui) = self.ui_manager.as_mut() {
            if ui.handle_input(&window, window_id, &event) {
                return;
            }
        }

        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::KeyboardInput { event, .. } => {
                if let Some((key, pressed)) = ViewerKey::from_event(&event) {
                    self.renderer.handle_key(key, pressed);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = position;
                self.renderer.pointer_moved(position.x as f32, position.y as f32);
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => {
                    self.renderer.pointer_down(self.cursor.x as f32, self.cursor.y as f32)
                }
                ElementState::Released => self.renderer.pointer_up(),
            },
            WindowEvent::CursorLeft { .. } => self.renderer.pointer_left(),
            WindowEvent::Focused(false) => self.renderer.navigation.release_all(),
            WindowEvent::Resized(PhysicalSize { width, height }) => self.resize(width, height),
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::RedrawRequested => {
                if let Err(err) = self.redraw() {
                    self.fail(event_loop, err);
                }
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }
}
