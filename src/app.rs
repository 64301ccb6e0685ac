use std::{path::Path, process::Command, sync::Arc, time::Instant};

use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{DeviceEvent, DeviceId, ElementState, MouseButton, Touch, TouchPhase, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorIcon, Window, WindowAttributes, WindowId},
};

use crate::{
    config::ViewerConfig,
    error::ViewerError,
    gfx::{camera::CameraUniform, scene::SceneGraph},
    interaction::effects::{CursorStyle, ViewerEffects},
    viewer::Viewer,
    world::{PanelId, World},
};

const INITIAL_SIZE: (u32, u32) = (1200, 800);

/// Draws the world each frame. The viewer itself is renderer agnostic.
pub trait SceneRenderer {
    fn resize(&mut self, _width: u32, _height: u32) {}

    fn render(&mut self, world: &World, camera: CameraUniform);
}

pub struct RoomViewerApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    window: Option<Arc<Window>>,
    viewer: Viewer,
    renderer: Option<Box<dyn SceneRenderer>>,
    title: String,
    started: Instant,
    error: Option<ViewerError>,
}

impl RoomViewerApp {
    pub fn new(config: &ViewerConfig) -> Result<Self, ViewerError> {
        let event_loop = EventLoop::new()?;
        let (width, height) = INITIAL_SIZE;

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                window: None,
                viewer: Viewer::new(config, width, height)?,
                renderer: None,
                title: "Roomfolio".to_string(),
                started: Instant::now(),
                error: None,
            },
        })
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.app_state.title = title.into();
        self
    }

    /// Set the renderer that draws each frame
    pub fn set_renderer<R>(&mut self, renderer: R)
    where
        R: SceneRenderer + 'static,
    {
        self.app_state.renderer = Some(Box::new(renderer));
    }

    /// Loads an OBJ model and hands it to the viewer
    pub fn load_model(&mut self, path: impl AsRef<Path>) -> Result<(), ViewerError> {
        let scene = SceneGraph::load_obj(path)?;
        self.app_state.viewer.on_model_loaded(scene)?;
        Ok(())
    }

    pub fn viewer(&self) -> &Viewer {
        &self.app_state.viewer
    }

    /// Run the application (consumes self and blocks on the event loop)
    pub fn run(mut self) -> Result<(), ViewerError> {
        let Some(event_loop) = self.event_loop.take() else {
            return Ok(());
        };
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self.app_state)?;

        match self.app_state.error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// Carries viewer side effects out to the window and the desktop
struct WindowEffects<'a> {
    window: &'a Window,
}

impl ViewerEffects for WindowEffects<'_> {
    fn open_url(&mut self, url: &str) {
        log::info!("Opening {url}");
        if let Err(error) = open_in_browser(url) {
            log::error!("Failed to open {url}: {error}");
        }
    }

    fn set_cursor(&mut self, cursor: CursorStyle) {
        let icon = match cursor {
            CursorStyle::Default => CursorIcon::Default,
            CursorStyle::Pointer => CursorIcon::Pointer,
        };
        self.window.set_cursor(icon);
    }

    // Panel and overlay visibility lives in the world; the renderer reads it
    fn set_panel_visible(&mut self, panel: PanelId, visible: bool) {
        log::debug!("{panel} panel visible: {visible}");
    }

    fn set_overlay_visible(&mut self, visible: bool) {
        log::debug!("Overlay visible: {visible}");
    }
}

fn open_in_browser(url: &str) -> std::io::Result<()> {
    #[cfg(target_os = "macos")]
    let mut command = Command::new("open");
    #[cfg(target_os = "windows")]
    let mut command = {
        let mut command = Command::new("cmd");
        command.args(["/C", "start", ""]);
        command
    };
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let mut command = Command::new("xdg-open");

    command.arg(url).spawn().map(|_| ())
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let (width, height) = INITIAL_SIZE;
        let attributes = WindowAttributes::default()
            .with_title(self.title.clone())
            .with_inner_size(LogicalSize::new(width, height));

        match event_loop.create_window(attributes) {
            Ok(window) => {
                let PhysicalSize { width, height } = window.inner_size();
                self.viewer.on_resize(width, height);
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.resize(width, height);
                }
                self.window = Some(Arc::new(window));
            }
            Err(error) => {
                log::error!("Failed to create window: {error}");
                self.error = Some(error.into());
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };
        let mut effects = WindowEffects { window: &window };

        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.viewer.on_mouse_move(position.x as f32, position.y as f32);
            }
            WindowEvent::MouseInput {
                state: ElementState::Released,
                button: MouseButton::Left,
                ..
            } => {
                // With a panel up the whole window is its overlay
                if self.viewer.modal_state().is_open() {
                    self.viewer.on_overlay_click();
                } else {
                    self.viewer.on_click(&mut effects);
                }
            }
            WindowEvent::Touch(Touch {
                phase, location, ..
            }) => {
                let (x, y) = (location.x as f32, location.y as f32);
                match phase {
                    TouchPhase::Started => self.viewer.on_touch_start(x, y),
                    TouchPhase::Ended if self.viewer.modal_state().is_open() => {
                        self.viewer.on_overlay_touch_end();
                    }
                    TouchPhase::Ended => self.viewer.on_touch_end(x, y, &mut effects),
                    TouchPhase::Moved | TouchPhase::Cancelled => {}
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed
                    && event.physical_key == PhysicalKey::Code(KeyCode::Escape)
                {
                    self.viewer.close_panel();
                }
                self.viewer.on_keyboard_event(&event);
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.viewer.on_resize(width, height);
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.resize(width, height);
                }
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                let timestamp = self.started.elapsed().as_secs_f64();
                self.viewer.render_tick(timestamp, &mut effects);

                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.render(self.viewer.world(), self.viewer.camera_uniform());
                }
            }
            _ => (),
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if self.window.is_none() {
            return;
        }
        self.viewer.on_device_event(&event);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
