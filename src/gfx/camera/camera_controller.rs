use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, KeyEvent, MouseScrollDelta},
    keyboard::{KeyCode, PhysicalKey},
};

use super::orbit_camera::OrbitCamera;

/// Orbit controls: left drag rotates, shift + drag pans, wheel zooms.
///
/// Input is accumulated into pending deltas and applied in [`update`](Self::update)
/// once per frame. With damping the pending deltas decay geometrically, so
/// the camera glides to a stop after the pointer is released.
pub struct CameraController {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    /// Fraction of the pending motion applied per frame, `None` applies all of it
    pub damping: Option<f32>,
    enabled: bool,
    is_shift_held: bool,
    is_mouse_pressed: bool,
    pending_yaw: f32,
    pending_pitch: f32,
    pending_pan: (f32, f32),
}

impl CameraController {
    pub fn new(rotate_speed: f32, zoom_speed: f32) -> Self {
        Self {
            rotate_speed,
            zoom_speed,
            pan_speed: 0.01,
            damping: None,
            enabled: true,
            is_shift_held: false,
            is_mouse_pressed: false,
            pending_yaw: 0.0,
            pending_pitch: 0.0,
            pending_pan: (0.0, 0.0),
        }
    }

    pub fn with_damping(mut self, factor: f32) -> Self {
        self.damping = Some(factor.clamp(f32::EPSILON, 1.0));
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enables or disables orbit input. Disabling drops any drag in progress.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.is_mouse_pressed = false;
        }
    }

    pub fn process_events(&mut self, event: &DeviceEvent, camera: &mut OrbitCamera) {
        if !self.enabled {
            return;
        }

        match event {
            DeviceEvent::Button {
                button: 0, // Left Mouse Button
                state,
            } => {
                self.is_mouse_pressed = *state == ElementState::Pressed;
            }
            DeviceEvent::MouseWheel { delta, .. } => {
                let scroll_amount = -match delta {
                    MouseScrollDelta::LineDelta(_, scroll) => *scroll,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y: scroll, .. }) => {
                        *scroll as f32
                    }
                };
                camera.add_distance(scroll_amount * self.zoom_speed);
            }
            DeviceEvent::MouseMotion { delta } => {
                if self.is_mouse_pressed {
                    if self.is_shift_held {
                        // SHIFT + DRAG = PAN (move focus point)
                        self.pending_pan.0 -= delta.0 as f32 * self.pan_speed;
                        self.pending_pan.1 += delta.1 as f32 * self.pan_speed;
                    } else {
                        // NORMAL DRAG = ROTATE (orbit around focus)
                        self.pending_yaw -= delta.0 as f32 * self.rotate_speed;
                        self.pending_pitch += delta.1 as f32 * self.rotate_speed;
                    }
                }
            }
            _ => (),
        }
    }

    pub fn process_keyed_events(&mut self, event: &KeyEvent) {
        if let KeyEvent {
            physical_key: PhysicalKey::Code(KeyCode::ShiftLeft | KeyCode::ShiftRight),
            state,
            ..
        } = event
        {
            let was_shift_held = self.is_shift_held;
            self.is_shift_held = *state == ElementState::Pressed;

            if was_shift_held != self.is_shift_held {
                log::debug!("Shift state changed: {}", self.is_shift_held);
            }
        }
    }

    /// Applies pending orbit motion to the camera. Call once per frame.
    pub fn update(&mut self, camera: &mut OrbitCamera) {
        let factor = self.damping.unwrap_or(1.0);

        if self.pending_yaw != 0.0 {
            camera.add_yaw(self.pending_yaw * factor);
        }
        if self.pending_pitch != 0.0 {
            camera.add_pitch(self.pending_pitch * factor);
        }
        if self.pending_pan != (0.0, 0.0) {
            camera.pan((self.pending_pan.0 * factor, self.pending_pan.1 * factor));
        }

        let keep = 1.0 - factor;
        self.pending_yaw = settle(self.pending_yaw * keep);
        self.pending_pitch = settle(self.pending_pitch * keep);
        self.pending_pan = (
            settle(self.pending_pan.0 * keep),
            settle(self.pending_pan.1 * keep),
        );
    }
}

/// Snaps negligible residual motion to zero
fn settle(value: f32) -> f32 {
    if value.abs() < 1e-6 {
        0.0
    } else {
        value
    }
}
