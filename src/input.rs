use glam::Vec2;
use winit::event::{ElementState, MouseButton, WindowEvent};

/// Tracks the mouse state the orbit controls need.
///
/// Deltas accumulate across events within a frame and are cleared by
/// [`begin_frame`](Input::begin_frame).
#[derive(Default)]
pub struct Input {
    left_down: bool,
    mouse_position: Vec2,
    mouse_delta: Vec2,
    scroll_delta: f32,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call at the start of each frame to reset per-frame deltas.
    pub fn begin_frame(&mut self) {
        self.mouse_delta = Vec2::ZERO;
        self.scroll_delta = 0.0;
    }

    /// Process a window event and update input state.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.left_down = *state == ElementState::Pressed;
            }
            WindowEvent::CursorMoved { position, .. } => {
                let new_pos = Vec2::new(position.x as f32, position.y as f32);
                self.mouse_delta += new_pos - self.mouse_position;
                self.mouse_position = new_pos;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.scroll_delta += match delta {
                    winit::event::MouseScrollDelta::LineDelta(_, y) => *y,
                    winit::event::MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 120.0,
                };
            }
            _ => {}
        }
    }

    /// True while the left mouse button is held.
    pub fn dragging(&self) -> bool {
        self.left_down
    }

    /// Mouse movement accumulated this frame.
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    /// Scroll wheel movement accumulated this frame (in lines).
    pub fn scroll_delta(&self) -> f32 {
        self.scroll_delta
    }
}
