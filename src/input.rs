//! Input handling for the hero scene.
//!
//! [`Input`] folds raw window events into the state the frame loop needs:
//! the latest normalized pointer position and a handful of keys. The host
//! owns it and hands [`Input::pointer`] to the field step each frame, so the
//! simulation never reads a shared global.

use std::collections::HashSet;

use glam::Vec2;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode as WinitKeyCode, PhysicalKey};

/// Keys the scene responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// Reseed and rebuild the field.
    R,
    /// Cycle shape presets.
    S,
    /// Pause/resume the clock.
    Space,
    /// Quit.
    Escape,
    Other(u32),
}

impl From<WinitKeyCode> for KeyCode {
    fn from(key: WinitKeyCode) -> Self {
        match key {
            WinitKeyCode::KeyR => KeyCode::R,
            WinitKeyCode::KeyS => KeyCode::S,
            WinitKeyCode::Space => KeyCode::Space,
            WinitKeyCode::Escape => KeyCode::Escape,
            _ => KeyCode::Other(key as u32),
        }
    }
}

/// Latest pointer reading in normalized device coordinates.
///
/// `(-1, -1)` is the bottom-left corner of the window, `(1, 1)` the top-right.
/// Last write wins; non-finite readings are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    ndc: Vec2,
}

impl PointerState {
    pub fn new(ndc: Vec2) -> Self {
        let mut state = Self::default();
        state.set(ndc);
        state
    }

    /// Pointer from a window-space pixel position (origin top-left, y down).
    ///
    /// Returns `None` for a zero-sized window.
    pub fn from_window(position: Vec2, width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self::new(Vec2::new(
            (position.x / width as f32) * 2.0 - 1.0,
            1.0 - (position.y / height as f32) * 2.0,
        )))
    }

    /// Overwrite the reading. Returns `false` and keeps the old value if
    /// `ndc` has a NaN or infinite component.
    pub fn set(&mut self, ndc: Vec2) -> bool {
        if !ndc.is_finite() {
            return false;
        }
        self.ndc = ndc;
        true
    }

    #[inline]
    pub fn ndc(&self) -> Vec2 {
        self.ndc
    }
}

/// Input state tracking for keyboard and pointer.
#[derive(Debug, Default)]
pub struct Input {
    keys_held: HashSet<KeyCode>,
    keys_pressed: HashSet<KeyCode>,

    pointer: PointerState,
    cursor_position: Vec2,

    // Window size for NDC calculation
    window_size: (u32, u32),
}

impl Input {
    /// Create a new input tracker.
    pub fn new() -> Self {
        Self {
            window_size: (1280, 720),
            ..Default::default()
        }
    }

    /// Check if a key was pressed this frame (just went down).
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Check if a key is currently held down.
    pub fn key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Latest pointer reading.
    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    /// Cursor position in window pixels.
    pub fn cursor_position(&self) -> Vec2 {
        self.cursor_position
    }

    /// Clear per-frame state. Call after the frame has consumed it.
    pub fn end_frame(&mut self) {
        self.keys_pressed.clear();
    }

    /// Update window size for NDC calculations.
    ///
    /// The pointer is re-derived from the last cursor position so a resize
    /// does not leave it pointing at a stale spot.
    pub fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_size = (width, height);
        if let Some(pointer) = PointerState::from_window(self.cursor_position, width, height) {
            self.pointer = pointer;
        }
    }

    /// Process a winit window event.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(keycode) = event.physical_key {
                    let key = KeyCode::from(keycode);
                    match event.state {
                        ElementState::Pressed => {
                            // Only fire pressed event if not already held (no repeat)
                            if !self.keys_held.contains(&key) {
                                self.keys_pressed.insert(key);
                            }
                            self.keys_held.insert(key);
                        }
                        ElementState::Released => {
                            self.keys_held.remove(&key);
                        }
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.move_cursor(Vec2::new(position.x as f32, position.y as f32));
            }

            WindowEvent::Resized(size) => {
                self.set_window_size(size.width, size.height);
            }

            _ => {}
        }
    }

    fn move_cursor(&mut self, position: Vec2) {
        self.cursor_position = position;
        let (w, h) = self.window_size;
        if let Some(pointer) = PointerState::from_window(position, w, h) {
            self.pointer = pointer;
        }
    }
}
