// src/engine_lib/controller.rs

use winit::{
    event::{ElementState, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

/// Keys held during the current tick.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MovementInput {
    pub forward: bool,
    pub back: bool,
    pub strafe_left: bool,
    pub strafe_right: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    pub jump: bool,
}

/// True for the initial press of `code`, ignoring key repeat.
pub fn is_fresh_press(event: &WindowEvent, code: KeyCode) -> bool {
    match event {
        WindowEvent::KeyboardInput { event: key_event, .. } => {
            key_event.physical_key == PhysicalKey::Code(code)
                && key_event.state == ElementState::Pressed
                && !key_event.repeat
        }
        _ => false,
    }
}

#[derive(Debug, Default)]
pub struct KeyboardController {
    input: MovementInput,
    exit_requested: bool,
}

impl KeyboardController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> MovementInput {
        self.input
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// Updates held keys from a physical key transition. Returns whether the key is bound.
    pub fn handle_key(&mut self, key: PhysicalKey, state: ElementState) -> bool {
        let pressed = state == ElementState::Pressed;
        if key == PhysicalKey::Code(KeyCode::Escape) {
            self.exit_requested |= pressed;
            return true;
        }
        let slot = match key {
            PhysicalKey::Code(KeyCode::KeyW) => &mut self.input.forward,
            PhysicalKey::Code(KeyCode::KeyS) => &mut self.input.back,
            PhysicalKey::Code(KeyCode::KeyA) => &mut self.input.strafe_left,
            PhysicalKey::Code(KeyCode::KeyD) => &mut self.input.strafe_right,
            PhysicalKey::Code(KeyCode::ArrowLeft) => &mut self.input.turn_left,
            PhysicalKey::Code(KeyCode::ArrowRight) => &mut self.input.turn_right,
            PhysicalKey::Code(KeyCode::Space) => &mut self.input.jump,
            _ => return false,
        };
        *slot = pressed;
        true
    }

    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput { event: key_event, .. } => {
                self.handle_key(key_event.physical_key, key_event.state)
            }
            WindowEvent::Focused(false) => {
                self.input = MovementInput::default();
                false
            }
            _ => false,
        }
    }
}
