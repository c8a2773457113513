//! Scripted input for headless runs.

use orrery_platform::{InputState, KeyCode, MouseButton};

/// A single input event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScriptEvent {
    Press(KeyCode),
    Release(KeyCode),
    Click(MouseButton),
    MoveCursor(f64, f64),
}

/// Input events keyed by the frame they fire on.
#[derive(Clone, Debug, Default)]
pub struct InputScript {
    events: Vec<(u64, ScriptEvent)>,
}

impl InputScript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(mut self, frame: u64, event: ScriptEvent) -> Self {
        self.events.push((frame, event));
        self
    }

    /// Sweep the cursor by `(dx, dy)` every frame in `frames`.
    pub fn sweep(mut self, frames: std::ops::Range<u64>, from: (f64, f64), step: (f64, f64)) -> Self {
        let (mut x, mut y) = from;
        for frame in frames {
            self.events.push((frame, ScriptEvent::MoveCursor(x, y)));
            x += step.0;
            y += step.1;
        }
        self
    }

    /// Capture the cursor, throttle up, bank right, level out, ease off.
    pub fn flight() -> Self {
        Self::new()
            .at(0, ScriptEvent::Click(MouseButton::Left))
            .at(1, ScriptEvent::Press(KeyCode::KeyW))
            .sweep(30..90, (640.0, 360.0), (4.0, 0.0))
            .sweep(90..120, (880.0, 360.0), (0.0, -2.0))
            .at(150, ScriptEvent::Release(KeyCode::KeyW))
            .at(200, ScriptEvent::Press(KeyCode::Escape))
    }

    /// Feed this frame's events into `input`. Returns how many fired.
    pub fn apply(&self, frame: u64, input: &mut InputState) -> usize {
        let mut fired = 0;
        for (_, event) in self.events.iter().filter(|(at, _)| *at == frame) {
            match *event {
                ScriptEvent::Press(key) => input.on_key_pressed(key),
                ScriptEvent::Release(key) => input.on_key_released(key),
                ScriptEvent::Click(button) => {
                    input.on_mouse_pressed(button);
                    input.on_mouse_released(button);
                }
                ScriptEvent::MoveCursor(x, y) => input.on_mouse_moved(x, y),
            }
            fired += 1;
        }
        fired
    }
}
