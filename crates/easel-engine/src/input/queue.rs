use std::collections::HashSet;

/// Browser `keyCode` values the engine reacts to.
pub mod keys {
    pub const SHIFT: u32 = 16;
    pub const SPACE: u32 = 32;
    pub const A: u32 = 65;
    pub const D: u32 = 68;
    pub const E: u32 = 69;
    pub const Q: u32 = 81;
    pub const S: u32 = 83;
    pub const W: u32 = 87;
}

/// Input event types the engine understands.
/// Generic — no scene-specific semantics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Primary button pressed at canvas coordinates (x, y).
    PointerDown { x: f32, y: f32 },
    /// Primary button released at canvas coordinates (x, y).
    PointerUp { x: f32, y: f32 },
    /// Cursor moved to canvas coordinates (x, y).
    PointerMove { x: f32, y: f32 },
    KeyDown { key_code: u32 },
    KeyUp { key_code: u32 },
    /// A custom event from the UI layer.
    /// `kind` identifies the event type; `a`, `b`, `c` carry arbitrary data.
    Custom { kind: u32, a: f32, b: f32, c: f32 },
}

/// A queue of input events.
/// JS writes events into the queue; Rust reads and drains them each frame.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    /// Push a new input event (called from JS via wasm-bindgen).
    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Iterate over pending events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Held keys and pointer motion, folded from queued events.
///
/// Key and button state persists across frames; pointer delta and custom
/// events only cover the current frame and are cleared by `end_frame`.
#[derive(Debug, Default)]
pub struct InputState {
    held: HashSet<u32>,
    pointer_held: bool,
    pointer: Option<(f32, f32)>,
    delta: (f32, f32),
    custom: Vec<InputEvent>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a batch of events into the state.
    pub fn apply<'a>(&mut self, events: impl IntoIterator<Item = &'a InputEvent>) {
        for event in events {
            match *event {
                InputEvent::KeyDown { key_code } => {
                    self.held.insert(key_code);
                }
                InputEvent::KeyUp { key_code } => {
                    self.held.remove(&key_code);
                }
                InputEvent::PointerDown { x, y } => {
                    self.pointer_held = true;
                    self.pointer = Some((x, y));
                }
                InputEvent::PointerUp { x, y } => {
                    self.pointer_held = false;
                    self.pointer = Some((x, y));
                }
                InputEvent::PointerMove { x, y } => {
                    if let Some((px, py)) = self.pointer {
                        self.delta.0 += x - px;
                        self.delta.1 += y - py;
                    }
                    self.pointer = Some((x, y));
                }
                InputEvent::Custom { .. } => self.custom.push(*event),
            }
        }
    }

    pub fn key_held(&self, key_code: u32) -> bool {
        self.held.contains(&key_code)
    }

    /// Whether the primary pointer button is down.
    pub fn pointer_held(&self) -> bool {
        self.pointer_held
    }

    /// Pointer motion accumulated this frame.
    pub fn pointer_delta(&self) -> (f32, f32) {
        self.delta
    }

    /// Custom events received this frame.
    pub fn custom_events(&self) -> &[InputEvent] {
        &self.custom
    }

    /// Clear per-frame data. Held keys and buttons survive.
    pub fn end_frame(&mut self) {
        self.delta = (0.0, 0.0);
        self.custom.clear();
    }
}
