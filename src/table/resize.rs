//! Column resize sessions and pointer capture.

use std::cell::Cell;
use std::rc::Rc;

/// Lower width bound for columns that do not declare one.
pub const DEFAULT_MIN_WIDTH: u16 = 50;
/// Upper width bound for columns that do not declare one.
pub const DEFAULT_MAX_WIDTH: u16 = 800;

/// Shared flag telling the host to route pointer-move/up to the table and
/// to show the resizing cursor. Cloning yields another handle to the same flag.
#[derive(Debug, Clone, Default)]
pub struct PointerCapture {
    active: Rc<Cell<bool>>,
}

impl PointerCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Takes the capture. Returns `None` while another guard holds it.
    pub fn acquire(&self) -> Option<CaptureGuard> {
        if self.active.get() {
            return None;
        }
        self.active.set(true);
        Some(CaptureGuard {
            active: Rc::clone(&self.active),
        })
    }
}

/// Held for the lifetime of a resize session; releases the capture on drop.
#[derive(Debug)]
pub struct CaptureGuard {
    active: Rc<Cell<bool>>,
}

impl Drop for CaptureGuard {
    fn drop(&mut self) {
        self.active.set(false);
    }
}

/// In-progress drag of one column border.
#[derive(Debug)]
pub struct ResizeSession {
    pub key: String,
    pub start_x: i32,
    pub start_width: u16,
    _capture: CaptureGuard,
}

impl ResizeSession {
    pub(crate) fn new(key: &str, start_x: i32, start_width: u16, capture: CaptureGuard) -> Self {
        Self {
            key: key.to_string(),
            start_x,
            start_width,
            _capture: capture,
        }
    }

    /// Unclamped width for the given pointer position.
    pub fn candidate_width(&self, pointer_x: i32) -> i64 {
        self.start_width as i64 + (pointer_x as i64 - self.start_x as i64)
    }
}

/// Width after dragging by `delta`, clamped into `[min, max]`.
pub fn clamp_width(start_width: u16, delta: i64, min: u16, max: u16) -> u16 {
    (start_width as i64 + delta).clamp(min as i64, max as i64) as u16
}
