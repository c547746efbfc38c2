//! Keyboard input for the demo.
//!
//! The `Input` struct tracks which keys went down this frame and turns them
//! into [`Event`]s through the three shortcuts:
//!
//! | Key | Event |
//! |-----|-------|
//! | Space | [`Event::TogglePlay`] |
//! | R | [`Event::Reset`] |
//! | I | [`Event::ToggleInfo`] |
//!
//! Shortcuts are suppressed when the primary input is touch, where a
//! virtual keyboard popping up would otherwise toggle playback.
//!
//! # Usage
//!
//! ```
//! use nephron::input::{Input, KeyCode};
//! use nephron::Event;
//!
//! let mut input = Input::new();
//! input.key_down(KeyCode::Space);
//! assert_eq!(input.shortcuts(), vec![Event::TogglePlay]);
//!
//! input.begin_frame();
//! assert!(input.shortcuts().is_empty());
//! ```

use crate::controller::Event;
use std::collections::HashSet;

/// Keyboard key codes the demo distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Space,
    R,
    I,
    Other(u32),
}

#[cfg(feature = "egui")]
impl From<egui::Key> for KeyCode {
    fn from(key: egui::Key) -> Self {
        match key {
            egui::Key::Space => KeyCode::Space,
            egui::Key::R => KeyCode::R,
            egui::Key::I => KeyCode::I,
            _ => KeyCode::Other(key as u32),
        }
    }
}

/// Shortcut bound to `key`, if any.
pub fn shortcut(key: KeyCode) -> Option<Event> {
    match key {
        KeyCode::Space => Some(Event::TogglePlay),
        KeyCode::R => Some(Event::Reset),
        KeyCode::I => Some(Event::ToggleInfo),
        KeyCode::Other(_) => None,
    }
}

/// Keyboard state for one frame.
#[derive(Debug, Default)]
pub struct Input {
    keys_held: HashSet<KeyCode>,
    /// Keys that went down this frame, in press order.
    keys_pressed: Vec<KeyCode>,
    touch_primary: bool,
}

impl Input {
    /// Create a new input tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-frame state. Call at the start of each frame.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
    }

    /// Record a key going down. Auto-repeat while held is ignored.
    pub fn key_down(&mut self, key: KeyCode) {
        if self.keys_held.insert(key) {
            self.keys_pressed.push(key);
        }
    }

    /// Record a key going up.
    pub fn key_up(&mut self, key: KeyCode) {
        self.keys_held.remove(&key);
    }

    /// Record a raw key event from the windowing layer.
    ///
    /// While a text field has keyboard focus, presses are not recorded but
    /// releases still are, so a key let go inside the field is not left held.
    pub fn key_event(&mut self, key: KeyCode, pressed: bool, text_focus: bool) {
        if !pressed {
            self.key_up(key);
        } else if !text_focus {
            self.key_down(key);
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

    /// Mark whether the primary input device is a touch screen.
    pub fn set_touch_primary(&mut self, touch: bool) {
        self.touch_primary = touch;
    }

    #[inline]
    pub fn is_touch_primary(&self) -> bool {
        self.touch_primary
    }

    /// Events triggered by this frame's key presses.
    pub fn shortcuts(&self) -> Vec<Event> {
        if self.touch_primary {
            return Vec::new();
        }
        self.keys_pressed.iter().copied().filter_map(shortcut).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortcut_map() {
        assert_eq!(shortcut(KeyCode::Space), Some(Event::TogglePlay));
        assert_eq!(shortcut(KeyCode::R), Some(Event::Reset));
        assert_eq!(shortcut(KeyCode::I), Some(Event::ToggleInfo));
        assert_eq!(shortcut(KeyCode::Other(42)), None);
    }

    #[test]
    fn test_held_key_fires_once() {
        let mut input = Input::new();
        input.key_down(KeyCode::R);
        assert_eq!(input.shortcuts(), vec![Event::Reset]);

        input.begin_frame();
        input.key_down(KeyCode::R); // auto-repeat
        assert!(input.shortcuts().is_empty());
        assert!(input.key_held(KeyCode::R));

        input.key_up(KeyCode::R);
        input.begin_frame();
        input.key_down(KeyCode::R);
        assert!(input.key_pressed(KeyCode::R));
    }

    #[test]
    fn test_touch_suppresses_shortcuts() {
        let mut input = Input::new();
        input.set_touch_primary(true);
        input.key_down(KeyCode::Space);
        assert!(input.key_pressed(KeyCode::Space));
        assert!(input.shortcuts().is_empty());
    }

    #[test]
    fn test_release_during_text_focus_is_kept() {
        let mut input = Input::new();
        input.key_event(KeyCode::Space, true, false);
        assert_eq!(input.shortcuts(), vec![Event::TogglePlay]);

        // Released while a text field has focus
        input.begin_frame();
        input.key_event(KeyCode::Space, false, true);
        assert!(!input.key_held(KeyCode::Space));

        // Presses while focused are ignored
        input.begin_frame();
        input.key_event(KeyCode::Space, true, true);
        assert!(input.shortcuts().is_empty());
        assert!(!input.key_held(KeyCode::Space));

        // The shortcut works again once focus is gone
        input.begin_frame();
        input.key_event(KeyCode::Space, true, false);
        assert_eq!(input.shortcuts(), vec![Event::TogglePlay]);
    }

    #[test]
    fn test_press_order_is_kept() {
        let mut input = Input::new();
        input.key_down(KeyCode::I);
        input.key_down(KeyCode::Space);
        assert_eq!(input.shortcuts(), vec![Event::ToggleInfo, Event::TogglePlay]);
    }
}
