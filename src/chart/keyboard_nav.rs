//! Keyboard-driven bucket resizing.
//!
//! ## Key bindings
//!
//! | Key | Action                                   |
//! |-----|------------------------------------------|
//! | `↑` | Next larger Y (value) bucket size        |
//! | `↓` | Next smaller Y (value) bucket size       |
//! | `→` | Widen X (time) buckets by one step       |
//! | `←` | Narrow X (time) buckets, down to a floor |
//! | `L` | Toggle linear / ranked saturation        |

use data::heatmap::Command;
use iced::keyboard::{self, Key, key::Named};

/// Returns `None` when `event` is not a heatmap key, so callers can fall
/// through to other handlers.
pub fn handle(event: &keyboard::Event) -> Option<Command> {
    let keyboard::Event::KeyPressed { key, modifiers, .. } = event else {
        return None;
    };

    if modifiers.command() || modifiers.alt() {
        return None;
    }

    let command = match key.as_ref() {
        Key::Named(Named::ArrowUp) => Command::GrowYBucket,
        Key::Named(Named::ArrowDown) => Command::ShrinkYBucket,
        Key::Named(Named::ArrowRight) => Command::GrowXBucket,
        Key::Named(Named::ArrowLeft) => Command::ShrinkXBucket,
        Key::Character(c) if c.eq_ignore_ascii_case("l") => Command::ToggleColorMode,
        _ => return None,
    };

    Some(command)
}
