//! Input event types decoded at the platform boundary.
//!
//! The viewport never sees raw key codes or windowing-toolkit events. The
//! embedding layer translates whatever its platform produces into these
//! semantic tokens once, which keeps the interaction state machine
//! platform-independent and testable.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys held while an event fired.
///
/// `structural` is ctrl-or-command: the modifier that switches the viewport
/// into pan/zoom/command mode instead of shape editing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub structural: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    /// Only the structural (ctrl/command) modifier held.
    pub fn structural() -> Self {
        Self {
            structural: true,
            ..Self::default()
        }
    }
}

/// Pointer events, with positions in display pixels relative to the
/// container origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
        modifiers: Modifiers,
    },
    Up {
        position: Point,
        button: MouseButton,
        modifiers: Modifiers,
    },
    Move {
        position: Point,
        modifiers: Modifiers,
    },
    /// Native double-click, delivered in addition to the down/up pairs.
    DoubleClick {
        position: Point,
        modifiers: Modifiers,
    },
    Wheel {
        position: Point,
        delta: Vec2,
        modifiers: Modifiers,
    },
}

/// Semantic key tokens.
///
/// Plain letters arrive as `Char` and are interpreted by the command table;
/// keys with fixed meaning get their own variant so the state machine never
/// matches on platform key codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Escape,
    Enter,
    Delete,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    ZoomIn,
    ZoomOut,
    Char(char),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_shorthand() {
        let mods = Modifiers::structural();
        assert!(mods.structural);
        assert!(!mods.shift);
        assert!(!mods.alt);
    }

    #[test]
    fn test_pointer_event_serde_round_trip() {
        let event = PointerEvent::Down {
            position: Point::new(4.0, 8.0),
            button: MouseButton::Left,
            modifiers: Modifiers::default(),
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: PointerEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
