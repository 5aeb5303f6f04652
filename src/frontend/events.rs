//! Frontend-agnostic input events.
//!
//! The terminal frontend translates crossterm events into this enum so the
//! demo core only handles one event shape.

use crossterm::event::{KeyCode, KeyModifiers};

#[derive(Debug, Clone, PartialEq)]
pub enum FrontendEvent {
    /// Keyboard input
    Key {
        code: KeyCode,
        modifiers: KeyModifiers,
    },
    /// Terminal resize
    Resize { width: u16, height: u16 },
    /// Application quit signal
    Quit,
}

impl FrontendEvent {
    pub fn key(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self::Key { code, modifiers }
    }

    pub fn resize(width: u16, height: u16) -> Self {
        Self::Resize { width, height }
    }

    pub fn quit() -> Self {
        Self::Quit
    }

    /// Ctrl+C arrives as a plain key in raw mode
    pub fn is_interrupt(&self) -> bool {
        matches!(
            self,
            FrontendEvent::Key {
                code: KeyCode::Char('c'),
                modifiers,
            } if modifiers.contains(KeyModifiers::CONTROL)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_creation() {
        let key_event = FrontendEvent::key(KeyCode::Char('a'), KeyModifiers::NONE);
        assert!(matches!(key_event, FrontendEvent::Key { .. }));

        let resize_event = FrontendEvent::resize(120, 40);
        assert!(matches!(
            resize_event,
            FrontendEvent::Resize {
                width: 120,
                height: 40
            }
        ));

        let quit_event = FrontendEvent::quit();
        assert!(matches!(quit_event, FrontendEvent::Quit));
    }

    #[test]
    fn test_interrupt_detection() {
        assert!(FrontendEvent::key(KeyCode::Char('c'), KeyModifiers::CONTROL).is_interrupt());
        assert!(!FrontendEvent::key(KeyCode::Char('c'), KeyModifiers::NONE).is_interrupt());
        assert!(!FrontendEvent::quit().is_interrupt());
    }
}
