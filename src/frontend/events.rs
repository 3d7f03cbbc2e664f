//! Input events for the demo frontend.
//!
//! crossterm events are translated into [`FrontendEvent`], and key presses
//! map onto the handful of [`DemoAction`]s the demo understands.

use crossterm::event::{KeyCode, KeyModifiers};

/// Frontend-agnostic event
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

    /// What the demo should do in response, if anything
    pub fn action(&self) -> Option<DemoAction> {
        match self {
            Self::Quit => Some(DemoAction::Quit),
            Self::Resize { .. } => None,
            Self::Key { code, modifiers } => match code {
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                    Some(DemoAction::Quit)
                }
                KeyCode::Char('q') | KeyCode::Esc => Some(DemoAction::Quit),
                KeyCode::Char('+') | KeyCode::Char('=') => Some(DemoAction::MoreDots),
                KeyCode::Char('-') => Some(DemoAction::FewerDots),
                KeyCode::Char('[') => Some(DemoAction::Faster),
                KeyCode::Char(']') => Some(DemoAction::Slower),
                _ => None,
            },
        }
    }
}

/// Demo controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoAction {
    Quit,
    MoreDots,
    FewerDots,
    /// Shorten the cycle
    Faster,
    /// Lengthen the cycle
    Slower,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_actions() {
        let key = |c| FrontendEvent::key(KeyCode::Char(c), KeyModifiers::NONE);
        assert_eq!(key('q').action(), Some(DemoAction::Quit));
        assert_eq!(key('+').action(), Some(DemoAction::MoreDots));
        assert_eq!(key('=').action(), Some(DemoAction::MoreDots));
        assert_eq!(key('-').action(), Some(DemoAction::FewerDots));
        assert_eq!(key('[').action(), Some(DemoAction::Faster));
        assert_eq!(key(']').action(), Some(DemoAction::Slower));
        assert_eq!(key('x').action(), None);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let event = FrontendEvent::key(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(event.action(), Some(DemoAction::Quit));
        let plain = FrontendEvent::key(KeyCode::Char('c'), KeyModifiers::NONE);
        assert_eq!(plain.action(), None);
    }

    #[test]
    fn test_resize_has_no_action() {
        assert!(matches!(
            FrontendEvent::resize(120, 40),
            FrontendEvent::Resize {
                width: 120,
                height: 40
            }
        ));
        assert_eq!(FrontendEvent::resize(120, 40).action(), None);
        assert_eq!(FrontendEvent::Quit.action(), Some(DemoAction::Quit));
    }
}
