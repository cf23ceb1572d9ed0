//! Host notifications fed into the engine

use crate::{EventTarget, ScrollSource};

/// Pointer, wheel or touch notification.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputEvent {
    /// Direct target, `None` if the host could not tell
    pub target: Option<EventTarget>,
    /// Composed propagation path, innermost first
    pub composed_path: Option<Vec<EventTarget>>,
}

impl InputEvent {
    /// Event aimed at `target` with no composed path
    pub fn at(target: impl Into<EventTarget>) -> Self {
        Self {
            target: Some(target.into()),
            composed_path: None,
        }
    }

    /// Event carrying an explicit composed path
    pub fn with_path(target: impl Into<EventTarget>, path: Vec<EventTarget>) -> Self {
        Self {
            target: Some(target.into()),
            composed_path: Some(path),
        }
    }
}

/// Key-press notification.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyEvent {
    /// Key name as reported by the host (`"ArrowDown"`, `"PageUp"`, `" "`, ...)
    pub key: String,
    pub input: InputEvent,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>, input: InputEvent) -> Self {
        Self {
            key: key.into(),
            input,
        }
    }
}

/// Keys that scroll a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollKey {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    PageUp,
    PageDown,
    Home,
    End,
    Space,
}

impl ScrollKey {
    /// Map a host key name onto a scroll key, `None` for every other key.
    pub fn from_key(key: &str) -> Option<Self> {
        let parsed = match key {
            "ArrowUp" => Self::ArrowUp,
            "ArrowDown" => Self::ArrowDown,
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            "PageUp" => Self::PageUp,
            "PageDown" => Self::PageDown,
            "Home" => Self::Home,
            "End" => Self::End,
            "Space" | " " => Self::Space,
            _ => return None,
        };
        Some(parsed)
    }
}

/// Everything a host can notify the engine about.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// Movement notification (observed in capture phase at document scope)
    Scroll { target: Option<EventTarget> },
    Wheel(InputEvent),
    TouchStart(InputEvent),
    TouchMove(InputEvent),
    KeyDown(KeyEvent),
}

impl HostEvent {
    /// Input source a notification is evidence of, `None` for movement notifications
    /// and keys outside the scroll key set.
    pub fn hint_source(&self) -> Option<ScrollSource> {
        match self {
            Self::Scroll { .. } => None,
            Self::Wheel(_) => Some(ScrollSource::Wheel),
            Self::TouchStart(_) | Self::TouchMove(_) => Some(ScrollSource::Touch),
            Self::KeyDown(key) => ScrollKey::from_key(&key.key).map(|_| ScrollSource::Keyboard),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NodeId;

    #[test]
    fn test_scroll_keys() {
        assert_eq!(ScrollKey::from_key("PageDown"), Some(ScrollKey::PageDown));
        assert_eq!(ScrollKey::from_key(" "), Some(ScrollKey::Space));
        assert_eq!(ScrollKey::from_key("Space"), Some(ScrollKey::Space));
        assert_eq!(ScrollKey::from_key("a"), None);
        assert_eq!(ScrollKey::from_key("Enter"), None);
    }

    #[test]
    fn test_hint_source() {
        let input = InputEvent::at(NodeId::new(3));
        assert_eq!(
            HostEvent::Wheel(input.clone()).hint_source(),
            Some(ScrollSource::Wheel)
        );
        assert_eq!(
            HostEvent::TouchMove(input.clone()).hint_source(),
            Some(ScrollSource::Touch)
        );
        assert_eq!(
            HostEvent::KeyDown(KeyEvent::new("End", input.clone())).hint_source(),
            Some(ScrollSource::Keyboard)
        );
        assert_eq!(
            HostEvent::KeyDown(KeyEvent::new("Tab", input)).hint_source(),
            None
        );
        assert_eq!(HostEvent::Scroll { target: None }.hint_source(), None);
    }
}
