//! Side effects the viewer asks its host to perform.

use crate::world::PanelId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorStyle {
    #[default]
    Default,
    Pointer,
}

/// Host integration points. The winit shell implements these on the window;
/// tests record them.
pub trait ViewerEffects {
    /// Open an external link, typically in the system browser
    fn open_url(&mut self, url: &str);
    fn set_cursor(&mut self, cursor: CursorStyle);
    fn set_panel_visible(&mut self, panel: PanelId, visible: bool);
    fn set_overlay_visible(&mut self, visible: bool);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    OpenUrl(String),
    Cursor(CursorStyle),
    Panel(PanelId, bool),
    Overlay(bool),
}

/// Effects sink that only remembers what it was asked to do
#[derive(Debug, Clone, Default)]
pub struct RecordedEffects {
    pub effects: Vec<Effect>,
}

impl RecordedEffects {
    pub fn opened_urls(&self) -> Vec<&str> {
        self.effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::OpenUrl(url) => Some(url.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Most recent cursor style, if any was set
    pub fn cursor(&self) -> Option<CursorStyle> {
        self.effects.iter().rev().find_map(|effect| match effect {
            Effect::Cursor(cursor) => Some(*cursor),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }
}

impl ViewerEffects for RecordedEffects {
    fn open_url(&mut self, url: &str) {
        self.effects.push(Effect::OpenUrl(url.to_string()));
    }

    fn set_cursor(&mut self, cursor: CursorStyle) {
        self.effects.push(Effect::Cursor(cursor));
    }

    fn set_panel_visible(&mut self, panel: PanelId, visible: bool) {
        self.effects.push(Effect::Panel(panel, visible));
    }

    fn set_overlay_visible(&mut self, visible: bool) {
        self.effects.push(Effect::Overlay(visible));
    }
}
