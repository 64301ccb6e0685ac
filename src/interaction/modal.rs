//! Info panel gate.
//!
//! While a panel is open the viewer stops ray casting entirely. Opening fades
//! and scales the panel in; closing fades it out and only hides the panel and
//! overlay once the fade-out has finished.

use serde::Deserialize;

use super::effects::ViewerEffects;
use crate::{
    animation::{
        completion::{Completion, CompletionState},
        ease::Ease,
        tween::{AxisTargets, Channel, PropertyKey, Target, TweenEngine, TweenSpec},
    },
    world::{PanelId, World},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalState {
    #[default]
    Closed,
    Open(PanelId),
}

impl ModalState {
    pub fn is_open(self) -> bool {
        matches!(self, ModalState::Open(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ModalStyle {
    /// Seconds for both the fade in and the fade out
    pub fade_duration: f32,
    /// Overshoot of the back ease on the panel
    pub back_strength: f32,
}

impl Default for ModalStyle {
    fn default() -> Self {
        Self {
            fade_duration: 0.5,
            back_strength: 2.0,
        }
    }
}

#[derive(Debug)]
struct PendingClose {
    panel: PanelId,
    done: Completion,
}

#[derive(Debug, Default)]
pub struct ModalGate {
    state: ModalState,
    closing: Option<PendingClose>,
    style: ModalStyle,
}

impl ModalGate {
    pub fn new(style: ModalStyle) -> Self {
        Self {
            state: ModalState::Closed,
            closing: None,
            style,
        }
    }

    pub fn state(&self) -> ModalState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    /// A panel is fading out and still visible
    pub fn is_closing(&self) -> bool {
        self.closing.is_some()
    }

    /// Shows `panel` over the overlay. Returns `false` if a panel is already open.
    pub fn open(
        &mut self,
        panel: PanelId,
        world: &mut World,
        engine: &mut TweenEngine,
        effects: &mut dyn ViewerEffects,
    ) -> bool {
        if let ModalState::Open(current) = self.state {
            log::warn!("Panel {current} already open, ignoring open of {panel}");
            return false;
        }

        // Reopening during a fade-out takes over from it
        if let Some(pending) = self.closing.take() {
            if pending.panel != panel {
                hide_panel(pending.panel, world, engine, effects);
            }
        }

        engine.kill_target(Target::Overlay);
        engine.kill_target(Target::Panel(panel));

        world.overlay.visible = true;
        world.panel_mut(panel).visible = true;
        effects.set_overlay_visible(true);
        effects.set_panel_visible(panel, true);

        let overlay_opacity = PropertyKey::new(Target::Overlay, Channel::Opacity);
        let panel_opacity = PropertyKey::new(Target::Panel(panel), Channel::Opacity);
        let panel_scale = PropertyKey::new(Target::Panel(panel), Channel::Scale);
        let zero = cgmath::Vector3::new(0.0, 0.0, 0.0);
        engine.set(world, overlay_opacity, zero);
        engine.set(world, panel_opacity, zero);
        engine.set(world, panel_scale, zero);

        let fade = self.style.fade_duration;
        let pop = Ease::BackOut(self.style.back_strength);
        engine.to(
            overlay_opacity,
            TweenSpec::new(AxisTargets::uniform(1.0), fade, Ease::Power1Out),
        );
        engine.to(panel_opacity, TweenSpec::new(AxisTargets::uniform(1.0), fade, pop));
        engine.to(panel_scale, TweenSpec::new(AxisTargets::uniform(1.0), fade, pop));

        self.state = ModalState::Open(panel);
        log::info!("Opened {panel} panel");
        true
    }

    /// Starts fading the open panel out. The gate reads as closed right away;
    /// the panel stays visible until [`ModalGate::poll`] sees the fade finish.
    pub fn close(&mut self, engine: &mut TweenEngine) -> bool {
        let ModalState::Open(panel) = self.state else {
            log::warn!("No panel open, ignoring close");
            return false;
        };

        let fade = self.style.fade_duration;
        let shrink = Ease::BackIn(self.style.back_strength);
        engine.to(
            PropertyKey::new(Target::Overlay, Channel::Opacity),
            TweenSpec::new(AxisTargets::uniform(0.0), fade, Ease::Power1Out),
        );
        engine.to(
            PropertyKey::new(Target::Panel(panel), Channel::Opacity),
            TweenSpec::new(AxisTargets::uniform(0.0), fade, shrink),
        );
        let done = engine.to(
            PropertyKey::new(Target::Panel(panel), Channel::Scale),
            TweenSpec::new(AxisTargets::uniform(0.0), fade, shrink),
        );

        self.closing = Some(PendingClose { panel, done });
        self.state = ModalState::Closed;
        log::info!("Closing {panel} panel");
        true
    }

    /// Finishes a pending close once its fade-out is done.
    ///
    /// Returns the panel that was hidden on this call.
    pub fn poll(
        &mut self,
        world: &mut World,
        engine: &mut TweenEngine,
        effects: &mut dyn ViewerEffects,
    ) -> Option<PanelId> {
        let pending = self.closing.as_mut()?;
        if pending.done.state() == CompletionState::Pending {
            return None;
        }

        let panel = pending.panel;
        self.closing = None;
        hide_panel(panel, world, engine, effects);
        log::debug!("{panel} panel hidden");
        Some(panel)
    }
}

fn hide_panel(
    panel: PanelId,
    world: &mut World,
    engine: &mut TweenEngine,
    effects: &mut dyn ViewerEffects,
) {
    engine.kill_target(Target::Panel(panel));
    engine.kill_target(Target::Overlay);
    world.panel_mut(panel).visible = false;
    world.overlay.visible = false;
    effects.set_panel_visible(panel, false);
    effects.set_overlay_visible(false);
}
