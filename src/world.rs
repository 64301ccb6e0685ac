//! Everything the tween engine can animate: the room's scene graph plus the
//! overlay and info panels shown on top of it.

use std::fmt;

use cgmath::Vector3;

use crate::{
    animation::tween::{Channel, PropertyKey, PropertyStore, Target},
    gfx::scene::SceneGraph,
};

/// The info panels opened by the navigation buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PanelId {
    Work,
    About,
    Contact,
}

impl PanelId {
    pub const ALL: [PanelId; 3] = [PanelId::Work, PanelId::About, PanelId::Contact];

    fn slot(self) -> usize {
        match self {
            PanelId::Work => 0,
            PanelId::About => 1,
            PanelId::Contact => 2,
        }
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PanelId::Work => "work",
            PanelId::About => "about",
            PanelId::Contact => "contact",
        };
        f.write_str(name)
    }
}

/// Presentation state of the overlay or a panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelVisual {
    pub visible: bool,
    pub opacity: f32,
    pub scale: f32,
}

impl Default for PanelVisual {
    fn default() -> Self {
        Self {
            visible: false,
            opacity: 0.0,
            scale: 0.0,
        }
    }
}

/// Scene graph plus 2D overlay state, the single target of all tweens
#[derive(Debug, Clone, Default)]
pub struct World {
    pub scene: SceneGraph,
    pub overlay: PanelVisual,
    panels: [PanelVisual; 3],
}

impl World {
    pub fn new(scene: SceneGraph) -> Self {
        Self {
            scene,
            overlay: PanelVisual::default(),
            panels: [PanelVisual::default(); 3],
        }
    }

    pub fn panel(&self, panel: PanelId) -> &PanelVisual {
        &self.panels[panel.slot()]
    }

    pub fn panel_mut(&mut self, panel: PanelId) -> &mut PanelVisual {
        &mut self.panels[panel.slot()]
    }

    fn visual_mut(&mut self, target: Target) -> Option<&mut PanelVisual> {
        match target {
            Target::Overlay => Some(&mut self.overlay),
            Target::Panel(panel) => Some(self.panel_mut(panel)),
            Target::Node(_) => None,
        }
    }

    fn visual(&self, target: Target) -> Option<&PanelVisual> {
        match target {
            Target::Overlay => Some(&self.overlay),
            Target::Panel(panel) => Some(self.panel(panel)),
            Target::Node(_) => None,
        }
    }
}

impl PropertyStore for World {
    fn get(&self, key: PropertyKey) -> Option<Vector3<f32>> {
        if let Target::Node(id) = key.target {
            let transform = &self.scene.node(id)?.transform;
            return match key.channel {
                Channel::Position => Some(transform.position),
                Channel::Rotation => Some(transform.rotation),
                Channel::Scale => Some(transform.scale),
                Channel::Opacity => None,
            };
        }

        let visual = self.visual(key.target)?;
        match key.channel {
            Channel::Opacity => Some(Vector3::new(visual.opacity, visual.opacity, visual.opacity)),
            Channel::Scale => Some(Vector3::new(visual.scale, visual.scale, visual.scale)),
            Channel::Position | Channel::Rotation => None,
        }
    }

    fn set(&mut self, key: PropertyKey, value: Vector3<f32>) {
        if let Target::Node(id) = key.target {
            if let Some(node) = self.scene.node_mut(id) {
                match key.channel {
                    Channel::Position => node.transform.position = value,
                    Channel::Rotation => node.transform.rotation = value,
                    Channel::Scale => node.transform.scale = value,
                    Channel::Opacity => {}
                }
            }
            return;
        }

        if let Some(visual) = self.visual_mut(key.target) {
            match key.channel {
                Channel::Opacity => visual.opacity = value.x,
                Channel::Scale => visual.scale = value.x,
                Channel::Position | Channel::Rotation => {}
            }
        }
    }
}
