//! What a click on a registered object does.

use std::collections::{BTreeMap, HashMap};

use super::{
    registry::InteractiveObject,
    roles::{Role, SocialIcon},
};
use crate::world::PanelId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    OpenUrl(String),
    OpenPanel(PanelId),
}

/// Maps social icons to links. Navigation buttons always map to their panel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionTable {
    links: HashMap<SocialIcon, String>,
}

impl ActionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_link(mut self, icon: SocialIcon, url: impl Into<String>) -> Self {
        self.links.insert(icon, url.into());
        self
    }

    /// Builds the table from `social_links` config entries keyed by icon name.
    /// Unknown keys are logged and skipped.
    pub fn from_links(links: &BTreeMap<String, String>) -> Self {
        let mut table = Self::new();
        for (key, url) in links {
            let Some(icon) = [
                SocialIcon::GitHub,
                SocialIcon::LinkedIn,
                SocialIcon::Instagram,
                SocialIcon::Boba,
            ]
            .into_iter()
            .find(|icon| icon.config_key().eq_ignore_ascii_case(key)) else {
                log::warn!("Unknown social link `{key}`, skipping");
                continue;
            };
            table.links.insert(icon, url.clone());
        }
        table
    }

    pub fn link(&self, icon: SocialIcon) -> Option<&str> {
        self.links.get(&icon).map(String::as_str)
    }

    /// Every link of the object's social roles, then the panel of its first
    /// navigation role
    pub fn resolve(&self, object: &InteractiveObject) -> Vec<Action> {
        let mut actions: Vec<Action> = object
            .roles
            .iter()
            .filter_map(|role| match role {
                Role::Social(icon) => self.link(*icon),
                _ => None,
            })
            .map(|url| Action::OpenUrl(url.to_string()))
            .collect();

        let panel = object.roles.iter().find_map(|role| match role {
            Role::NavButton(panel) => Some(*panel),
            _ => None,
        });
        actions.extend(panel.map(Action::OpenPanel));
        actions
    }
}
