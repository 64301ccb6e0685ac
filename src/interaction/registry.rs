//! Registry of interactive room objects.
//!
//! Built once when the model finishes loading: every mesh node is classified
//! by name into tags and roles, collected into groups, and the groups that
//! need a visual order are sorted. After that the registry is read-only.

use std::{
    collections::{BTreeMap, HashMap},
    sync::OnceLock,
};

use regex::Regex;

use super::roles::{Group, Role, RuleSet};
use crate::{
    error::RegistryError,
    gfx::scene::{NodeId, SceneGraph, Transform},
};

/// Name substrings that mark interaction tags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagMarkers {
    pub hover: &'static str,
    pub pointer: &'static str,
}

impl Default for TagMarkers {
    fn default() -> Self {
        Self {
            hover: "Hover",
            pointer: "Pointer",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tags {
    /// Reacts to pointer-over with enter/exit animations
    pub hoverable: bool,
    /// Turns the cursor into a pointer and may act on click
    pub pointer_cursor: bool,
}

impl Tags {
    pub fn is_raycast_target(&self) -> bool {
        self.hoverable || self.pointer_cursor
    }
}

/// How a group is ordered once registration finishes
#[derive(Debug, Clone, PartialEq)]
pub enum GroupOrder {
    /// By the first run of digits in the name (`Keyboard_12` → 12)
    NumericSuffix,
    /// By position of the node's role in this list
    Priority(Vec<Role>),
}

/// What to do when a numerically ordered name carries no digits
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderingPolicy {
    /// Fail registration
    Strict,
    /// Keep such names after the numbered ones, in registration order
    Lenient,
}

impl Default for OrderingPolicy {
    /// Strict in debug builds so broken asset names surface early
    fn default() -> Self {
        if cfg!(debug_assertions) {
            OrderingPolicy::Strict
        } else {
            OrderingPolicy::Lenient
        }
    }
}

/// Name rules plus ordering for one world variant
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegistryPlan {
    pub markers: TagMarkers,
    pub rules: RuleSet,
    pub orders: Vec<(Group, GroupOrder)>,
}

/// A registered scene node
#[derive(Debug, Clone, PartialEq)]
pub struct InteractiveObject {
    pub node: NodeId,
    pub name: String,
    /// Transform at registration, before any hidden scale is applied
    pub initial: Transform,
    pub tags: Tags,
    pub roles: Vec<Role>,
}

impl InteractiveObject {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SceneRegistry {
    objects: BTreeMap<NodeId, InteractiveObject>,
    groups: HashMap<Group, Vec<NodeId>>,
    slots: HashMap<Role, NodeId>,
    raycast_targets: Vec<NodeId>,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walks the scene depth-first, registers every mesh node and sorts the groups.
    ///
    /// Nodes whose rule asks for a hidden scale are collapsed in `scene` so the
    /// intro can reveal them.
    pub fn populate(
        scene: &mut SceneGraph,
        plan: &RegistryPlan,
        policy: OrderingPolicy,
    ) -> Result<Self, RegistryError> {
        let mut registry = Self::new();

        for id in scene.walk_depth_first() {
            let Some(node) = scene.node(id) else {
                continue;
            };
            if !node.is_mesh() {
                continue;
            }

            let name = node.name.clone();
            let transform = node.transform;
            if let Some(hidden) = registry.register(id, &name, &transform, plan) {
                if let Some(node) = scene.node_mut(id) {
                    node.transform.scale = hidden.into();
                }
            }
        }

        registry.finalize(&plan.orders, policy)?;
        scene.update_world_transforms();

        log::info!(
            "Registered {} interactive objects ({} ray cast targets)",
            registry.objects.len(),
            registry.raycast_targets.len()
        );
        Ok(registry)
    }

    /// Classifies one node by name.
    ///
    /// Returns the hidden scale requested by the last matching rule that has
    /// one. Names that match no marker and no rule are ignored.
    pub fn register(
        &mut self,
        node: NodeId,
        name: &str,
        transform: &Transform,
        plan: &RegistryPlan,
    ) -> Option<[f32; 3]> {
        let tags = Tags {
            hoverable: name.contains(plan.markers.hover),
            pointer_cursor: name.contains(plan.markers.pointer),
        };
        let matched = plan.rules.classify(name);

        if !tags.is_raycast_target() && matched.is_empty() {
            return None;
        }

        let mut hidden = None;
        let mut roles = Vec::with_capacity(matched.len());
        for rule in matched {
            let role = rule.role;
            let members = self.groups.entry(role.group()).or_default();
            if role.is_singular() {
                // A later node with the same singular role replaces the earlier one
                if let Some(previous) = self.slots.insert(role, node) {
                    members.retain(|&id| id != previous);
                }
            }
            members.push(node);
            roles.push(role);
            hidden = rule.hidden_scale.or(hidden);
        }

        if tags.is_raycast_target() {
            self.raycast_targets.push(node);
        }

        log::debug!("Registered {name} as {roles:?} {tags:?}");
        self.objects.insert(
            node,
            InteractiveObject {
                node,
                name: name.to_string(),
                initial: *transform,
                tags,
                roles,
            },
        );
        hidden
    }

    /// Applies the group orders. Sorting is stable.
    pub fn finalize(
        &mut self,
        orders: &[(Group, GroupOrder)],
        policy: OrderingPolicy,
    ) -> Result<(), RegistryError> {
        for (group, order) in orders {
            let Some(members) = self.groups.get(group) else {
                continue;
            };

            let mut keyed: Vec<(Option<u64>, NodeId)> = Vec::with_capacity(members.len());
            for &id in members {
                let object = &self.objects[&id];
                let key = match order {
                    GroupOrder::NumericSuffix => {
                        let number = numeric_key(&object.name);
                        if number.is_none() {
                            match policy {
                                OrderingPolicy::Strict => {
                                    return Err(RegistryError::MissingNumericSuffix {
                                        group: *group,
                                        name: object.name.clone(),
                                    })
                                }
                                OrderingPolicy::Lenient => log::error!(
                                    "`{}` in {group:?} has no number, ordering it last",
                                    object.name
                                ),
                            }
                        }
                        number
                    }
                    GroupOrder::Priority(priority) => priority
                        .iter()
                        .position(|role| object.has_role(*role))
                        .map(|index| index as u64),
                };
                keyed.push((key, id));
            }

            // `None` sorts after every number
            keyed.sort_by_key(|(key, _)| (key.is_none(), *key));
            self.groups
                .insert(*group, keyed.into_iter().map(|(_, id)| id).collect());
        }
        Ok(())
    }

    pub fn object(&self, node: NodeId) -> Option<&InteractiveObject> {
        self.objects.get(&node)
    }

    pub fn objects(&self) -> impl Iterator<Item = &InteractiveObject> {
        self.objects.values()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Members of `group` in their final order
    pub fn group(&self, group: Group) -> &[NodeId] {
        self.groups.get(&group).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Node holding a singular role, if one was found
    pub fn slot(&self, role: Role) -> Option<NodeId> {
        self.slots.get(&role).copied()
    }

    /// Every node tagged hoverable or pointer, in registration order
    pub fn raycast_targets(&self) -> &[NodeId] {
        &self.raycast_targets
    }

    pub fn tags(&self, node: NodeId) -> Tags {
        self.object(node).map(|object| object.tags).unwrap_or_default()
    }
}

/// First run of digits in `name`
fn numeric_key(name: &str) -> Option<u64> {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    let digits = DIGITS.get_or_init(|| Regex::new(r"\d+").expect("valid digit pattern"));
    digits.find(name).and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::picking::AABB;
    use crate::interaction::roles::{NameMatch, RoleRule, SocialIcon};
    use crate::world::PanelId;
    use cgmath::Vector3;

    fn mesh_scene(names: &[&str]) -> SceneGraph {
        let mut scene = SceneGraph::new();
        for name in names {
            scene.add_node(
                NodeId::ROOT,
                *name,
                Transform::identity(),
                Some(AABB::new(
                    Vector3::new(-0.5, -0.5, -0.5),
                    Vector3::new(0.5, 0.5, 0.5),
                )),
            );
        }
        scene
    }

    fn button_plan() -> RegistryPlan {
        RegistryPlan {
            markers: TagMarkers::default(),
            rules: RuleSet::new()
                .independent(RoleRule::hidden(
                    NameMatch::Contains("Work_Button"),
                    Role::NavButton(PanelId::Work),
                ))
                .independent(RoleRule::hidden(
                    NameMatch::Contains("About_Button"),
                    Role::NavButton(PanelId::About),
                ))
                .independent(RoleRule::hidden(
                    NameMatch::Contains("Contact_Button"),
                    Role::NavButton(PanelId::Contact),
                ))
                .independent(RoleRule::hidden(
                    NameMatch::StartsWith("Keyboard_"),
                    Role::KeyboardKey,
                )),
            orders: vec![
                (
                    Group::NavButtons,
                    GroupOrder::Priority(vec![
                        Role::NavButton(PanelId::Work),
                        Role::NavButton(PanelId::About),
                        Role::NavButton(PanelId::Contact),
                    ]),
                ),
                (Group::KeyboardKeys, GroupOrder::NumericSuffix),
            ],
        }
    }

    #[test]
    fn test_nav_buttons_sorted_by_priority() {
        let mut scene = mesh_scene(&[
            "About_Button_Hover_Pointer",
            "Contact_Button_Hover_Pointer",
            "My_Work_Button_Hover_Pointer",
        ]);
        let registry =
            SceneRegistry::populate(&mut scene, &button_plan(), OrderingPolicy::Strict).unwrap();

        let names: Vec<&str> = registry
            .group(Group::NavButtons)
            .iter()
            .map(|id| registry.object(*id).unwrap().name.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "My_Work_Button_Hover_Pointer",
                "About_Button_Hover_Pointer",
                "Contact_Button_Hover_Pointer"
            ]
        );
    }

    #[test]
    fn test_keys_sorted_numerically_not_alphabetically() {
        let mut scene = mesh_scene(&["Keyboard_10", "Keyboard_2", "Keyboard_1"]);
        let registry =
            SceneRegistry::populate(&mut scene, &button_plan(), OrderingPolicy::Strict).unwrap();

        let names: Vec<&str> = registry
            .group(Group::KeyboardKeys)
            .iter()
            .map(|id| registry.object(*id).unwrap().name.as_str())
            .collect();
        assert_eq!(names, vec!["Keyboard_1", "Keyboard_2", "Keyboard_10"]);
    }

    #[test]
    fn test_missing_number_strict_fails() {
        let mut scene = mesh_scene(&["Keyboard_3", "Keyboard_Space"]);
        let err = SceneRegistry::populate(&mut scene, &button_plan(), OrderingPolicy::Strict)
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::MissingNumericSuffix {
                group: Group::KeyboardKeys,
                name: "Keyboard_Space".to_string()
            }
        );
    }

    #[test]
    fn test_missing_number_lenient_keeps_order() {
        let mut scene =
            mesh_scene(&["Keyboard_Space", "Keyboard_Enter", "Keyboard_4", "Keyboard_3"]);
        let registry =
            SceneRegistry::populate(&mut scene, &button_plan(), OrderingPolicy::Lenient).unwrap();

        let names: Vec<&str> = registry
            .group(Group::KeyboardKeys)
            .iter()
            .map(|id| registry.object(*id).unwrap().name.as_str())
            .collect();
        assert_eq!(
            names,
            vec!["Keyboard_3", "Keyboard_4", "Keyboard_Space", "Keyboard_Enter"]
        );
    }

    #[test]
    fn test_tags_and_initial_transform() {
        let mut scene = mesh_scene(&["Coffee_Mug_Pointer_Hover", "Wall"]);
        let registry =
            SceneRegistry::populate(&mut scene, &button_plan(), OrderingPolicy::Strict).unwrap();

        let mug = scene.find_by_name("Coffee_Mug_Pointer_Hover").unwrap();
        let tags = registry.tags(mug);
        assert!(tags.hoverable && tags.pointer_cursor);
        assert_eq!(registry.raycast_targets(), &[mug]);
        assert_eq!(registry.object(mug).unwrap().initial, Transform::identity());

        // No marker, no rule: silently ignored
        let wall = scene.find_by_name("Wall").unwrap();
        assert!(registry.object(wall).is_none());
    }

    #[test]
    fn test_hidden_scale_applied_after_capture() {
        let mut scene = mesh_scene(&["Keyboard_1_Hover"]);
        let registry =
            SceneRegistry::populate(&mut scene, &button_plan(), OrderingPolicy::Strict).unwrap();

        let key = scene.find_by_name("Keyboard_1_Hover").unwrap();
        assert_eq!(scene.node(key).unwrap().transform.scale, Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(
            registry.object(key).unwrap().initial.scale,
            Vector3::new(1.0, 1.0, 1.0)
        );
    }

    #[test]
    fn test_singular_slot_keeps_last_match() {
        let plan = RegistryPlan {
            rules: RuleSet::new().independent(RoleRule::new(
                NameMatch::Contains("GitHub"),
                Role::Social(SocialIcon::GitHub),
            )),
            ..RegistryPlan::default()
        };
        let mut scene = mesh_scene(&["GitHub_Old", "GitHub_New"]);
        let registry = SceneRegistry::populate(&mut scene, &plan, OrderingPolicy::Strict).unwrap();

        let newer = scene.find_by_name("GitHub_New").unwrap();
        assert_eq!(registry.slot(Role::Social(SocialIcon::GitHub)), Some(newer));
        assert_eq!(registry.group(Group::SocialIcons), &[newer]);
    }
}
