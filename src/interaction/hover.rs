//! Single-object hover tracking.
//!
//! Each frame the viewer hands the nearest ray hit to [`HoverMachine::update`].
//! The machine keeps at most one object hovered and issues the exit of the
//! previous object before the enter of the next, both within the same call.

use std::f32::consts::PI;

use serde::Deserialize;

use super::{
    registry::{InteractiveObject, SceneRegistry},
    roles::Role,
};
use crate::{
    animation::{
        ease::Ease,
        tween::{AxisTargets, Channel, PropertyKey, TweenEngine, TweenSpec},
    },
    gfx::scene::NodeId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn pick(self, v: cgmath::Vector3<f32>) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }

    fn only(self, value: f32) -> AxisTargets {
        match self {
            Axis::X => AxisTargets::only_x(value),
            Axis::Y => AxisTargets::only_y(value),
            Axis::Z => AxisTargets::only_z(value),
        }
    }
}

/// Secondary hover motion, chosen by role
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HoverMotion {
    /// Rotate around `axis` by `angle` radians
    Spin { axis: Axis, angle: f32 },
    /// Raise along y by `distance`
    Lift { distance: f32 },
}

/// Tunables of the hover animation
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct HoverProfile {
    /// Multiplier applied to the initial scale while hovered
    pub scale_factor: f32,
    /// Radians added to the spin axis while hovered
    pub spin_angle: f32,
    /// Units name letters rise while hovered
    pub lift_distance: f32,
    pub enter_duration: f32,
    pub exit_duration: f32,
}

impl Default for HoverProfile {
    fn default() -> Self {
        Self {
            scale_factor: 1.2,
            spin_angle: PI / 8.0,
            lift_distance: 0.2,
            enter_duration: 0.5,
            exit_duration: 0.3,
        }
    }
}

impl HoverProfile {
    const EASE: Ease = Ease::BounceOut;

    /// Social icons spin about z, name letters lift, everything else spins about y
    pub fn motion_for(&self, roles: &[Role]) -> HoverMotion {
        if roles.iter().any(|role| matches!(role, Role::Social(_))) {
            HoverMotion::Spin {
                axis: Axis::Z,
                angle: self.spin_angle,
            }
        } else if roles.contains(&Role::NameLetter) {
            HoverMotion::Lift {
                distance: self.lift_distance,
            }
        } else {
            HoverMotion::Spin {
                axis: Axis::Y,
                angle: self.spin_angle,
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoverState {
    #[default]
    Idle,
    Hovering(NodeId),
}

/// Animation request issued by a hover update, in issue order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverTransition {
    Exit(NodeId),
    Enter(NodeId),
}

#[derive(Debug, Clone, Default)]
pub struct HoverMachine {
    state: HoverState,
    profile: HoverProfile,
}

impl HoverMachine {
    pub fn new(profile: HoverProfile) -> Self {
        Self {
            state: HoverState::Idle,
            profile,
        }
    }

    pub fn state(&self) -> HoverState {
        self.state
    }

    pub fn hovered(&self) -> Option<NodeId> {
        match self.state {
            HoverState::Idle => None,
            HoverState::Hovering(node) => Some(node),
        }
    }

    /// Feeds the nearest ray hit of this frame.
    ///
    /// No hit exits the current object. A hoverable hit that differs from the
    /// current object exits the old one, then enters the new one. A hit on a
    /// non-hoverable object leaves the state as it is.
    pub fn update(
        &mut self,
        hit: Option<&InteractiveObject>,
        registry: &SceneRegistry,
        engine: &mut TweenEngine,
    ) -> Vec<HoverTransition> {
        let mut transitions = Vec::new();

        match hit {
            None => {
                if let Some(previous) = self.force_idle(registry, engine) {
                    transitions.push(HoverTransition::Exit(previous));
                }
            }
            Some(object) if object.tags.hoverable => {
                if self.hovered() == Some(object.node) {
                    return transitions;
                }
                if let Some(previous) = self.force_idle(registry, engine) {
                    transitions.push(HoverTransition::Exit(previous));
                }
                self.animate(object, true, engine);
                self.state = HoverState::Hovering(object.node);
                log::debug!("Hover enter {}", object.name);
                transitions.push(HoverTransition::Enter(object.node));
            }
            Some(_) => {}
        }
        transitions
    }

    /// Exits whatever is hovered and returns it
    pub fn force_idle(
        &mut self,
        registry: &SceneRegistry,
        engine: &mut TweenEngine,
    ) -> Option<NodeId> {
        let previous = self.hovered()?;
        match registry.object(previous) {
            Some(object) => {
                self.animate(object, false, engine);
                log::debug!("Hover exit {}", object.name);
            }
            None => {
                kill_motion(previous, engine);
            }
        }
        self.state = HoverState::Idle;
        Some(previous)
    }

    fn animate(&self, object: &InteractiveObject, entering: bool, engine: &mut TweenEngine) {
        kill_motion(object.node, engine);

        let initial = &object.initial;
        let (factor, duration) = if entering {
            (self.profile.scale_factor, self.profile.enter_duration)
        } else {
            (1.0, self.profile.exit_duration)
        };

        engine.to(
            PropertyKey::node(object.node, Channel::Scale),
            TweenSpec::new(
                AxisTargets::all(initial.scale * factor),
                duration,
                HoverProfile::EASE,
            ),
        );

        let (channel, to) = match self.profile.motion_for(&object.roles) {
            HoverMotion::Spin { axis, angle } => {
                let base = axis.pick(initial.rotation);
                let offset = if entering { angle } else { 0.0 };
                (Channel::Rotation, axis.only(base + offset))
            }
            HoverMotion::Lift { distance } => {
                let offset = if entering { distance } else { 0.0 };
                (Channel::Position, AxisTargets::only_y(initial.position.y + offset))
            }
        };
        engine.to(
            PropertyKey::node(object.node, channel),
            TweenSpec::new(to, duration, HoverProfile::EASE),
        );
    }
}

/// Cancels scale, rotation and position tweens of `node`
fn kill_motion(node: NodeId, engine: &mut TweenEngine) {
    for channel in [Channel::Scale, Channel::Rotation, Channel::Position] {
        engine.kill_tweens_of(PropertyKey::node(node, channel));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        animation::tween::PropertyStore,
        gfx::{
            picking::AABB,
            scene::{SceneGraph, Transform},
        },
        interaction::{
            registry::{OrderingPolicy, RegistryPlan},
            roles::{NameMatch, RoleRule, RuleSet, SocialIcon},
        },
        world::World,
    };
    use cgmath::Vector3;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    const NAMES: [&str; 5] = [
        "Coffee_Mug_Pointer_Hover",
        "GitHub_Pointer_Hover",
        "Name_Letter_1_Hover",
        "Lamp_Hover",
        "Door_Pointer",
    ];

    fn setup() -> (World, SceneRegistry, Vec<NodeId>) {
        let mut scene = SceneGraph::new();
        let ids: Vec<NodeId> = NAMES
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let mut transform =
                    Transform::from_position(Vector3::new(i as f32 * 3.0, 0.0, 0.0));
                transform.rotation = Vector3::new(0.0, 0.25 * i as f32, 0.0);
                scene.add_node(
                    NodeId::ROOT,
                    *name,
                    transform,
                    Some(AABB::new(Vector3::new(-1.0, -1.0, -1.0), Vector3::new(1.0, 1.0, 1.0))),
                )
            })
            .collect();

        let plan = RegistryPlan {
            rules: RuleSet::new()
                .independent(RoleRule::new(
                    NameMatch::Contains("GitHub"),
                    Role::Social(SocialIcon::GitHub),
                ))
                .independent(RoleRule::new(NameMatch::Contains("Name_Letter"), Role::NameLetter)),
            ..RegistryPlan::default()
        };
        let registry = SceneRegistry::populate(&mut scene, &plan, OrderingPolicy::Strict).unwrap();
        (World::new(scene), registry, ids)
    }

    fn settle(engine: &mut TweenEngine, world: &mut World) {
        for _ in 0..60 {
            engine.advance(1.0 / 30.0, world);
        }
    }

    #[test]
    fn test_enter_fires_once_for_repeated_hit() {
        let (_, registry, ids) = setup();
        let mut engine = TweenEngine::new();
        let mut hover = HoverMachine::default();
        let mug = registry.object(ids[0]);

        assert_eq!(
            hover.update(mug, &registry, &mut engine),
            vec![HoverTransition::Enter(ids[0])]
        );
        for _ in 0..5 {
            assert!(hover.update(mug, &registry, &mut engine).is_empty());
        }
        assert_eq!(hover.state(), HoverState::Hovering(ids[0]));
    }

    #[test]
    fn test_direct_switch_exits_before_enter() {
        let (_, registry, ids) = setup();
        let mut engine = TweenEngine::new();
        let mut hover = HoverMachine::default();

        hover.update(registry.object(ids[0]), &registry, &mut engine);
        let transitions = hover.update(registry.object(ids[3]), &registry, &mut engine);
        assert_eq!(
            transitions,
            vec![HoverTransition::Exit(ids[0]), HoverTransition::Enter(ids[3])]
        );
    }

    #[test]
    fn test_non_hoverable_hit_keeps_current_hover() {
        let (_, registry, ids) = setup();
        let mut engine = TweenEngine::new();
        let mut hover = HoverMachine::default();

        hover.update(registry.object(ids[0]), &registry, &mut engine);
        assert!(hover
            .update(registry.object(ids[4]), &registry, &mut engine)
            .is_empty());
        assert_eq!(hover.hovered(), Some(ids[0]));

        assert_eq!(
            hover.update(None, &registry, &mut engine),
            vec![HoverTransition::Exit(ids[0])]
        );
        assert_eq!(hover.state(), HoverState::Idle);
    }

    #[test]
    fn test_enter_and_exit_targets() {
        let (mut world, registry, ids) = setup();
        let mut engine = TweenEngine::new();
        let mut hover = HoverMachine::default();
        let profile = HoverProfile::default();

        // Generic object spins about y
        hover.update(registry.object(ids[3]), &registry, &mut engine);
        settle(&mut engine, &mut world);
        let lamp = world.scene.node(ids[3]).unwrap().transform;
        assert!((lamp.scale.x - 1.2).abs() < 1e-4);
        assert!((lamp.rotation.y - (0.75 + profile.spin_angle)).abs() < 1e-4);

        // Social icon spins about z
        hover.update(registry.object(ids[1]), &registry, &mut engine);
        settle(&mut engine, &mut world);
        let github = world.scene.node(ids[1]).unwrap().transform;
        assert!((github.rotation.z - profile.spin_angle).abs() < 1e-4);
        assert!((github.rotation.y - 0.25).abs() < 1e-4);

        // The lamp returned to exactly its initial values
        let lamp = world.scene.node(ids[3]).unwrap().transform;
        assert_eq!(lamp.scale, Vector3::new(1.0, 1.0, 1.0));
        assert!((lamp.rotation.y - 0.75).abs() < 1e-6);

        // Name letters lift instead of spinning
        hover.update(registry.object(ids[2]), &registry, &mut engine);
        settle(&mut engine, &mut world);
        let letter = world.scene.node(ids[2]).unwrap().transform;
        assert!((letter.position.y - profile.lift_distance).abs() < 1e-4);
        assert!((letter.rotation.y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_rapid_toggling_settles_on_last_request() {
        let (mut world, registry, ids) = setup();
        let mut engine = TweenEngine::new();
        let mut hover = HoverMachine::default();
        let mug = registry.object(ids[0]);

        for _ in 0..10 {
            hover.update(mug, &registry, &mut engine);
            engine.advance(0.05, &mut world);
            hover.update(None, &registry, &mut engine);
            engine.advance(0.05, &mut world);
        }
        // Exactly one tween per animated channel, never a backlog
        assert!(engine.active_count() <= 2);

        settle(&mut engine, &mut world);
        let scale = world.get(PropertyKey::node(ids[0], Channel::Scale)).unwrap();
        assert_eq!(scale, Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_random_pointer_sequences_hover_at_most_one() {
        let (mut world, registry, ids) = setup();
        let mut rng = StdRng::seed_from_u64(0x5eed);

        for _ in 0..20 {
            let mut engine = TweenEngine::new();
            let mut hover = HoverMachine::default();
            let mut entered = 0usize;
            let mut exited = 0usize;

            for _ in 0..200 {
                let hit = if rng.random_bool(0.25) {
                    None
                } else {
                    registry.object(ids[rng.random_range(0..ids.len())])
                };
                let before = hover.state();
                let transitions = hover.update(hit, &registry, &mut engine);

                assert!(transitions.len() <= 2);
                if transitions.len() == 2 {
                    assert!(matches!(transitions[0], HoverTransition::Exit(_)));
                    assert!(matches!(transitions[1], HoverTransition::Enter(_)));
                }
                for transition in &transitions {
                    match transition {
                        HoverTransition::Enter(node) => {
                            entered += 1;
                            assert_eq!(Some(*node), hit.map(|o| o.node));
                        }
                        HoverTransition::Exit(node) => {
                            exited += 1;
                            assert_eq!(before, HoverState::Hovering(*node));
                        }
                    }
                }
                // Net open hovers is zero or one at every step
                assert!(entered - exited <= 1);
                assert_eq!(entered - exited == 1, hover.hovered().is_some());

                engine.advance(rng.random_range(0.0..0.1), &mut world);
            }

            hover.update(None, &registry, &mut engine);
            settle(&mut engine, &mut world);
            for object in registry.objects() {
                let node = world.scene.node(object.node).unwrap();
                assert_eq!(node.transform.scale, object.initial.scale);
            }
        }
    }
}
