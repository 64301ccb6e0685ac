//! One-shot intro reveal.
//!
//! An [`IntroPlan`] describes the reveal in terms of registry groups and
//! slots. Once the registry is populated the plan is resolved into a
//! [`Timeline`] of scale tweens, and the [`IntroChoreographer`] plays it a
//! single time after a short settle delay.

use crate::{
    animation::{
        completion::{Completion, CompletionState},
        ease::Ease,
        timeline::{Position, Stage, Timeline},
        tween::{AxisTargets, Channel, PropertyKey, TweenEngine},
    },
    gfx::scene::NodeId,
};

use super::{
    registry::SceneRegistry,
    roles::{Group, Role},
};

/// Which registry nodes a stage reveals
#[derive(Debug, Clone, PartialEq)]
pub enum IntroTargets {
    /// Every member of each group, groups in this order and members in the
    /// group's final order
    Groups(Vec<Group>),
    /// Singular slots in this order; missing slots are skipped
    Slots(Vec<Role>),
}

/// A staggered scale-in of one set of targets
#[derive(Debug, Clone, PartialEq)]
pub struct IntroStage {
    pub label: &'static str,
    pub targets: IntroTargets,
    pub position: Position,
    /// Falls back to the plan default
    pub duration: Option<f32>,
    /// Falls back to the plan default
    pub ease: Option<Ease>,
    pub stagger: f32,
}

impl IntroStage {
    pub fn group(label: &'static str, group: Group, position: Position) -> Self {
        Self {
            label,
            targets: IntroTargets::Groups(vec![group]),
            position,
            duration: None,
            ease: None,
            stagger: 0.0,
        }
    }

    pub fn groups(label: &'static str, groups: Vec<Group>, position: Position) -> Self {
        Self {
            label,
            targets: IntroTargets::Groups(groups),
            position,
            duration: None,
            ease: None,
            stagger: 0.0,
        }
    }

    pub fn slots(label: &'static str, roles: Vec<Role>, position: Position) -> Self {
        Self {
            label,
            targets: IntroTargets::Slots(roles),
            position,
            duration: None,
            ease: None,
            stagger: 0.0,
        }
    }

    pub fn duration(mut self, duration: f32) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = Some(ease);
        self
    }

    pub fn stagger(mut self, stagger: f32) -> Self {
        self.stagger = stagger;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum IntroStep {
    Stage(IntroStage),
    Nested(IntroPlan, Position),
}

/// Hand-tuned reveal sequence with per-plan defaults
#[derive(Debug, Clone, PartialEq)]
pub struct IntroPlan {
    pub time_scale: f32,
    pub duration: f32,
    pub ease: Ease,
    pub steps: Vec<IntroStep>,
}

impl IntroPlan {
    pub fn new(duration: f32, ease: Ease) -> Self {
        Self {
            time_scale: 1.0,
            duration,
            ease,
            steps: Vec::new(),
        }
    }

    pub fn time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale;
        self
    }

    pub fn stage(mut self, stage: IntroStage) -> Self {
        self.steps.push(IntroStep::Stage(stage));
        self
    }

    pub fn nested(mut self, plan: IntroPlan, position: Position) -> Self {
        self.steps.push(IntroStep::Nested(plan, position));
        self
    }

    /// Resolves groups and slots against the registry.
    ///
    /// Every target scales to (1, 1, 1). Stages whose targets are all missing
    /// drop out of the timeline without shifting the stages after them.
    pub fn build(&self, registry: &SceneRegistry) -> Timeline {
        let mut timeline = Timeline::new().with_time_scale(self.time_scale);

        for step in &self.steps {
            match step {
                IntroStep::Stage(stage) => {
                    let nodes: Vec<NodeId> = match &stage.targets {
                        IntroTargets::Groups(groups) => groups
                            .iter()
                            .flat_map(|group| registry.group(*group).iter().copied())
                            .collect(),
                        IntroTargets::Slots(roles) => roles
                            .iter()
                            .filter_map(|role| registry.slot(*role))
                            .collect(),
                    };
                    let targets: Vec<PropertyKey> = nodes
                        .into_iter()
                        .map(|node| PropertyKey::node(node, Channel::Scale))
                        .collect();

                    if targets.is_empty() {
                        log::debug!("Intro stage `{}` has no targets, skipping", stage.label);
                    }

                    timeline.add_stage(
                        Stage::new(stage.label, targets, AxisTargets::uniform(1.0))
                            .duration(stage.duration.unwrap_or(self.duration))
                            .ease(stage.ease.unwrap_or(self.ease))
                            .stagger(stage.stagger),
                        stage.position,
                    );
                }
                IntroStep::Nested(plan, position) => {
                    timeline.add_timeline(plan.build(registry), *position);
                }
            }
        }
        timeline
    }
}

/// Observable phase of the intro
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntroPhase {
    Idle,
    Scheduled,
    Running,
    Finished,
}

#[derive(Debug)]
enum IntroState {
    Idle,
    Scheduled { timeline: Timeline, remaining: f32 },
    Running(Completion),
    Finished,
}

/// Plays the intro at most once per session
#[derive(Debug)]
pub struct IntroChoreographer {
    state: IntroState,
}

impl Default for IntroChoreographer {
    fn default() -> Self {
        Self::new()
    }
}

impl IntroChoreographer {
    pub fn new() -> Self {
        Self {
            state: IntroState::Idle,
        }
    }

    pub fn phase(&self) -> IntroPhase {
        match self.state {
            IntroState::Idle => IntroPhase::Idle,
            IntroState::Scheduled { .. } => IntroPhase::Scheduled,
            IntroState::Running(_) => IntroPhase::Running,
            IntroState::Finished => IntroPhase::Finished,
        }
    }

    /// Queues `timeline` to start after `delay` seconds of ticks.
    ///
    /// Returns `false` and leaves everything untouched if an intro was
    /// already scheduled in this session.
    pub fn schedule(&mut self, timeline: Timeline, delay: f32) -> bool {
        if !matches!(self.state, IntroState::Idle) {
            log::warn!("Intro already {:?}, ignoring second request", self.phase());
            return false;
        }

        log::info!(
            "Intro scheduled in {delay:.2}s ({:.2}s long, stages: {})",
            timeline.duration(),
            timeline.stage_labels().join(", ")
        );
        self.state = IntroState::Scheduled {
            timeline,
            remaining: delay.max(0.0),
        };
        true
    }

    /// Counts down the settle delay, starts playback, and notices the end.
    pub fn tick(&mut self, dt: f32, engine: &mut TweenEngine) {
        match &mut self.state {
            IntroState::Scheduled { remaining, .. } => {
                *remaining -= dt;
                if *remaining > 0.0 {
                    return;
                }
                let IntroState::Scheduled { timeline, .. } =
                    std::mem::replace(&mut self.state, IntroState::Finished)
                else {
                    return;
                };
                let completion = timeline.play(engine, 0.0);
                log::info!("Intro started");
                self.state = IntroState::Running(completion);
            }
            IntroState::Running(completion) => match completion.state() {
                CompletionState::Pending => {}
                CompletionState::Finished => {
                    log::info!("Intro finished");
                    self.state = IntroState::Finished;
                }
                CompletionState::Cancelled => {
                    log::debug!("Intro interrupted by a later tween, marking finished");
                    self.state = IntroState::Finished;
                }
            },
            IntroState::Idle | IntroState::Finished => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        animation::tween::PropertyStore,
        gfx::{
            picking::AABB,
            scene::{NodeId, SceneGraph, Transform},
        },
        interaction::{
            registry::{GroupOrder, OrderingPolicy, RegistryPlan, TagMarkers},
            roles::{NameMatch, Prop, RoleRule, RuleSet},
        },
        world::World,
    };
    use cgmath::Vector3;

    fn populated(names: &[&str]) -> (World, SceneRegistry) {
        let mut scene = SceneGraph::new();
        for name in names {
            scene.add_node(
                NodeId::ROOT,
                *name,
                Transform::identity(),
                Some(AABB::new(Vector3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 1.0, 1.0))),
            );
        }
        let plan = RegistryPlan {
            markers: TagMarkers::default(),
            rules: RuleSet::new()
                .independent(RoleRule::hidden(NameMatch::StartsWith("Key_"), Role::KeyboardKey))
                .independent(RoleRule::hidden(
                    NameMatch::Contains("Coffee"),
                    Role::Prop(Prop::Coffee),
                )),
            orders: vec![(Group::KeyboardKeys, GroupOrder::NumericSuffix)],
        };
        let registry = SceneRegistry::populate(&mut scene, &plan, OrderingPolicy::Strict).unwrap();
        (World::new(scene), registry)
    }

    fn plan() -> IntroPlan {
        IntroPlan::new(0.8, Ease::BackOut(1.8))
            .stage(IntroStage::slots(
                "coffee",
                vec![Role::Prop(Prop::Coffee)],
                Position::sequential(),
            ))
            .stage(
                IntroStage::slots("rug", vec![Role::Prop(Prop::Rug)], Position::overlap(0.6)),
            )
            .stage(
                IntroStage::group("keys", Group::KeyboardKeys, Position::overlap(0.2))
                    .stagger(0.03)
                    .ease(Ease::BackOut(2.0)),
            )
    }

    #[test]
    fn test_missing_slots_drop_out() {
        let (_, registry) = populated(&["Coffee_Mug", "Key_2", "Key_1"]);
        let timeline = plan().build(&registry);

        assert_eq!(timeline.stage_labels(), vec!["coffee", "keys"]);
        let scheduled = timeline.schedule();
        // Keys overlap the coffee stage, not the missing rug
        assert!((scheduled[1].spec.delay - 0.6).abs() < 1e-4);
        assert_eq!(scheduled[1].spec.ease, Ease::BackOut(2.0));
    }

    #[test]
    fn test_runs_once_and_reveals_everything() {
        let (mut world, registry) = populated(&["Coffee_Mug", "Key_2", "Key_1"]);
        let mut engine = TweenEngine::new();
        let mut intro = IntroChoreographer::new();

        assert!(intro.schedule(plan().build(&registry), 0.1));
        assert!(!intro.schedule(plan().build(&registry), 0.1));

        intro.tick(0.05, &mut engine);
        assert_eq!(intro.phase(), IntroPhase::Scheduled);
        assert_eq!(engine.active_count(), 0);

        intro.tick(0.05, &mut engine);
        assert_eq!(intro.phase(), IntroPhase::Running);
        assert_eq!(engine.active_count(), 3);

        for _ in 0..200 {
            intro.tick(1.0 / 60.0, &mut engine);
            engine.advance(1.0 / 60.0, &mut world);
        }
        intro.tick(0.0, &mut engine);
        assert_eq!(intro.phase(), IntroPhase::Finished);

        for object in registry.objects() {
            let scale = world
                .get(PropertyKey::node(object.node, Channel::Scale))
                .unwrap();
            assert!((scale.x - 1.0).abs() < 1e-4, "{} not revealed", object.name);
            assert!((scale.y - 1.0).abs() < 1e-4 && (scale.z - 1.0).abs() < 1e-4);
        }

        // A finished intro is never restarted
        assert!(!intro.schedule(plan().build(&registry), 0.0));
    }
}
