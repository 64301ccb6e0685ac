//! Continuous per-frame motion: spinning fans, the swaying chair and the wall
//! clock.

use std::f32::consts::{PI, TAU};

use chrono::{NaiveTime, Timelike};

use super::{
    registry::SceneRegistry,
    roles::{Group, Role},
};
use crate::{gfx::scene::SceneGraph, world::World};

/// Radians a fan turns per frame
const FAN_STEP: f32 = 0.08;
/// Peak chair swing either side of rest
const CHAIR_AMPLITUDE: f32 = PI / 8.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct AmbientAnimator;

impl AmbientAnimator {
    pub fn new() -> Self {
        Self
    }

    /// `seconds` is the frame timestamp; `clock` the local wall time
    pub fn tick(
        &self,
        seconds: f64,
        clock: NaiveTime,
        registry: &SceneRegistry,
        world: &mut World,
    ) {
        let scene = &mut world.scene;
        spin_fans(registry, scene);
        sway_chair(registry, scene, seconds);
        set_clock_hands(registry, scene, clock);
    }
}

fn spin_fans(registry: &SceneRegistry, scene: &mut SceneGraph) {
    for &id in registry.group(Group::XAxisFans) {
        if let Some(node) = scene.node_mut(id) {
            node.transform.rotation.x += FAN_STEP;
        }
    }
    for &id in registry.group(Group::YAxisFans) {
        if let Some(node) = scene.node_mut(id) {
            node.transform.rotation.y += FAN_STEP;
        }
    }
}

/// Swing offset at `t` seconds; the amplitude breathes on a slower cycle
pub fn chair_offset(t: f64) -> f32 {
    let t = t as f32;
    CHAIR_AMPLITUDE * t.sin() * (1.0 - (t * 0.5).sin().abs() * 0.3)
}

fn sway_chair(registry: &SceneRegistry, scene: &mut SceneGraph, seconds: f64) {
    let Some(chair) = registry.slot(Role::ChairTop) else {
        return;
    };
    let Some(rest) = registry.object(chair).map(|object| object.initial.rotation.y) else {
        return;
    };
    if let Some(node) = scene.node_mut(chair) {
        node.transform.rotation.y = rest + chair_offset(seconds);
    }
}

/// Hour and minute hand angles in radians, clockwise from twelve
pub fn clock_angles(time: NaiveTime) -> (f32, f32) {
    let hours = (time.hour() % 12) as f32;
    let minutes = time.minute() as f32;
    let seconds = time.second() as f32;

    let minute = (minutes + seconds / 60.0) * (TAU / 60.0);
    let hour = (hours + minutes / 60.0) * (TAU / 12.0);
    (hour, minute)
}

fn set_clock_hands(registry: &SceneRegistry, scene: &mut SceneGraph, time: NaiveTime) {
    let (hour, minute) = clock_angles(time);
    for (role, angle) in [(Role::HourHand, hour), (Role::MinuteHand, minute)] {
        if let Some(node) = registry.slot(role).and_then(|id| scene.node_mut(id)) {
            node.transform.rotation.y = -angle;
        }
    }
}
