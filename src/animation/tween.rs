//! Property tweens advanced by the frame loop.
//!
//! The engine owns every running tween. Each tween drives one
//! [`PropertyKey`] (a channel of a node, the overlay, or a panel) from the
//! value it finds when its delay elapses toward a per-axis target. Starting a
//! tween on a key that is already animating cancels the old tween first, so
//! the most recent request always decides the final resting value.

use cgmath::Vector3;

use super::{
    completion::{Completion, CompletionSender},
    ease::Ease,
};
use crate::{gfx::scene::NodeId, world::PanelId};

/// What a tween animates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Node(NodeId),
    Overlay,
    Panel(PanelId),
}

/// Which property of the target is animated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Position,
    Rotation,
    Scale,
    /// Scalar channel, carried in every lane of the vector
    Opacity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropertyKey {
    pub target: Target,
    pub channel: Channel,
}

impl PropertyKey {
    pub fn new(target: Target, channel: Channel) -> Self {
        Self { target, channel }
    }

    pub fn node(node: NodeId, channel: Channel) -> Self {
        Self::new(Target::Node(node), channel)
    }
}

/// Readable and writable animated properties.
///
/// Returns `None` for keys whose target does not exist; tweens on such keys
/// are dropped when they would start.
pub trait PropertyStore {
    fn get(&self, key: PropertyKey) -> Option<Vector3<f32>>;
    fn set(&mut self, key: PropertyKey, value: Vector3<f32>);
}

/// Per-axis destination of a tween. Axes left as `None` are not touched.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisTargets {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub z: Option<f32>,
}

impl AxisTargets {
    pub fn all(value: Vector3<f32>) -> Self {
        Self {
            x: Some(value.x),
            y: Some(value.y),
            z: Some(value.z),
        }
    }

    pub fn uniform(value: f32) -> Self {
        Self::all(Vector3::new(value, value, value))
    }

    pub fn only_x(value: f32) -> Self {
        Self {
            x: Some(value),
            ..Self::default()
        }
    }

    pub fn only_y(value: f32) -> Self {
        Self {
            y: Some(value),
            ..Self::default()
        }
    }

    pub fn only_z(value: f32) -> Self {
        Self {
            z: Some(value),
            ..Self::default()
        }
    }

    /// Interpolate from `from` toward the targets; untouched axes keep `current`
    fn interpolate(&self, from: Vector3<f32>, current: Vector3<f32>, eased: f32) -> Vector3<f32> {
        let lane = |target: Option<f32>, start: f32, now: f32| match target {
            Some(end) => start + (end - start) * eased,
            None => now,
        };
        Vector3::new(
            lane(self.x, from.x, current.x),
            lane(self.y, from.y, current.y),
            lane(self.z, from.z, current.z),
        )
    }

    /// Exact final value; untouched axes keep `current`
    fn settle(&self, current: Vector3<f32>) -> Vector3<f32> {
        Vector3::new(
            self.x.unwrap_or(current.x),
            self.y.unwrap_or(current.y),
            self.z.unwrap_or(current.z),
        )
    }
}

/// Parameters of a single tween request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenSpec {
    pub to: AxisTargets,
    /// Seconds
    pub duration: f32,
    /// Seconds to wait before capturing the start value
    pub delay: f32,
    pub ease: Ease,
}

impl TweenSpec {
    pub fn new(to: AxisTargets, duration: f32, ease: Ease) -> Self {
        Self {
            to,
            duration,
            delay: 0.0,
            ease,
        }
    }

    pub fn delayed(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TweenId(u64);

#[derive(Debug)]
struct Tween {
    id: TweenId,
    key: PropertyKey,
    spec: TweenSpec,
    /// Engine time at which the delay elapses
    starts_at: f64,
    from: Option<Vector3<f32>>,
    done: Option<CompletionSender>,
}

/// Frame-driven tween scheduler
#[derive(Debug, Default)]
pub struct TweenEngine {
    tweens: Vec<Tween>,
    next_id: u64,
    elapsed: f64,
}

impl TweenEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds advanced so far
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Starts a tween on `key`, cancelling whatever was animating it.
    ///
    /// The returned signal finishes when the tween reaches its target and is
    /// cancelled if a later request on the same key replaces it.
    pub fn to(&mut self, key: PropertyKey, spec: TweenSpec) -> Completion {
        self.kill_tweens_of(key);

        let (sender, completion) = Completion::channel();
        let id = TweenId(self.next_id);
        self.next_id += 1;

        self.tweens.push(Tween {
            id,
            key,
            spec,
            starts_at: self.elapsed + f64::from(spec.delay.max(0.0)),
            from: None,
            done: Some(sender),
        });
        completion
    }

    /// Cancels every tween on `key` and returns how many were dropped
    pub fn kill_tweens_of(&mut self, key: PropertyKey) -> usize {
        let before = self.tweens.len();
        // Dropping the sender resolves the completion as cancelled
        self.tweens.retain(|tween| tween.key != key);
        before - self.tweens.len()
    }

    /// Cancels tweens on every channel of `target`
    pub fn kill_target(&mut self, target: Target) -> usize {
        let before = self.tweens.len();
        self.tweens.retain(|tween| tween.key.target != target);
        before - self.tweens.len()
    }

    /// Assigns a value immediately, without touching running tweens
    pub fn set(&mut self, store: &mut impl PropertyStore, key: PropertyKey, value: Vector3<f32>) {
        store.set(key, value);
    }

    pub fn is_animating(&self, key: PropertyKey) -> bool {
        self.tweens.iter().any(|tween| tween.key == key)
    }

    pub fn active_count(&self) -> usize {
        self.tweens.len()
    }

    /// Advances time by `dt` seconds and writes interpolated values into `store`.
    ///
    /// Tweens are stepped in the order they were started. Completion signals
    /// fire after the final value has been written.
    pub fn advance(&mut self, dt: f32, store: &mut impl PropertyStore) {
        self.elapsed += f64::from(dt.max(0.0));
        let now = self.elapsed;

        let mut finished: Vec<TweenId> = Vec::new();
        let mut orphaned: Vec<TweenId> = Vec::new();

        for tween in &mut self.tweens {
            if now < tween.starts_at {
                continue;
            }

            let Some(current) = store.get(tween.key) else {
                orphaned.push(tween.id);
                continue;
            };
            let from = *tween.from.get_or_insert(current);

            let progress = if tween.spec.duration <= 0.0 {
                1.0
            } else {
                ((now - tween.starts_at) / f64::from(tween.spec.duration)).min(1.0) as f32
            };

            let value = if progress >= 1.0 {
                tween.spec.to.settle(current)
            } else {
                tween
                    .spec
                    .to
                    .interpolate(from, current, tween.spec.ease.apply(progress))
            };
            store.set(tween.key, value);

            if progress >= 1.0 {
                finished.push(tween.id);
            }
        }

        if !orphaned.is_empty() {
            log::debug!("Dropping {} tweens whose target is missing", orphaned.len());
            self.tweens.retain(|tween| !orphaned.contains(&tween.id));
        }

        if !finished.is_empty() {
            let (done, running): (Vec<Tween>, Vec<Tween>) = std::mem::take(&mut self.tweens)
                .into_iter()
                .partition(|tween| finished.contains(&tween.id));
            self.tweens = running;

            for mut tween in done {
                if let Some(sender) = tween.done.take() {
                    sender.finish();
                }
            }
        }
    }
}
