//! Sequenced groups of tweens.
//!
//! A [`Timeline`] is an ordered list of entries. Each entry is either a
//! [`Stage`] (the same tween applied to several targets with a per-item
//! stagger) or a nested timeline. Entries are placed relative to the end of
//! the previous entry, so a negative offset makes consecutive groups overlap.
//! Playing a timeline compiles it into delayed tweens on the engine.

use super::{
    completion::Completion,
    ease::Ease,
    tween::{AxisTargets, PropertyKey, TweenEngine, TweenSpec},
};

/// Where an entry starts
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Position {
    /// Relative to the end of the previous entry; negative values overlap it
    AfterPrevious(f32),
    /// Absolute time from the start of the timeline
    At(f32),
}

impl Position {
    /// Starts exactly when the previous entry ends
    pub fn sequential() -> Self {
        Position::AfterPrevious(0.0)
    }

    /// Starts `seconds` before the previous entry ends
    pub fn overlap(seconds: f32) -> Self {
        Position::AfterPrevious(-seconds)
    }
}

/// One tween applied to a list of targets, staggered in list order
#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    pub label: String,
    pub targets: Vec<PropertyKey>,
    pub to: AxisTargets,
    pub duration: f32,
    pub ease: Ease,
    /// Delay between consecutive targets
    pub stagger: f32,
}

impl Stage {
    pub fn new(label: impl Into<String>, targets: Vec<PropertyKey>, to: AxisTargets) -> Self {
        Self {
            label: label.into(),
            targets,
            to,
            duration: 0.8,
            ease: Ease::BackOut(1.8),
            stagger: 0.0,
        }
    }

    pub fn duration(mut self, duration: f32) -> Self {
        self.duration = duration;
        self
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn stagger(mut self, stagger: f32) -> Self {
        self.stagger = stagger;
        self
    }

    /// Time from the first target starting to the last one finishing
    pub fn span(&self) -> f32 {
        if self.targets.is_empty() {
            return 0.0;
        }
        self.stagger * (self.targets.len() - 1) as f32 + self.duration
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Entry {
    Stage(Stage),
    Nested(Timeline),
}

impl Entry {
    /// Length in the parent's time units
    fn span(&self) -> f32 {
        match self {
            Entry::Stage(stage) => stage.span(),
            Entry::Nested(timeline) => timeline.duration(),
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            Entry::Stage(stage) => stage.targets.is_empty(),
            Entry::Nested(timeline) => timeline.is_empty(),
        }
    }
}

/// A tween scheduled at an absolute offset from the start of playback
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledTween {
    pub key: PropertyKey,
    pub spec: TweenSpec,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    entries: Vec<(Position, Entry)>,
    time_scale: f32,
}

impl Timeline {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            time_scale: 1.0,
        }
    }

    /// Playback speed multiplier; 0.8 plays at 80% speed
    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale.max(f32::EPSILON);
        self
    }

    /// Appends a stage. Stages without targets are skipped and do not move
    /// the placement cursor.
    pub fn add_stage(&mut self, stage: Stage, position: Position) -> &mut Self {
        let entry = Entry::Stage(stage);
        if !entry.is_empty() {
            self.entries.push((position, entry));
        }
        self
    }

    /// Appends a nested timeline, keeping its own time scale
    pub fn add_timeline(&mut self, timeline: Timeline, position: Position) -> &mut Self {
        let entry = Entry::Nested(timeline);
        if !entry.is_empty() {
            self.entries.push((position, entry));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Labels of all stages, depth-first in playback order
    pub fn stage_labels(&self) -> Vec<&str> {
        let mut labels = Vec::new();
        for (_, entry) in &self.entries {
            match entry {
                Entry::Stage(stage) => labels.push(stage.label.as_str()),
                Entry::Nested(timeline) => labels.extend(timeline.stage_labels()),
            }
        }
        labels
    }

    /// Start time of every entry in local (unscaled) time
    fn placements(&self) -> Vec<f32> {
        let mut starts = Vec::with_capacity(self.entries.len());
        let mut previous_end = 0.0_f32;

        for (position, entry) in &self.entries {
            let start = match *position {
                Position::AfterPrevious(offset) => (previous_end + offset).max(0.0),
                Position::At(at) => at.max(0.0),
            };
            starts.push(start);
            previous_end = start + entry.span();
        }
        starts
    }

    /// Total playback length in seconds, including this timeline's time scale
    pub fn duration(&self) -> f32 {
        let local_end = self
            .placements()
            .iter()
            .zip(&self.entries)
            .map(|(start, (_, entry))| start + entry.span())
            .fold(0.0_f32, f32::max);
        local_end / self.time_scale
    }

    /// Flattens the timeline into tweens with absolute delays
    pub fn schedule(&self) -> Vec<ScheduledTween> {
        let mut out = Vec::new();
        self.schedule_into(0.0, 1.0, &mut out);
        out
    }

    fn schedule_into(&self, offset: f32, parent_scale: f32, out: &mut Vec<ScheduledTween>) {
        let scale = parent_scale * self.time_scale;

        for (start, (_, entry)) in self.placements().into_iter().zip(&self.entries) {
            let entry_offset = offset + start / scale;
            match entry {
                Entry::Stage(stage) => {
                    for (i, key) in stage.targets.iter().enumerate() {
                        let delay = entry_offset + stage.stagger * i as f32 / scale;
                        out.push(ScheduledTween {
                            key: *key,
                            spec: TweenSpec::new(stage.to, stage.duration / scale, stage.ease)
                                .delayed(delay),
                        });
                    }
                }
                Entry::Nested(timeline) => timeline.schedule_into(entry_offset, scale, out),
            }
        }
    }

    /// Starts every tween on the engine, delayed by `delay` seconds.
    ///
    /// The returned signal follows the tween that ends last.
    pub fn play(&self, engine: &mut TweenEngine, delay: f32) -> Completion {
        let scheduled = self.schedule();

        let last = scheduled
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| {
                (a.spec.delay + a.spec.duration).total_cmp(&(b.spec.delay + b.spec.duration))
            })
            .map(|(i, _)| i);

        let mut completion = None;
        for (i, tween) in scheduled.into_iter().enumerate() {
            let done = engine.to(tween.key, tween.spec.delayed(tween.spec.delay + delay));
            if Some(i) == last {
                completion = Some(done);
            }
        }

        completion.unwrap_or_else(Completion::finished)
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::tween::Channel;
    use crate::gfx::scene::NodeId;

    fn keys(ids: &[usize]) -> Vec<PropertyKey> {
        ids.iter()
            .map(|&i| PropertyKey::node(NodeId(i), Channel::Scale))
            .collect()
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_stagger_follows_target_order() {
        let mut timeline = Timeline::new();
        timeline.add_stage(
            Stage::new("keys", keys(&[5, 6, 7]), AxisTargets::uniform(1.0))
                .duration(0.6)
                .stagger(0.03),
            Position::sequential(),
        );

        let scheduled = timeline.schedule();
        let delays: Vec<f32> = scheduled.iter().map(|t| t.spec.delay).collect();
        assert!(close(delays[0], 0.0));
        assert!(close(delays[1], 0.03));
        assert!(close(delays[2], 0.06));
        assert!(close(timeline.duration(), 0.66));
    }

    #[test]
    fn test_negative_offset_overlaps_previous_entry() {
        let mut timeline = Timeline::new();
        timeline
            .add_stage(
                Stage::new("a", keys(&[1]), AxisTargets::uniform(1.0)).duration(1.0),
                Position::sequential(),
            )
            .add_stage(
                Stage::new("b", keys(&[2]), AxisTargets::uniform(1.0)).duration(1.0),
                Position::overlap(0.3),
            );

        let scheduled = timeline.schedule();
        assert!(close(scheduled[1].spec.delay, 0.7));
        assert!(close(timeline.duration(), 1.7));
    }

    #[test]
    fn test_empty_stage_does_not_move_cursor() {
        let mut timeline = Timeline::new();
        timeline
            .add_stage(
                Stage::new("a", keys(&[1]), AxisTargets::uniform(1.0)).duration(1.0),
                Position::sequential(),
            )
            .add_stage(
                Stage::new("missing", Vec::new(), AxisTargets::uniform(1.0)),
                Position::overlap(0.5),
            )
            .add_stage(
                Stage::new("b", keys(&[2]), AxisTargets::uniform(1.0)).duration(1.0),
                Position::overlap(0.2),
            );

        assert_eq!(timeline.stage_labels(), vec!["a", "b"]);
        assert!(close(timeline.schedule()[1].spec.delay, 0.8));
    }

    #[test]
    fn test_time_scale_stretches_nested_timeline() {
        let mut inner = Timeline::new().with_time_scale(0.8);
        inner.add_stage(
            Stage::new("ui", keys(&[1, 2]), AxisTargets::uniform(1.0))
                .duration(0.8)
                .stagger(0.2),
            Position::sequential(),
        );

        let mut master = Timeline::new();
        master
            .add_stage(
                Stage::new("scene", keys(&[9]), AxisTargets::uniform(1.0)).duration(0.6),
                Position::sequential(),
            )
            .add_timeline(inner, Position::overlap(0.3));

        let scheduled = master.schedule();
        // Inner starts at 0.3, its stagger and duration run at 80% speed
        assert!(close(scheduled[1].spec.delay, 0.3));
        assert!(close(scheduled[2].spec.delay, 0.3 + 0.25));
        assert!(close(scheduled[2].spec.duration, 1.0));
        assert!(close(master.duration(), 0.3 + 1.25));
    }

    #[test]
    fn test_play_signals_after_last_tween() {
        use crate::animation::completion::CompletionState;
        use crate::animation::tween::PropertyStore;
        use cgmath::Vector3;
        use std::collections::HashMap;

        struct Store(HashMap<PropertyKey, Vector3<f32>>);
        impl PropertyStore for Store {
            fn get(&self, key: PropertyKey) -> Option<Vector3<f32>> {
                self.0.get(&key).copied()
            }
            fn set(&mut self, key: PropertyKey, value: Vector3<f32>) {
                self.0.insert(key, value);
            }
        }

        let mut store = Store(
            keys(&[1, 2])
                .into_iter()
                .map(|k| (k, Vector3::new(0.0, 0.0, 0.0)))
                .collect(),
        );
        let mut timeline = Timeline::new();
        timeline.add_stage(
            Stage::new("pair", keys(&[1, 2]), AxisTargets::uniform(1.0))
                .duration(0.5)
                .stagger(0.5),
            Position::sequential(),
        );

        let mut engine = TweenEngine::new();
        let mut done = timeline.play(&mut engine, 0.0);

        engine.advance(0.6, &mut store);
        assert_eq!(done.state(), CompletionState::Pending);
        engine.advance(0.5, &mut store);
        assert_eq!(done.state(), CompletionState::Finished);
        assert_eq!(store.0[&keys(&[2])[0]], Vector3::new(1.0, 1.0, 1.0));
    }
}
