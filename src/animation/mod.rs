//! Frame-driven tweening: easing curves, the tween engine, timelines and
//! their completion signals.

pub mod completion;
pub mod ease;
pub mod timeline;
pub mod tween;

pub use completion::{Completion, CompletionState};
pub use ease::Ease;
pub use timeline::{Position, Stage, Timeline};
pub use tween::{AxisTargets, Channel, PropertyKey, PropertyStore, Target, TweenEngine, TweenSpec};
