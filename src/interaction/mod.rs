//! Interaction core: registration, pointer and hover tracking, the panel
//! gate and the intro reveal.

pub mod actions;
pub mod ambient;
pub mod effects;
pub mod hover;
pub mod intro;
pub mod modal;
pub mod pointer;
pub mod registry;
pub mod roles;
pub mod variants;

pub use actions::{Action, ActionTable};
pub use ambient::AmbientAnimator;
pub use effects::{CursorStyle, RecordedEffects, ViewerEffects};
pub use hover::{HoverMachine, HoverProfile, HoverState, HoverTransition};
pub use intro::{IntroChoreographer, IntroPhase, IntroPlan};
pub use modal::{ModalGate, ModalState, ModalStyle};
pub use pointer::{InputSource, PointerTracker};
pub use registry::{InteractiveObject, OrderingPolicy, SceneRegistry, Tags};
pub use roles::{Group, Role, SocialIcon};
pub use variants::WorldVariant;
