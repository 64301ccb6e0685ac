//! Typed roles derived from node names.
//!
//! Room meshes encode their purpose in their names (`My_Work_Button_Hover_Pointer`,
//! `Keyboard_12`, ...). Registration runs each name through a [`RuleSet`] once and
//! everything downstream dispatches on the resulting [`Role`], never on the name.

use crate::world::PanelId;

/// Social and external-link icons on the shelf
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SocialIcon {
    GitHub,
    LinkedIn,
    Instagram,
    Boba,
}

impl SocialIcon {
    /// Key used in the `social_links` configuration table
    pub fn config_key(self) -> &'static str {
        match self {
            SocialIcon::GitHub => "github",
            SocialIcon::LinkedIn => "linkedin",
            SocialIcon::Instagram => "instagram",
            SocialIcon::Boba => "boba",
        }
    }
}

/// Single decorative props that occupy one named slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Prop {
    Coffee,
    Rug,
    FlowerBasket,
    Totoro,
    Calendar,
    Microphone,
    Slipper1,
    Slipper2,
    Headphones,
    TableLamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FanAxis {
    X,
    Y,
}

/// Semantic role of an interactive node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    NavButton(PanelId),
    Social(SocialIcon),
    Plank(u8),
    Prop(Prop),
    KeyboardKey,
    NameLetter,
    LightBulb,
    Frame,
    Flower,
    Pet,
    StorageBox,
    Plant,
    Sofa,
    Pillow,
    Fan(FanAxis),
    ChairTop,
    HourHand,
    MinuteHand,
}

/// Collection a role's nodes are gathered into, in registration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Group {
    NavButtons,
    SocialIcons,
    Planks,
    Props,
    KeyboardKeys,
    NameLetters,
    LightBulbs,
    Frames,
    Flowers,
    Pets,
    Boxes,
    Plants,
    Sofas,
    Pillows,
    XAxisFans,
    YAxisFans,
    Clock,
    Chair,
}

impl Role {
    pub fn group(self) -> Group {
        match self {
            Role::NavButton(_) => Group::NavButtons,
            Role::Social(_) => Group::SocialIcons,
            Role::Plank(_) => Group::Planks,
            Role::Prop(_) => Group::Props,
            Role::KeyboardKey => Group::KeyboardKeys,
            Role::NameLetter => Group::NameLetters,
            Role::LightBulb => Group::LightBulbs,
            Role::Frame => Group::Frames,
            Role::Flower => Group::Flowers,
            Role::Pet => Group::Pets,
            Role::StorageBox => Group::Boxes,
            Role::Plant => Group::Plants,
            Role::Sofa => Group::Sofas,
            Role::Pillow => Group::Pillows,
            Role::Fan(FanAxis::X) => Group::XAxisFans,
            Role::Fan(FanAxis::Y) => Group::YAxisFans,
            Role::HourHand | Role::MinuteHand => Group::Clock,
            Role::ChairTop => Group::Chair,
        }
    }

    /// Singular roles name one slot; a later match replaces an earlier one
    pub fn is_singular(self) -> bool {
        matches!(
            self,
            Role::NavButton(_)
                | Role::Social(_)
                | Role::Plank(_)
                | Role::Prop(_)
                | Role::ChairTop
                | Role::HourHand
                | Role::MinuteHand
        )
    }
}

/// Name predicate used by role rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameMatch {
    Contains(&'static str),
    StartsWith(&'static str),
    Exact(&'static str),
    AllOf(&'static [NameMatch]),
    AnyOf(&'static [NameMatch]),
}

impl NameMatch {
    pub fn matches(&self, name: &str) -> bool {
        match self {
            NameMatch::Contains(needle) => name.contains(needle),
            NameMatch::StartsWith(prefix) => name.starts_with(prefix),
            NameMatch::Exact(exact) => name == *exact,
            NameMatch::AllOf(all) => all.iter().all(|m| m.matches(name)),
            NameMatch::AnyOf(any) => any.iter().any(|m| m.matches(name)),
        }
    }
}

/// Assigns `role` to names matching `matcher`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoleRule {
    pub matcher: NameMatch,
    pub role: Role,
    /// Scale the node is collapsed to until the intro reveals it
    pub hidden_scale: Option<[f32; 3]>,
}

impl RoleRule {
    pub const fn new(matcher: NameMatch, role: Role) -> Self {
        Self {
            matcher,
            role,
            hidden_scale: None,
        }
    }

    /// Rule whose nodes start collapsed to zero scale
    pub const fn hidden(matcher: NameMatch, role: Role) -> Self {
        Self {
            matcher,
            role,
            hidden_scale: Some([0.0, 0.0, 0.0]),
        }
    }

    pub const fn hidden_at(matcher: NameMatch, role: Role, scale: [f32; 3]) -> Self {
        Self {
            matcher,
            role,
            hidden_scale: Some(scale),
        }
    }
}

/// Priority-ordered rules evaluated top to bottom; only the first match applies
#[derive(Debug, Clone, PartialEq)]
pub struct RuleChain {
    pub rules: Vec<RoleRule>,
}

impl RuleChain {
    pub fn first_match(&self, name: &str) -> Option<&RoleRule> {
        self.rules.iter().find(|rule| rule.matcher.matches(name))
    }
}

/// Independent chains; a name can pick up one role from each chain
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RuleSet {
    pub chains: Vec<RuleChain>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a chain of mutually exclusive rules
    pub fn exclusive(mut self, rules: impl IntoIterator<Item = RoleRule>) -> Self {
        self.chains.push(RuleChain {
            rules: rules.into_iter().collect(),
        });
        self
    }

    /// Adds a rule that is evaluated independently of every other rule
    pub fn independent(self, rule: RoleRule) -> Self {
        self.exclusive([rule])
    }

    /// Every rule that applies to `name`, in chain order
    pub fn classify(&self, name: &str) -> Vec<&RoleRule> {
        self.chains
            .iter()
            .filter_map(|chain| chain.first_match(name))
            .collect()
    }
}
