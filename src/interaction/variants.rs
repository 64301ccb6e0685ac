//! Room layouts the viewer knows how to drive.
//!
//! Each variant is plain data: the name rules that turn mesh names into roles,
//! the order of the sorted groups, and the intro plan.

use super::{
    intro::{IntroPlan, IntroStage},
    registry::{GroupOrder, RegistryPlan, TagMarkers},
    roles::{FanAxis, Group, NameMatch, Prop, Role, RoleRule, RuleSet, SocialIcon},
};
use crate::{
    animation::{ease::Ease, timeline::Position},
    error::ConfigError,
    world::PanelId,
};

const NAV_PRIORITY: [Role; 3] = [
    Role::NavButton(PanelId::Work),
    Role::NavButton(PanelId::About),
    Role::NavButton(PanelId::Contact),
];

#[derive(Debug, Clone, PartialEq)]
pub struct WorldVariant {
    pub name: &'static str,
    pub registry: RegistryPlan,
    pub intro: IntroPlan,
}

impl WorldVariant {
    pub fn by_name(name: &str) -> Result<Self, ConfigError> {
        match name.to_ascii_lowercase().as_str() {
            "room" => Ok(Self::room()),
            "studio" => Ok(Self::studio()),
            _ => Err(ConfigError::UnknownVariant(name.to_string())),
        }
    }

    /// The hanging-plank room: planks, props, pets and light bulbs
    pub fn room() -> Self {
        use NameMatch::*;

        const NAV_BUTTON: NameMatch = AllOf(&[
            Contains("_Button"),
            AnyOf(&[Contains("My_Work"), Contains("About"), Contains("Contact")]),
        ]);
        const SECOND_FRAME: NameMatch = AllOf(&[StartsWith("Frame_"), Contains("_Second")]);
        const Y_FAN: NameMatch = AnyOf(&[Contains("4_"), Contains("5_")]);
        const WORK_BUTTON: NameMatch = AllOf(&[NAV_BUTTON, Contains("My_Work")]);
        const ABOUT_BUTTON: NameMatch = AllOf(&[NAV_BUTTON, Contains("About")]);
        const CONTACT_BUTTON: NameMatch = AllOf(&[NAV_BUTTON, Contains("Contact")]);
        const Y_AXIS_FAN: NameMatch = AllOf(&[Contains("Computer_Fan_"), Y_FAN]);

        let rules = RuleSet::new()
            .exclusive([
                RoleRule::hidden_at(Contains("Hanging_Plank_1"), Role::Plank(1), [0.0, 0.0, 1.0]),
                RoleRule::hidden(Contains("Hanging_Plank_2"), Role::Plank(2)),
            ])
            // Button names share one chain; the panel comes from the name
            .exclusive([
                RoleRule::hidden(WORK_BUTTON, Role::NavButton(PanelId::Work)),
                RoleRule::hidden(ABOUT_BUTTON, Role::NavButton(PanelId::About)),
                RoleRule::hidden(CONTACT_BUTTON, Role::NavButton(PanelId::Contact)),
            ])
            .exclusive([
                RoleRule::hidden(Contains("GitHub"), Role::Social(SocialIcon::GitHub)),
                RoleRule::hidden(Contains("LinkedIn"), Role::Social(SocialIcon::LinkedIn)),
                RoleRule::hidden(Contains("Instagram"), Role::Social(SocialIcon::Instagram)),
                RoleRule::hidden(Contains("Boba"), Role::Social(SocialIcon::Boba)),
            ])
            .independent(RoleRule::new(Contains("Basket"), Role::Prop(Prop::FlowerBasket)))
            .independent(RoleRule::hidden(Contains("Coffee"), Role::Prop(Prop::Coffee)))
            .independent(RoleRule::hidden(Contains("Totoro"), Role::Prop(Prop::Totoro)))
            .independent(RoleRule::hidden(Contains("Calender"), Role::Prop(Prop::Calendar)))
            .independent(RoleRule::hidden(
                Contains("Microphone"),
                Role::Prop(Prop::Microphone),
            ))
            .independent(RoleRule::hidden(SECOND_FRAME, Role::Frame))
            .independent(RoleRule::hidden(Contains("Slipper_1"), Role::Prop(Prop::Slipper1)))
            .independent(RoleRule::hidden(Contains("Slipper_2"), Role::Prop(Prop::Slipper2)))
            .independent(RoleRule::hidden(
                Contains("Headphones"),
                Role::Prop(Prop::Headphones),
            ))
            .independent(RoleRule::hidden(Contains("TableLamp"), Role::Prop(Prop::TableLamp)))
            .independent(RoleRule::hidden(Contains("Flower"), Role::Flower))
            .independent(RoleRule::hidden(Contains("MrRabbit_"), Role::Pet))
            .independent(RoleRule::hidden(StartsWith("Keyboard_"), Role::KeyboardKey))
            .independent(RoleRule::hidden(StartsWith("Box_"), Role::StorageBox))
            .independent(RoleRule::hidden(Contains("Bulb"), Role::LightBulb))
            .independent(RoleRule::hidden(Contains("Rug"), Role::Prop(Prop::Rug)))
            .exclusive([
                RoleRule::new(Y_AXIS_FAN, Role::Fan(FanAxis::Y)),
                RoleRule::new(Contains("Computer_Fan_"), Role::Fan(FanAxis::X)),
            ]);

        let intro = IntroPlan::new(0.8, Ease::BackOut(1.8))
            .time_scale(0.8)
            .stage(IntroStage::slots("plank 1", vec![Role::Plank(1)], Position::sequential()))
            .stage(IntroStage::slots("plank 2", vec![Role::Plank(2)], Position::overlap(0.5)))
            .stage(
                IntroStage::group("buttons", Group::NavButtons, Position::overlap(0.2))
                    .stagger(0.2)
                    .duration(0.9),
            )
            .stage(IntroStage::slots(
                "coffee",
                vec![Role::Prop(Prop::Coffee)],
                Position::overlap(0.6),
            ))
            .stage(IntroStage::slots("rug", vec![Role::Prop(Prop::Rug)], Position::overlap(0.6)))
            .stage(
                IntroStage::group("icons", Group::SocialIcons, Position::overlap(0.1))
                    .stagger(0.25)
                    .duration(0.7)
                    .ease(Ease::BackOut(1.6)),
            )
            .stage(
                IntroStage::group("frames", Group::Frames, Position::overlap(0.2))
                    .stagger(0.1)
                    .ease(Ease::BackOut(2.0)),
            )
            .stage(
                IntroStage::slots(
                    "props",
                    vec![
                        Role::Prop(Prop::Slipper1),
                        Role::Prop(Prop::Slipper2),
                        Role::Prop(Prop::Headphones),
                        Role::Prop(Prop::TableLamp),
                        Role::Prop(Prop::Totoro),
                        Role::Prop(Prop::Microphone),
                        Role::Prop(Prop::Calendar),
                    ],
                    Position::overlap(0.3),
                )
                .stagger(0.1),
            )
            .stage(
                IntroStage::group("keyboard", Group::KeyboardKeys, Position::overlap(0.2))
                    .stagger(0.03)
                    .ease(Ease::BackOut(2.0)),
            )
            .stage(
                IntroStage::group("boxes", Group::Boxes, Position::sequential())
                    .stagger(0.03)
                    .ease(Ease::BackOut(2.0)),
            )
            .stage(
                IntroStage::group("flowers", Group::Flowers, Position::sequential())
                    .stagger(0.03)
                    .ease(Ease::BackOut(2.0)),
            )
            .stage(
                IntroStage::group("pets", Group::Pets, Position::sequential())
                    .stagger(0.03)
                    .ease(Ease::BackOut(2.0)),
            )
            .stage(
                IntroStage::group("light bulbs", Group::LightBulbs, Position::overlap(0.05))
                    .stagger(0.08)
                    .duration(0.6)
                    .ease(Ease::BackOut(2.0)),
            );

        Self {
            name: "room",
            registry: RegistryPlan {
                markers: TagMarkers::default(),
                rules,
                orders: vec![
                    (Group::KeyboardKeys, GroupOrder::NumericSuffix),
                    (Group::NavButtons, GroupOrder::Priority(NAV_PRIORITY.to_vec())),
                    (Group::LightBulbs, GroupOrder::NumericSuffix),
                ],
            },
            intro,
        }
    }

    /// The studio: sofa, plants, name letters and a swivel chair
    pub fn studio() -> Self {
        use NameMatch::*;

        const LOW_FAN: NameMatch = AnyOf(&[Contains("1"), Contains("2"), Contains("3")]);
        const X_AXIS_FAN: NameMatch = AllOf(&[Contains("FAN"), LOW_FAN]);

        let rules = RuleSet::new()
            .exclusive([
                RoleRule::hidden(Contains("My_Work_Button"), Role::NavButton(PanelId::Work)),
                RoleRule::hidden(Contains("About_Button"), Role::NavButton(PanelId::About)),
                RoleRule::hidden(Contains("Contact_Button"), Role::NavButton(PanelId::Contact)),
                RoleRule::hidden(Contains("GitHub"), Role::Social(SocialIcon::GitHub)),
                RoleRule::hidden(Contains("LinkedIn"), Role::Social(SocialIcon::LinkedIn)),
                RoleRule::hidden(Contains("Instagram"), Role::Social(SocialIcon::Instagram)),
                RoleRule::hidden(Contains("Keycaps"), Role::KeyboardKey),
            ])
            .independent(RoleRule::new(Contains("Chair_Top"), Role::ChairTop))
            .independent(RoleRule::new(Contains("Hour_Hand"), Role::HourHand))
            .independent(RoleRule::new(Contains("minute_Hand"), Role::MinuteHand))
            .independent(RoleRule::hidden(Contains("Name_Letter"), Role::NameLetter))
            .independent(RoleRule::hidden(Contains("Plant"), Role::Plant))
            .independent(RoleRule::hidden(Contains("Sofa"), Role::Sofa))
            .independent(RoleRule::hidden(Contains("Pillow"), Role::Pillow))
            .independent(RoleRule::hidden(Contains("Frame"), Role::Frame))
            .exclusive([
                RoleRule::new(X_AXIS_FAN, Role::Fan(FanAxis::X)),
                RoleRule::new(Contains("FAN"), Role::Fan(FanAxis::Y)),
            ]);

        let buttons = IntroPlan::new(0.8, Ease::BackOut(1.8)).time_scale(0.8).stage(
            IntroStage::group("buttons", Group::NavButtons, Position::sequential()).stagger(0.2),
        );
        let socials = IntroPlan::new(0.8, Ease::BackOut(1.8)).stage(
            IntroStage::slots(
                "socials",
                vec![
                    Role::Social(SocialIcon::GitHub),
                    Role::Social(SocialIcon::LinkedIn),
                    Role::Social(SocialIcon::Instagram),
                ],
                Position::sequential(),
            )
            .stagger(0.2),
        );
        let keyboard = IntroPlan::new(0.6, Ease::BackOut(2.0)).stage(
            IntroStage::group("keyboard", Group::KeyboardKeys, Position::sequential())
                .stagger(0.03),
        );
        let name = IntroPlan::new(0.6, Ease::BackOut(2.0)).stage(
            IntroStage::group("name", Group::NameLetters, Position::sequential()).stagger(0.1),
        );
        let scenery = IntroPlan::new(0.6, Ease::BackOut(2.0)).stage(
            IntroStage::groups(
                "scenery",
                vec![Group::Plants, Group::Sofas, Group::Pillows, Group::Frames],
                Position::sequential(),
            )
            .stagger(0.06),
        );

        let intro = IntroPlan::new(0.6, Ease::BackOut(2.0))
            .nested(scenery, Position::sequential())
            .nested(buttons, Position::overlap(0.3))
            .nested(socials, Position::overlap(0.3))
            .nested(keyboard, Position::overlap(0.2))
            .nested(name, Position::overlap(0.4));

        Self {
            name: "studio",
            registry: RegistryPlan {
                markers: TagMarkers::default(),
                rules,
                orders: vec![
                    (Group::KeyboardKeys, GroupOrder::NumericSuffix),
                    (Group::NavButtons, GroupOrder::Priority(NAV_PRIORITY.to_vec())),
                ],
            },
            intro,
        }
    }
}
