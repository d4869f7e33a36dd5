//! Category taxonomy
//!
//! The closed set of equipment categories a listing may belong to, each
//! mapped to a display label and to exactly one of seven groups. This is
//! static reference data; the enums are the lookup table.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// The seven top-level category groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryGroup {
    /// Photography & Videography
    PhotographyVideography,

    /// Sports & Fitness
    SportsFitness,

    /// Outdoor & Camping
    OutdoorCamping,

    /// Audio & Entertainment
    AudioEntertainment,

    /// Electronics & Gadgets
    ElectronicsGadgets,

    /// Event & Party
    EventParty,

    /// Tools & Equipment
    ToolsEquipment,
}

impl CategoryGroup {
    /// Every group, in display order.
    pub const ALL: [CategoryGroup; 7] = [
        CategoryGroup::PhotographyVideography,
        CategoryGroup::SportsFitness,
        CategoryGroup::OutdoorCamping,
        CategoryGroup::AudioEntertainment,
        CategoryGroup::ElectronicsGadgets,
        CategoryGroup::EventParty,
        CategoryGroup::ToolsEquipment,
    ];

    /// Human-readable group name.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            CategoryGroup::PhotographyVideography => "Photography & Videography",
            CategoryGroup::SportsFitness => "Sports & Fitness",
            CategoryGroup::OutdoorCamping => "Outdoor & Camping",
            CategoryGroup::AudioEntertainment => "Audio & Entertainment",
            CategoryGroup::ElectronicsGadgets => "Electronics & Gadgets",
            CategoryGroup::EventParty => "Event & Party",
            CategoryGroup::ToolsEquipment => "Tools & Equipment",
        }
    }

    /// The categories belonging to this group.
    #[must_use]
    pub fn categories(self) -> &'static [Category] {
        match self {
            CategoryGroup::PhotographyVideography => &[
                Category::Camera,
                Category::Gimbal,
                Category::Lighting,
                Category::VideoAcc,
                Category::Microphone,
                Category::StudioEquip,
            ],
            CategoryGroup::SportsFitness => &[
                Category::Bicycle,
                Category::SafetyGear,
                Category::Cricket,
                Category::Football,
                Category::Basketball,
                Category::Tennis,
                Category::GymEquip,
            ],
            CategoryGroup::OutdoorCamping => &[
                Category::Tent,
                Category::SleepingBag,
                Category::CampFurniture,
                Category::HikingGear,
                Category::CampStove,
                Category::Cooler,
                Category::Bag,
            ],
            CategoryGroup::AudioEntertainment => &[
                Category::Speaker,
                Category::DjEquip,
                Category::MusicalInst,
                Category::Karaoke,
                Category::PartyLights,
                Category::Projector,
            ],
            CategoryGroup::ElectronicsGadgets => {
                &[Category::Drone, Category::PowerBank, Category::Laptop]
            }
            CategoryGroup::EventParty => &[
                Category::PartyFurniture,
                Category::Decorations,
                Category::Grill,
                Category::Stage,
            ],
            CategoryGroup::ToolsEquipment => &[
                Category::PowerTool,
                Category::HandTool,
                Category::GardenTool,
                Category::Ladder,
                Category::PaintSprayer,
            ],
        }
    }
}

impl fmt::Display for CategoryGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Equipment category of a listing.
///
/// Codes (the serialized form) match the marketplace's category
/// reference data; unknown codes never fall back to a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Camera
    Camera,
    /// Gimbal
    Gimbal,
    /// Lighting Equipment
    Lighting,
    /// Video Accessories
    VideoAcc,
    /// Microphone
    Microphone,
    /// Studio Equipment
    StudioEquip,
    /// Bicycle
    Bicycle,
    /// Helmets & Safety Gear
    SafetyGear,
    /// Cricket Equipment
    Cricket,
    /// Football & Soccer Equipment
    Football,
    /// Basketball Equipment
    Basketball,
    /// Tennis Equipment
    Tennis,
    /// Gym Equipment
    GymEquip,
    /// Tent
    Tent,
    /// Sleeping Bag
    SleepingBag,
    /// Camping Furniture
    CampFurniture,
    /// Hiking Gear
    HikingGear,
    /// Portable Stove
    CampStove,
    /// Cooler
    Cooler,
    /// Bag
    Bag,
    /// Speaker
    Speaker,
    /// DJ Equipment
    DjEquip,
    /// Musical Instruments
    MusicalInst,
    /// Karaoke Systems
    Karaoke,
    /// Party Lights
    PartyLights,
    /// Projector
    Projector,
    /// Drone
    Drone,
    /// Power Bank
    PowerBank,
    /// Laptop
    Laptop,
    /// Tables & Chairs
    PartyFurniture,
    /// Decorations
    Decorations,
    /// Grills & BBQ Equipment
    Grill,
    /// Portable Stage
    Stage,
    /// Power Tools
    PowerTool,
    /// Hand Tools
    HandTool,
    /// Gardening Equipment
    GardenTool,
    /// Ladder
    Ladder,
    /// Paint Sprayer
    PaintSprayer,
}

impl Category {
    /// Every category, grouped in display order.
    pub const ALL: [Category; 38] = [
        Category::Camera,
        Category::Gimbal,
        Category::Lighting,
        Category::VideoAcc,
        Category::Microphone,
        Category::StudioEquip,
        Category::Bicycle,
        Category::SafetyGear,
        Category::Cricket,
        Category::Football,
        Category::Basketball,
        Category::Tennis,
        Category::GymEquip,
        Category::Tent,
        Category::SleepingBag,
        Category::CampFurniture,
        Category::HikingGear,
        Category::CampStove,
        Category::Cooler,
        Category::Bag,
        Category::Speaker,
        Category::DjEquip,
        Category::MusicalInst,
        Category::Karaoke,
        Category::PartyLights,
        Category::Projector,
        Category::Drone,
        Category::PowerBank,
        Category::Laptop,
        Category::PartyFurniture,
        Category::Decorations,
        Category::Grill,
        Category::Stage,
        Category::PowerTool,
        Category::HandTool,
        Category::GardenTool,
        Category::Ladder,
        Category::PaintSprayer,
    ];

    /// Stable category code, the form stored and exchanged with collaborators.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Category::Camera => "camera",
            Category::Gimbal => "gimbal",
            Category::Lighting => "lighting",
            Category::VideoAcc => "video_acc",
            Category::Microphone => "microphone",
            Category::StudioEquip => "studio_equip",
            Category::Bicycle => "bicycle",
            Category::SafetyGear => "safety_gear",
            Category::Cricket => "cricket",
            Category::Football => "football",
            Category::Basketball => "basketball",
            Category::Tennis => "tennis",
            Category::GymEquip => "gym_equip",
            Category::Tent => "tent",
            Category::SleepingBag => "sleeping_bag",
            Category::CampFurniture => "camp_furniture",
            Category::HikingGear => "hiking_gear",
            Category::CampStove => "camp_stove",
            Category::Cooler => "cooler",
            Category::Bag => "bag",
            Category::Speaker => "speaker",
            Category::DjEquip => "dj_equip",
            Category::MusicalInst => "musical_inst",
            Category::Karaoke => "karaoke",
            Category::PartyLights => "party_lights",
            Category::Projector => "projector",
            Category::Drone => "drone",
            Category::PowerBank => "power_bank",
            Category::Laptop => "laptop",
            Category::PartyFurniture => "party_furniture",
            Category::Decorations => "decorations",
            Category::Grill => "grill",
            Category::Stage => "stage",
            Category::PowerTool => "power_tool",
            Category::HandTool => "hand_tool",
            Category::GardenTool => "garden_tool",
            Category::Ladder => "ladder",
            Category::PaintSprayer => "paint_sprayer",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Category::Camera => "Camera",
            Category::Gimbal => "Gimbal",
            Category::Lighting => "Lighting Equipment",
            Category::VideoAcc => "Video Accessories",
            Category::Microphone => "Microphone",
            Category::StudioEquip => "Studio Equipment",
            Category::Bicycle => "Bicycle",
            Category::SafetyGear => "Helmets & Safety Gear",
            Category::Cricket => "Cricket Equipment",
            Category::Football => "Football & Soccer Equipment",
            Category::Basketball => "Basketball Equipment",
            Category::Tennis => "Tennis Equipment",
            Category::GymEquip => "Gym Equipment",
            Category::Tent => "Tent",
            Category::SleepingBag => "Sleeping Bag",
            Category::CampFurniture => "Camping Furniture",
            Category::HikingGear => "Hiking Gear",
            Category::CampStove => "Portable Stove",
            Category::Cooler => "Cooler",
            Category::Bag => "Bag",
            Category::Speaker => "Speaker",
            Category::DjEquip => "DJ Equipment",
            Category::MusicalInst => "Musical Instruments",
            Category::Karaoke => "Karaoke Systems",
            Category::PartyLights => "Party Lights",
            Category::Projector => "Projector",
            Category::Drone => "Drone",
            Category::PowerBank => "Power Bank",
            Category::Laptop => "Laptop",
            Category::PartyFurniture => "Tables & Chairs",
            Category::Decorations => "Decorations",
            Category::Grill => "Grills & BBQ Equipment",
            Category::Stage => "Portable Stage",
            Category::PowerTool => "Power Tools",
            Category::HandTool => "Hand Tools",
            Category::GardenTool => "Gardening Equipment",
            Category::Ladder => "Ladder",
            Category::PaintSprayer => "Paint Sprayer",
        }
    }

    /// The group this category belongs to.
    #[must_use]
    pub fn group(self) -> CategoryGroup {
        match self {
            Category::Camera
            | Category::Gimbal
            | Category::Lighting
            | Category::VideoAcc
            | Category::Microphone
            | Category::StudioEquip => CategoryGroup::PhotographyVideography,
            Category::Bicycle
            | Category::SafetyGear
            | Category::Cricket
            | Category::Football
            | Category::Basketball
            | Category::Tennis
            | Category::GymEquip => CategoryGroup::SportsFitness,
            Category::Tent
            | Category::SleepingBag
            | Category::CampFurniture
            | Category::HikingGear
            | Category::CampStove
            | Category::Cooler
            | Category::Bag => CategoryGroup::OutdoorCamping,
            Category::Speaker
            | Category::DjEquip
            | Category::MusicalInst
            | Category::Karaoke
            | Category::PartyLights
            | Category::Projector => CategoryGroup::AudioEntertainment,
            Category::Drone | Category::PowerBank | Category::Laptop => {
                CategoryGroup::ElectronicsGadgets
            }
            Category::PartyFurniture
            | Category::Decorations
            | Category::Grill
            | Category::Stage => CategoryGroup::EventParty,
            Category::PowerTool
            | Category::HandTool
            | Category::GardenTool
            | Category::Ladder
            | Category::PaintSprayer => CategoryGroup::ToolsEquipment,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|category| category.code() == s)
            .ok_or_else(|| ValidationError::UnknownCategory(s.to_string()))
    }
}
