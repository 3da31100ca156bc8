use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// Ideal-range categories
//
// Each category resolves to exactly one fixed threshold ("level"). The
// mapping is an exhaustive `match`, so adding a variant without a level is a
// compile error.
// ---------------------------------------------------------------------------

/// Preferred light exposure.
///
/// Both variants currently share the level 800; they differ only in the
/// direction of the comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Lighting {
    BrightLight,
    Shade,
}

impl Lighting {
    pub const ALL: [Lighting; 2] = [Lighting::BrightLight, Lighting::Shade];

    pub const fn level(self) -> i64 {
        match self {
            Lighting::BrightLight | Lighting::Shade => 800,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Lighting::BrightLight => "Bright Light",
            Lighting::Shade => "Shade",
        }
    }
}

/// How dry the soil may get before the plant needs watering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Moisture {
    Dry,
    BoneDry,
}

impl Moisture {
    pub const ALL: [Moisture; 2] = [Moisture::Dry, Moisture::BoneDry];

    pub const fn level(self) -> i64 {
        match self {
            Moisture::Dry => 35,
            Moisture::BoneDry => 25,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Moisture::Dry => "Dry",
            Moisture::BoneDry => "Bone Dry",
        }
    }
}

/// Preferred relative air humidity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Humidity {
    Dry,
    Normal,
    Humid,
}

impl Humidity {
    pub const ALL: [Humidity; 3] = [Humidity::Dry, Humidity::Normal, Humidity::Humid];

    pub const fn level(self) -> i64 {
        match self {
            Humidity::Dry => 30,
            Humidity::Normal | Humidity::Humid => 50,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Humidity::Dry => "Dry",
            Humidity::Normal => "Normal",
            Humidity::Humid => "Humid",
        }
    }
}

/// Preferred ambient temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Temperature {
    Cold,
    Normal,
    Hot,
}

impl Temperature {
    pub const ALL: [Temperature; 3] = [Temperature::Cold, Temperature::Normal, Temperature::Hot];

    pub const fn level(self) -> i64 {
        match self {
            Temperature::Cold => 15,
            Temperature::Normal | Temperature::Hot => 25,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Temperature::Cold => "Cold",
            Temperature::Normal => "Normal",
            Temperature::Hot => "Hot",
        }
    }
}

macro_rules! display_label {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.label())
                }
            }
        )*
    };
}

display_label!(Lighting, Moisture, Humidity, Temperature);
