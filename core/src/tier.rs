//! Case priority tiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declaration order is rank order: `Ord` on `Tier` is the priority
/// contract every ordered structure in the engine relies on.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    #[serde(rename = "MS")]
    MustSee,
    #[serde(rename = "P2.1")]
    P2_1,
    #[serde(rename = "P2.2")]
    P2_2,
    #[serde(rename = "P3")]
    P3,
    #[serde(rename = "trainee-led")]
    TraineeLed,
}

impl Tier {
    pub const ALL: [Tier; 5] = [
        Tier::MustSee,
        Tier::P2_1,
        Tier::P2_2,
        Tier::P3,
        Tier::TraineeLed,
    ];

    /// 1-based rank; lower is more urgent.
    pub fn rank(&self) -> u8 {
        match self {
            Tier::MustSee => 1,
            Tier::P2_1 => 2,
            Tier::P2_2 => 3,
            Tier::P3 => 4,
            Tier::TraineeLed => 5,
        }
    }

    pub fn is_p2(&self) -> bool {
        matches!(self, Tier::P2_1 | Tier::P2_2)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::MustSee => "MS",
            Tier::P2_1 => "P2.1",
            Tier::P2_2 => "P2.2",
            Tier::P3 => "P3",
            Tier::TraineeLed => "trainee-led",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
