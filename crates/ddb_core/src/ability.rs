use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the six ability scores, keyed the way the host sheet stores them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ability {
    Str,
    Dex,
    Con,
    Int,
    Wis,
    Cha,
}

impl Ability {
    pub const ALL: [Ability; 6] = [
        Self::Str,
        Self::Dex,
        Self::Con,
        Self::Int,
        Self::Wis,
        Self::Cha,
    ];

    /// Maps a D&D Beyond stat id (1..=6) to its ability. Other ids have no ability.
    pub fn from_id(id: i64) -> Option<Self> {
        match id {
            1 => Some(Self::Str),
            2 => Some(Self::Dex),
            3 => Some(Self::Con),
            4 => Some(Self::Int),
            5 => Some(Self::Wis),
            6 => Some(Self::Cha),
            _ => None,
        }
    }

    pub fn id(&self) -> i64 {
        match *self {
            Self::Str => 1,
            Self::Dex => 2,
            Self::Con => 3,
            Self::Int => 4,
            Self::Wis => 5,
            Self::Cha => 6,
        }
    }

    pub fn key(&self) -> &'static str {
        match *self {
            Self::Str => "str",
            Self::Dex => "dex",
            Self::Con => "con",
            Self::Int => "int",
            Self::Wis => "wis",
            Self::Cha => "cha",
        }
    }

    pub fn label(&self) -> &'static str {
        match *self {
            Self::Str => "Strength",
            Self::Dex => "Dexterity",
            Self::Con => "Constitution",
            Self::Int => "Intelligence",
            Self::Wis => "Wisdom",
            Self::Cha => "Charisma",
        }
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
