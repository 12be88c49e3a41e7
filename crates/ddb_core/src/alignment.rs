use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alignment {
    LawfulGood,
    NeutralGood,
    ChaoticGood,
    LawfulNeutral,
    TrueNeutral,
    ChaoticNeutral,
    LawfulEvil,
    NeutralEvil,
    ChaoticEvil,
}

impl Alignment {
    pub const ALL: [Alignment; 9] = [
        Self::LawfulGood,
        Self::NeutralGood,
        Self::ChaoticGood,
        Self::LawfulNeutral,
        Self::TrueNeutral,
        Self::ChaoticNeutral,
        Self::LawfulEvil,
        Self::NeutralEvil,
        Self::ChaoticEvil,
    ];

    pub fn from_id(id: i64) -> Option<Self> {
        match id {
            1 => Some(Self::LawfulGood),
            2 => Some(Self::NeutralGood),
            3 => Some(Self::ChaoticGood),
            4 => Some(Self::LawfulNeutral),
            5 => Some(Self::TrueNeutral),
            6 => Some(Self::ChaoticNeutral),
            7 => Some(Self::LawfulEvil),
            8 => Some(Self::NeutralEvil),
            9 => Some(Self::ChaoticEvil),
            _ => None,
        }
    }

    /// Two-letter code used by the host sheet.
    pub fn code(&self) -> &'static str {
        match *self {
            Self::LawfulGood => "lg",
            Self::NeutralGood => "ng",
            Self::ChaoticGood => "cg",
            Self::LawfulNeutral => "ln",
            Self::TrueNeutral => "tn",
            Self::ChaoticNeutral => "cn",
            Self::LawfulEvil => "le",
            Self::NeutralEvil => "ne",
            Self::ChaoticEvil => "ce",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::LawfulGood => "Lawful Good",
            Self::NeutralGood => "Neutral Good",
            Self::ChaoticGood => "Chaotic Good",
            Self::LawfulNeutral => "Lawful Neutral",
            Self::TrueNeutral => "True Neutral",
            Self::ChaoticNeutral => "Chaotic Neutral",
            Self::LawfulEvil => "Lawful Evil",
            Self::NeutralEvil => "Neutral Evil",
            Self::ChaoticEvil => "Chaotic Evil",
        }
    }

    /// Sheet code for an optional id; unknown or absent ids map to "".
    pub fn code_for(id: Option<i64>) -> &'static str {
        id.and_then(Self::from_id).map_or("", |a| a.code())
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
