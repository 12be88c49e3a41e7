//! The subset of a D&D Beyond character document that the importer reads.
//!
//! Every field is optional and `null` is treated the same as an absent field.
//! The extension emits many more keys than are listed here; they are ignored.
//!
//! Numbers are read leniently: `15.0` is accepted as 15, a fractional value is
//! truncated toward zero, and a value outside the `i32` range saturates. Ids
//! only match when they are whole numbers.

use serde::{Deserialize, Deserializer};
use serde_json::Number;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SourceCharacter {
    pub name: Option<String>,
    pub stats: Option<Vec<SourceStat>>,
    #[serde(deserialize_with = "lenient_i32")]
    pub base_hit_points: Option<i32>,
    #[serde(deserialize_with = "lenient_i32")]
    pub bonus_hit_points: Option<i32>,
    #[serde(deserialize_with = "lenient_i32")]
    pub removed_hit_points: Option<i32>,
    #[serde(deserialize_with = "lenient_i32")]
    pub temporary_hit_points: Option<i32>,
    #[serde(deserialize_with = "lenient_i32")]
    pub armor_class: Option<i32>,
    pub speed: Option<SourceSpeed>,
    pub classes: Option<Vec<SourceClass>>,
    pub race: Option<SourceRace>,
    pub background: Option<SourceBackground>,
    #[serde(deserialize_with = "whole_id")]
    pub alignment_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SourceStat {
    #[serde(deserialize_with = "whole_id")]
    pub id: Option<i64>,
    #[serde(deserialize_with = "lenient_i32")]
    pub value: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SourceSpeed {
    #[serde(deserialize_with = "lenient_i32")]
    pub walk: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SourceClass {
    #[serde(deserialize_with = "lenient_i32")]
    pub level: Option<i32>,
    pub definition: Option<SourceDefinition>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SourceDefinition {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SourceRace {
    pub full_name: Option<String>,
    pub size: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SourceBackground {
    pub definition: Option<SourceDefinition>,
}

impl SourceCharacter {
    pub fn stats(&self) -> &[SourceStat] {
        self.stats.as_deref().unwrap_or_default()
    }

    pub fn classes(&self) -> &[SourceClass] {
        self.classes.as_deref().unwrap_or_default()
    }

    pub fn walk_speed(&self) -> Option<i32> {
        self.speed.as_ref().and_then(|s| s.walk)
    }

    pub fn race_name(&self) -> Option<&str> {
        self.race.as_ref().and_then(|r| r.full_name.as_deref())
    }

    pub fn race_size(&self) -> Option<&str> {
        self.race.as_ref().and_then(|r| r.size.as_deref())
    }

    pub fn background_name(&self) -> Option<&str> {
        self.background
            .as_ref()
            .and_then(|b| b.definition.as_ref())
            .and_then(|d| d.name.as_deref())
    }
}

impl SourceClass {
    pub fn name(&self) -> Option<&str> {
        self.definition.as_ref().and_then(|d| d.name.as_deref())
    }
}

fn lenient_i32<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let number = Option::<Number>::deserialize(deserializer)?;
    Ok(number.map(|n| saturate_i32(truncate(&n))))
}

fn whole_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let number = Option::<Number>::deserialize(deserializer)?;
    Ok(number.and_then(|n| match n.as_i64() {
        Some(id) => Some(id),
        None => n
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
            .map(|f| f as i64),
    }))
}

fn truncate(number: &Number) -> i64 {
    if let Some(value) = number.as_i64() {
        value
    } else if number.as_u64().is_some() {
        i64::MAX
    } else {
        // `as` saturates out-of-range floats.
        number.as_f64().map_or(0, |f| f as i64)
    }
}

fn saturate_i32(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}
