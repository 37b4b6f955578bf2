//! Optional content modules and their activation flags.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Identifier of an optional module. The base game is always present and has no id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpansionId {
    BreakinAtmo,
    BlueSun,
    Kalidasa,
    Pirates,
    Crime,
    Coachworks,
    StillFlying,
    /// 10th Anniversary content, the richest module.
    Tenth,
}

impl ExpansionId {
    /// Every module in display order.
    pub const ALL: [ExpansionId; 8] = [
        ExpansionId::BreakinAtmo,
        ExpansionId::BlueSun,
        ExpansionId::Kalidasa,
        ExpansionId::Pirates,
        ExpansionId::Crime,
        ExpansionId::Coachworks,
        ExpansionId::StillFlying,
        ExpansionId::Tenth,
    ];

    /// Stable identifier used in content tables.
    pub fn id(self) -> &'static str {
        match self {
            ExpansionId::BreakinAtmo => "breakin_atmo",
            ExpansionId::BlueSun => "blue_sun",
            ExpansionId::Kalidasa => "kalidasa",
            ExpansionId::Pirates => "pirates",
            ExpansionId::Crime => "crime",
            ExpansionId::Coachworks => "coachworks",
            ExpansionId::StillFlying => "still_flying",
            ExpansionId::Tenth => "tenth",
        }
    }

    /// Human-readable module name.
    pub fn label(self) -> &'static str {
        match self {
            ExpansionId::BreakinAtmo => "Breakin' Atmo",
            ExpansionId::BlueSun => "Blue Sun",
            ExpansionId::Kalidasa => "Kalidasa",
            ExpansionId::Pirates => "Pirates & Bounty Hunters",
            ExpansionId::Crime => "Crime & Punishment",
            ExpansionId::Coachworks => "Coachworks",
            ExpansionId::StillFlying => "Still Flying",
            ExpansionId::Tenth => "10th Anniversary",
        }
    }
}

impl fmt::Display for ExpansionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ExpansionId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExpansionId::ALL
            .into_iter()
            .find(|candidate| candidate.id() == s.trim())
            .ok_or_else(|| s.to_string())
    }
}

/// Activation flags for each optional module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Expansions {
    pub breakin_atmo: bool,
    pub blue_sun: bool,
    pub kalidasa: bool,
    pub pirates: bool,
    pub crime: bool,
    pub coachworks: bool,
    pub still_flying: bool,
    pub tenth: bool,
}

impl Expansions {
    /// Whether the given module is switched on.
    pub fn is_active(&self, id: ExpansionId) -> bool {
        *self.flag(id)
    }

    /// Switch a module on or off.
    pub fn set(&mut self, id: ExpansionId, active: bool) {
        *self.flag_mut(id) = active;
    }

    /// Active modules in display order.
    pub fn active(&self) -> Vec<ExpansionId> {
        ExpansionId::ALL
            .into_iter()
            .filter(|id| self.is_active(*id))
            .collect()
    }

    fn flag(&self, id: ExpansionId) -> &bool {
        match id {
            ExpansionId::BreakinAtmo => &self.breakin_atmo,
            ExpansionId::BlueSun => &self.blue_sun,
            ExpansionId::Kalidasa => &self.kalidasa,
            ExpansionId::Pirates => &self.pirates,
            ExpansionId::Crime => &self.crime,
            ExpansionId::Coachworks => &self.coachworks,
            ExpansionId::StillFlying => &self.still_flying,
            ExpansionId::Tenth => &self.tenth,
        }
    }

    fn flag_mut(&mut self, id: ExpansionId) -> &mut bool {
        match id {
            ExpansionId::BreakinAtmo => &mut self.breakin_atmo,
            ExpansionId::BlueSun => &mut self.blue_sun,
            ExpansionId::Kalidasa => &mut self.kalidasa,
            ExpansionId::Pirates => &mut self.pirates,
            ExpansionId::Crime => &mut self.crime,
            ExpansionId::Coachworks => &mut self.coachworks,
            ExpansionId::StillFlying => &mut self.still_flying,
            ExpansionId::Tenth => &mut self.tenth,
        }
    }
}

/// A module reference found in content data, which may name a module this build doesn't know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleRef {
    Known(ExpansionId),
    Unknown(String),
}

impl ModuleRef {
    /// Resolve a raw id from content tables.
    pub fn from_id(raw: &str) -> Self {
        match raw.parse::<ExpansionId>() {
            Ok(id) => ModuleRef::Known(id),
            Err(raw) => ModuleRef::Unknown(raw),
        }
    }

    /// Display label. Unknown ids degrade to an inline placeholder.
    pub fn label(&self) -> String {
        match self {
            ModuleRef::Known(id) => id.label().to_string(),
            ModuleRef::Unknown(raw) => format!("[unknown module: {raw}]"),
        }
    }
}
