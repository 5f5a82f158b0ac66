// Recurrence module
// Repeat frequency attached to an event definition

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatFrequency {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl RepeatFrequency {
    pub const ALL: [RepeatFrequency; 5] = [
        RepeatFrequency::None,
        RepeatFrequency::Daily,
        RepeatFrequency::Weekly,
        RepeatFrequency::Monthly,
        RepeatFrequency::Yearly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RepeatFrequency::None => "none",
            RepeatFrequency::Daily => "daily",
            RepeatFrequency::Weekly => "weekly",
            RepeatFrequency::Monthly => "monthly",
            RepeatFrequency::Yearly => "yearly",
        }
    }

    /// Label shown in the repeat picker.
    pub fn label(&self) -> &'static str {
        match self {
            RepeatFrequency::None => "Do not repeat",
            RepeatFrequency::Daily => "Daily",
            RepeatFrequency::Weekly => "Weekly",
            RepeatFrequency::Monthly => "Monthly",
            RepeatFrequency::Yearly => "Yearly",
        }
    }

    pub fn is_recurring(&self) -> bool {
        !matches!(self, RepeatFrequency::None)
    }
}

impl fmt::Display for RepeatFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RepeatFrequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(RepeatFrequency::None),
            "daily" => Ok(RepeatFrequency::Daily),
            "weekly" => Ok(RepeatFrequency::Weekly),
            "monthly" => Ok(RepeatFrequency::Monthly),
            "yearly" => Ok(RepeatFrequency::Yearly),
            other => Err(format!("Unknown repeat frequency '{}'", other)),
        }
    }
}
