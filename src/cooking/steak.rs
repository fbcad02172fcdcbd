//! Steak entries and the enumerated inputs they are built from

use std::fmt;

use serde::{Deserialize, Serialize};

use super::cook_times::CookTimeTable;
use crate::error::{GrillError, GrillResult};

/// Target internal cook level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Doneness {
    #[serde(rename = "Rare")]
    Rare,
    #[serde(rename = "Medium Rare")]
    MediumRare,
    #[serde(rename = "Medium")]
    Medium,
    #[serde(rename = "Medium Well")]
    MediumWell,
    #[serde(rename = "Well Done")]
    WellDone,
}

impl Doneness {
    pub const ALL: [Doneness; 5] = [
        Doneness::Rare,
        Doneness::MediumRare,
        Doneness::Medium,
        Doneness::MediumWell,
        Doneness::WellDone,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Doneness::Rare => "Rare",
            Doneness::MediumRare => "Medium Rare",
            Doneness::Medium => "Medium",
            Doneness::MediumWell => "Medium Well",
            Doneness::WellDone => "Well Done",
        }
    }
}

impl fmt::Display for Doneness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Steak thickness in inches, restricted to the values the cook-time table covers.
/// Serialized as a plain number (`0.5`, `1.0`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub enum Thickness {
    Half,
    One,
    OneAndHalf,
    Two,
}

impl Thickness {
    pub const ALL: [Thickness; 4] = [
        Thickness::Half,
        Thickness::One,
        Thickness::OneAndHalf,
        Thickness::Two,
    ];

    pub fn inches(&self) -> f64 {
        match self {
            Thickness::Half => 0.5,
            Thickness::One => 1.0,
            Thickness::OneAndHalf => 1.5,
            Thickness::Two => 2.0,
        }
    }
}

impl TryFrom<f64> for Thickness {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Thickness::ALL
            .into_iter()
            .find(|t| t.inches() == value)
            .ok_or_else(|| format!("unsupported thickness {value}; expected 0.5, 1.0, 1.5 or 2.0"))
    }
}

impl From<Thickness> for f64 {
    fn from(value: Thickness) -> Self {
        value.inches()
    }
}

impl fmt::Display for Thickness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}\"", self.inches())
    }
}

/// What the user enters for a steak before cook times are looked up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SteakInput {
    pub person_name: String,
    pub desired_doneness: Doneness,
    pub thickness: Thickness,
}

impl SteakInput {
    pub fn new(person_name: impl Into<String>, desired_doneness: Doneness, thickness: Thickness) -> Self {
        Self {
            person_name: person_name.into(),
            desired_doneness,
            thickness,
        }
    }

    /// Resolve cook times for this input, producing a steak ready for the collection
    pub fn resolve(self, table: &CookTimeTable) -> GrillResult<Steak> {
        let person_name = self.person_name.trim().to_string();
        if person_name.is_empty() {
            return Err(GrillError::invalid("person name must not be empty"));
        }

        let times = table.resolve(self.desired_doneness, self.thickness);
        Ok(Steak {
            person_name,
            desired_doneness: self.desired_doneness,
            thickness: self.thickness,
            first_side_time: times.first_side,
            second_side_time: times.second_side,
        })
    }
}

/// A steak in the active collection, with its cook times resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Steak {
    pub person_name: String,
    pub desired_doneness: Doneness,
    pub thickness: Thickness,
    /// Seconds on the first side
    pub first_side_time: u64,
    /// Seconds on the second side
    pub second_side_time: u64,
}

impl Steak {
    pub fn total_cooking_time(&self) -> u64 {
        self.first_side_time + self.second_side_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doneness_uses_display_labels_on_the_wire() {
        let json = serde_json::to_string(&Doneness::MediumRare).unwrap();
        assert_eq!(json, "\"Medium Rare\"");
        let back: Doneness = serde_json::from_str("\"Well Done\"").unwrap();
        assert_eq!(back, Doneness::WellDone);
    }

    #[test]
    fn thickness_is_a_number_on_the_wire() {
        assert_eq!(serde_json::to_string(&Thickness::OneAndHalf).unwrap(), "1.5");
        let t: Thickness = serde_json::from_str("2.0").unwrap();
        assert_eq!(t, Thickness::Two);
        let t: Thickness = serde_json::from_str("1").unwrap();
        assert_eq!(t, Thickness::One);
    }

    #[test]
    fn unsupported_thickness_is_rejected() {
        assert!(serde_json::from_str::<Thickness>("0.75").is_err());
        assert!(Thickness::try_from(3.0).is_err());
    }

    #[test]
    fn steak_serializes_camel_case() {
        let steak = Steak {
            person_name: "Ana".into(),
            desired_doneness: Doneness::Medium,
            thickness: Thickness::One,
            first_side_time: 300,
            second_side_time: 240,
        };
        let value = serde_json::to_value(&steak).unwrap();
        assert_eq!(value["personName"], "Ana");
        assert_eq!(value["desiredDoneness"], "Medium");
        assert_eq!(value["firstSideTime"], 300);
        assert_eq!(steak.total_cooking_time(), 540);
    }

    #[test]
    fn resolve_trims_and_rejects_empty_names() {
        let table = CookTimeTable::builtin();
        let steak = SteakInput::new("  Bo ", Doneness::Rare, Thickness::Half)
            .resolve(&table)
            .unwrap();
        assert_eq!(steak.person_name, "Bo");

        let err = SteakInput::new("   ", Doneness::Rare, Thickness::Half).resolve(&table);
        assert!(matches!(err, Err(GrillError::InvalidInput(_))));
    }
}
