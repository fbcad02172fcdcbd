//! Saved steak templates that outlive a cook session

use serde::{Deserialize, Serialize};

use super::steak::{Doneness, SteakInput, Thickness};

/// A reusable steak description. Carries no cook times; those are looked up
/// again whenever the template is put on the grill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSteak {
    pub id: u64,
    pub person_name: String,
    pub center_cook: Doneness,
    pub thickness: Thickness,
}

/// Fields a user supplies when creating or editing a saved steak
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSteakInput {
    pub person_name: String,
    pub center_cook: Doneness,
    pub thickness: Thickness,
}

impl SavedSteak {
    pub fn from_input(id: u64, input: SavedSteakInput) -> Self {
        Self {
            id,
            person_name: input.person_name.trim().to_string(),
            center_cook: input.center_cook,
            thickness: input.thickness,
        }
    }

    pub fn to_steak_input(&self) -> SteakInput {
        SteakInput::new(self.person_name.clone(), self.center_cook, self.thickness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cooking::CookTimeTable;

    #[test]
    fn template_resolves_fresh_cook_times() {
        let saved = SavedSteak::from_input(
            7,
            SavedSteakInput {
                person_name: " Dad ".into(),
                center_cook: Doneness::MediumWell,
                thickness: Thickness::OneAndHalf,
            },
        );
        assert_eq!(saved.person_name, "Dad");

        let table = CookTimeTable::builtin();
        let steak = saved.to_steak_input().resolve(&table).unwrap();
        let expected = table.resolve(Doneness::MediumWell, Thickness::OneAndHalf);
        assert_eq!(steak.first_side_time, expected.first_side);
        assert_eq!(steak.second_side_time, expected.second_side);
    }

    #[test]
    fn uses_center_cook_on_the_wire() {
        let saved = SavedSteak {
            id: 1,
            person_name: "Kim".into(),
            center_cook: Doneness::Rare,
            thickness: Thickness::One,
        };
        let value = serde_json::to_value(&saved).unwrap();
        assert_eq!(value["centerCook"], "Rare");
        assert_eq!(value["id"], 1);
    }
}
