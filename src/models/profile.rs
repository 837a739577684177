use serde::{Deserialize, Serialize};

use super::enums::{BiologicalSex, DietaryPreference};

pub const DEFAULT_NAME: &str = "Friend";
pub const DEFAULT_PRIMARY_GOAL: &str = "General Health";

/// Long-lived facts about the user.
///
/// Optional fields stay `None` until collected. Only `dietary_preference`
/// carries a semantic default; omnivore counts as "not yet asked".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub age: Option<i64>,
    pub sex: Option<BiologicalSex>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub origin: Option<String>,
    pub religion: Option<String>,
    pub primary_goal: String,
    #[serde(default)]
    pub dietary_preference: DietaryPreference,
    #[serde(default)]
    pub food_restrictions: Vec<String>,
    pub target_weight_kg: Option<f64>,
    #[serde(default)]
    pub conditions: Vec<String>,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            age: None,
            sex: None,
            height_cm: None,
            weight_kg: None,
            origin: None,
            religion: None,
            primary_goal: DEFAULT_PRIMARY_GOAL.to_string(),
            dietary_preference: DietaryPreference::default(),
            food_restrictions: Vec::new(),
            target_weight_kg: None,
            conditions: Vec::new(),
        }
    }
}

impl UserProfile {
    pub fn named(name: &str) -> Self {
        let trimmed = name.trim();
        Self {
            name: if trimmed.is_empty() {
                DEFAULT_NAME.to_string()
            } else {
                trimmed.to_string()
            },
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_has_safe_name_and_nothing_collected() {
        let p = UserProfile::default();
        assert_eq!(p.name, "Friend");
        assert!(p.age.is_none());
        assert!(p.height_cm.is_none());
        assert_eq!(p.dietary_preference, DietaryPreference::Omnivore);
    }

    #[test]
    fn blank_name_falls_back_to_default() {
        assert_eq!(UserProfile::named("  ").name, "Friend");
        assert_eq!(UserProfile::named(" Asha ").name, "Asha");
    }

    #[test]
    fn deserializes_without_optional_lists() {
        let json = r#"{
            "name": "Friend", "age": 28, "sex": "female", "height_cm": null,
            "weight_kg": null, "origin": null, "religion": null,
            "primary_goal": "General Health", "target_weight_kg": null
        }"#;
        let p: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(p.age, Some(28));
        assert_eq!(p.sex, Some(BiologicalSex::Female));
        assert!(p.food_restrictions.is_empty());
        assert_eq!(p.dietary_preference, DietaryPreference::Omnivore);
    }
}
