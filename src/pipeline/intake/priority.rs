//! MetricPriorityTable: which facts matter for which concern, most
//! important first.

use crate::models::{FieldId, IssueType};

use FieldId::*;

/// Bumped whenever a list below changes order or membership.
pub const PRIORITY_TABLE_VERSION: u32 = 2;

const MENTAL_FATIGUE: &[FieldId] = &[
    SleepHours,
    StressScore,
    WaterGlasses,
    MoodScore,
    EnergyScore,
    ExerciseMinutes,
    ExerciseType,
    SocialHours,
    AlcoholUnits,
    SmokingToday,
];

const EMOTIONAL: &[FieldId] = &[
    StressScore,
    MoodScore,
    SleepHours,
    SocialHours,
    ExerciseMinutes,
    ExerciseType,
    EnergyScore,
    WaterGlasses,
    AlcoholUnits,
    SmokingToday,
];

const PHYSICAL_FATIGUE: &[FieldId] = &[
    SleepHours,
    EnergyScore,
    ExerciseMinutes,
    ExerciseType,
    WaterGlasses,
    StressScore,
    MoodScore,
    SocialHours,
    AlcoholUnits,
    SmokingToday,
];

const SLEEP_ISSUES: &[FieldId] = &[
    SleepHours,
    StressScore,
    ExerciseMinutes,
    ExerciseType,
    AlcoholUnits,
    MoodScore,
    EnergyScore,
    WaterGlasses,
    SocialHours,
    SmokingToday,
];

const GENERAL_WELLNESS: &[FieldId] = &[
    SleepHours,
    WaterGlasses,
    MoodScore,
    EnergyScore,
    StressScore,
    ExerciseMinutes,
    ExerciseType,
    SocialHours,
    AlcoholUnits,
    SmokingToday,
];

// Profile facts lead: the downstream plan needs them for BMI/BMR.
const BUILD_PLAN: &[FieldId] = &[
    Age,
    Sex,
    HeightCm,
    WeightKg,
    SleepHours,
    WaterGlasses,
    MoodScore,
    EnergyScore,
    StressScore,
    ExerciseMinutes,
    ExerciseType,
    AlcoholUnits,
    SmokingToday,
    DietaryPreference,
    Origin,
    Religion,
];

/// Ordered fact list for a category.
pub fn priority_list(issue: IssueType) -> &'static [FieldId] {
    match issue {
        IssueType::MentalFatigue => MENTAL_FATIGUE,
        IssueType::Emotional => EMOTIONAL,
        IssueType::PhysicalFatigue => PHYSICAL_FATIGUE,
        IssueType::SleepIssues => SLEEP_ISSUES,
        IssueType::GeneralWellness => GENERAL_WELLNESS,
        IssueType::BuildPlan => BUILD_PLAN,
    }
}

/// One-line focus note handed to the extraction service with the list.
pub fn issue_focus(issue: IssueType) -> &'static str {
    match issue {
        IssueType::MentalFatigue => {
            "MENTAL FATIGUE (brain fog, can't focus). Sleep quality and stress matter most for mental clarity."
        }
        IssueType::Emotional => {
            "EMOTIONAL (sad, anxious, overwhelmed). Be extra gentle; sleep and movement are proven mood boosters."
        }
        IssueType::PhysicalFatigue => {
            "PHYSICAL FATIGUE (lethargic, no energy). Energy usually comes from sleep, movement and hydration basics."
        }
        IssueType::SleepIssues => {
            "SLEEP PROBLEMS (can't sleep, insomnia). Stress and lack of activity are the top sleep disruptors."
        }
        IssueType::GeneralWellness => {
            "GENERAL WELLNESS. Collect every metric so the user can be benchmarked against healthy ranges."
        }
        IssueType::BuildPlan => {
            "BUILD PLAN. Profile data first (age, sex, height, weight), then daily habits and dietary context."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_ISSUES: [IssueType; 6] = [
        IssueType::MentalFatigue,
        IssueType::Emotional,
        IssueType::PhysicalFatigue,
        IssueType::SleepIssues,
        IssueType::GeneralWellness,
        IssueType::BuildPlan,
    ];

    #[test]
    fn list_sizes_within_bounds() {
        for issue in ALL_ISSUES {
            let len = priority_list(issue).len();
            assert!((10..=16).contains(&len), "{issue}: {len}");
        }
        assert_eq!(priority_list(IssueType::BuildPlan).len(), 16);
    }

    #[test]
    fn lists_have_no_duplicates() {
        for issue in ALL_ISSUES {
            let mut fields = priority_list(issue).to_vec();
            fields.sort();
            fields.dedup();
            assert_eq!(fields.len(), priority_list(issue).len(), "{issue}");
        }
    }

    #[test]
    fn only_build_plan_asks_profile_facts() {
        for issue in ALL_ISSUES {
            let has_profile = priority_list(issue).iter().any(|f| f.is_profile());
            assert_eq!(has_profile, issue == IssueType::BuildPlan, "{issue}");
        }
        assert!(priority_list(IssueType::BuildPlan)[..4].iter().all(|f| f.is_profile()));
    }

    #[test]
    fn lists_lead_with_the_key_metric() {
        assert_eq!(priority_list(IssueType::Emotional)[0], StressScore);
        assert_eq!(priority_list(IssueType::SleepIssues)[0], SleepHours);
        assert_eq!(priority_list(IssueType::PhysicalFatigue)[1], EnergyScore);
    }
}
