use crate::models::{IssueType, JourneyMode};

/// Keyword table for the four symptom clusters, in scoring order.
const ISSUE_KEYWORDS: &[(IssueType, &[&str])] = &[
    (
        IssueType::MentalFatigue,
        &[
            "brain fog",
            "can't focus",
            "mentally tired",
            "can't think",
            "concentration",
            "distracted",
            "foggy",
            "mental",
        ],
    ),
    (
        IssueType::Emotional,
        &[
            "sad",
            "anxious",
            "depressed",
            "down",
            "worried",
            "stressed",
            "overwhelmed",
            "upset",
            "lonely",
        ],
    ),
    (
        IssueType::PhysicalFatigue,
        &[
            "lethargic",
            "sluggish",
            "no energy",
            "exhausted",
            "physically tired",
            "weak",
            "drained",
            "fatigued",
        ],
    ),
    (
        IssueType::SleepIssues,
        &[
            "can't sleep",
            "insomnia",
            "restless",
            "waking up",
            "sleep problems",
            "tired but can't sleep",
        ],
    ),
];

const FEELING_FINE: &[&str] = &["good", "great", "fine", "okay", "well", "amazing", "fantastic"];

/// Lower-case and fold typographic apostrophes so "can’t" matches "can't".
pub fn normalize(text: &str) -> String {
    text.to_lowercase().replace(['\u{2019}', '\u{2018}'], "'")
}

/// Keyword hit count per category, zero-hit categories omitted.
pub fn score_issues(text: &str) -> Vec<(IssueType, usize)> {
    let lower = normalize(text);
    ISSUE_KEYWORDS
        .iter()
        .map(|(issue, keywords)| {
            (*issue, keywords.iter().filter(|k| lower.contains(*k)).count())
        })
        .filter(|(_, hits)| *hits > 0)
        .collect()
}

/// Classify the user's concern from all of their turns.
///
/// Several categories hit → general_wellness (most comprehensive list).
/// Exactly one → that category. None → general_wellness as well, whether or
/// not the user sounds fine; the two zero-hit cases only differ in logging.
pub fn classify_issue(user_text: &str) -> IssueType {
    let scores = score_issues(user_text);

    match scores.as_slice() {
        [(issue, hits)] => {
            tracing::info!(issue_type = %issue, hits, "Issue classified");
            *issue
        }
        [] => {
            if has_feeling_fine(user_text) {
                tracing::info!("User reports feeling fine, using general_wellness");
            } else {
                tracing::info!("No clear issue detected, using general_wellness");
            }
            IssueType::GeneralWellness
        }
        multiple => {
            let detected: Vec<&str> = multiple.iter().map(|(i, _)| i.as_str()).collect();
            tracing::info!(?detected, "Multiple issues detected, using general_wellness");
            IssueType::GeneralWellness
        }
    }
}

fn has_feeling_fine(text: &str) -> bool {
    let lower = normalize(text);
    FEELING_FINE.iter().any(|k| lower.contains(k))
}

/// Match the user's menu answer against the three journeys. The whole
/// trimmed message must equal one of the accepted tokens.
pub fn select_journey_mode(text: &str) -> Option<JourneyMode> {
    match text.trim().to_uppercase().as_str() {
        "A" | "QUICK CHECK" | "QUICK" => Some(JourneyMode::QuickCheck),
        "B" | "DEEP DIVE" | "DEEP" | "EDUCATE" | "EDUCATION" => Some(JourneyMode::DeepDive),
        "C" | "BUILD PLAN" | "PLAN" | "BUILD" => Some(JourneyMode::BuildPlan),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_category_hits_resolve_to_that_category() {
        assert_eq!(classify_issue("I have brain fog all day"), IssueType::MentalFatigue);
        assert_eq!(classify_issue("feeling so anxious lately"), IssueType::Emotional);
        assert_eq!(classify_issue("I'm sluggish and exhausted"), IssueType::PhysicalFatigue);
        assert_eq!(classify_issue("insomnia again"), IssueType::SleepIssues);
    }

    #[test]
    fn every_keyword_alone_picks_its_category() {
        for (issue, keywords) in ISSUE_KEYWORDS {
            for keyword in *keywords {
                let scores = score_issues(keyword);
                assert!(
                    scores.iter().any(|(i, _)| i == issue),
                    "{keyword} should score {issue}"
                );
            }
        }
    }

    #[test]
    fn two_categories_resolve_to_general_wellness() {
        assert_eq!(
            classify_issue("I'm stressed can't focus at work"),
            IssueType::GeneralWellness
        );
    }

    #[test]
    fn zero_hits_resolve_to_general_wellness_intentionally() {
        // Both zero-hit branches collapse to the comprehensive category.
        assert_eq!(classify_issue("feeling great today"), IssueType::GeneralWellness);
        assert_eq!(classify_issue("just checking in"), IssueType::GeneralWellness);
    }

    #[test]
    fn typographic_apostrophe_matches() {
        assert_eq!(classify_issue("I can\u{2019}t focus"), IssueType::MentalFatigue);
    }

    #[test]
    fn scoring_is_case_insensitive() {
        let scores = score_issues("INSOMNIA and RESTLESS nights");
        assert_eq!(scores, vec![(IssueType::SleepIssues, 2)]);
    }

    #[test]
    fn journey_mode_tokens() {
        assert_eq!(select_journey_mode(" a "), Some(JourneyMode::QuickCheck));
        assert_eq!(select_journey_mode("Deep dive"), Some(JourneyMode::DeepDive));
        assert_eq!(select_journey_mode("education"), Some(JourneyMode::DeepDive));
        assert_eq!(select_journey_mode("build"), Some(JourneyMode::BuildPlan));
        assert_eq!(select_journey_mode("C"), Some(JourneyMode::BuildPlan));
    }

    #[test]
    fn journey_mode_needs_exact_match() {
        assert_eq!(select_journey_mode("I want a quick check please"), None);
        assert_eq!(select_journey_mode("D"), None);
        assert_eq!(select_journey_mode(""), None);
    }
}
