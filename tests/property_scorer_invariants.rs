use chrono::Utc;
use proptest::prelude::*;

use pitchlab_backend::coaching::drill_scorer::recommend_drills;
use pitchlab_backend::coaching::types::{AthleteLevel, SkillCategory};
use pitchlab_backend::constants::FALLBACK_MIN_SCORE;
use pitchlab_backend::store::operations::drills::DrillKnowledgeEntry;

const PHRASES: &[&str] = &[
    "weak leg drive",
    "low arm slot",
    "stiff front leg",
    "poor hip shoulder separation",
    "casting hands",
    "slow start",
    "early release",
];

const TAGS: &[&str] = &[
    "leg drive",
    "arm slot",
    "front leg",
    "torque",
    "bat path",
    "first step",
    "balance",
    "footwork",
];

const DIFFICULTIES: &[&str] = &["Beginner", "Intermediate", "Advanced"];

fn category_strategy() -> impl Strategy<Value = SkillCategory> {
    prop::sample::select(SkillCategory::ALL.to_vec())
}

fn level_strategy() -> impl Strategy<Value = AthleteLevel> {
    prop::sample::select(AthleteLevel::ALL.to_vec())
}

fn drill_strategy(category: SkillCategory) -> impl Strategy<Value = DrillKnowledgeEntry> {
    (
        "[A-Z][a-z]{2,8}",
        prop::sample::select(DIFFICULTIES.to_vec()),
        prop::sample::subsequence(TAGS.to_vec(), 0..4),
        prop::option::of(prop::sample::select(PHRASES.to_vec())),
        any::<bool>(),
    )
        .prop_map(move |(name, difficulty, tags, issue, typed)| DrillKnowledgeEntry {
            id: name.to_lowercase(),
            name,
            category: category.as_str().to_string(),
            difficulty: difficulty.to_string(),
            description: String::new(),
            mechanic_tags: tags.into_iter().map(str::to_string).collect(),
            issue_addressed: issue.map(str::to_string),
            expert_source: "proptest".to_string(),
            skill_type: typed.then(|| category.as_str().to_string()),
            created_at: Utc::now(),
        })
}

fn score_of(
    drill: &DrillKnowledgeEntry,
    issues: &[String],
    category: SkillCategory,
    level: AthleteLevel,
) -> f64 {
    recommend_drills(std::slice::from_ref(drill), issues, category, level, 1)
        .first()
        .map(|r| r.relevance_score)
        .unwrap_or(0.0)
}

proptest! {
    #[test]
    fn pt_matching_issue_strictly_increases_score(
        (category, drill) in category_strategy().prop_flat_map(|c| (Just(c), drill_strategy(c))),
        level in level_strategy(),
        base in prop::sample::subsequence(PHRASES.to_vec(), 0..3),
    ) {
        prop_assume!(drill.issue_addressed.is_some());
        let base: Vec<String> = base.into_iter().map(str::to_string).collect();
        let mut extended = base.clone();
        extended.push(drill.issue_addressed.clone().unwrap_or_default());

        let before = score_of(&drill, &base, category, level);
        let after = score_of(&drill, &extended, category, level);
        prop_assert!(after > before, "before={before}, after={after}");
    }

    #[test]
    fn pt_no_issues_returns_floor_scored_drills(
        (category, drills) in category_strategy()
            .prop_flat_map(|c| (Just(c), prop::collection::vec(drill_strategy(c), 1..8))),
        level in level_strategy(),
    ) {
        let none: Vec<String> = Vec::new();
        let ranked = recommend_drills(&drills, &none, category, level, drills.len());
        prop_assert!(!ranked.is_empty());
        prop_assert_eq!(ranked.len(), drills.len());
        for rec in &ranked {
            prop_assert!(rec.relevance_score >= FALLBACK_MIN_SCORE);
        }
    }

    #[test]
    fn pt_results_sorted_and_bounded(
        (category, drills) in category_strategy()
            .prop_flat_map(|c| (Just(c), prop::collection::vec(drill_strategy(c), 0..10))),
        level in level_strategy(),
        issues in prop::sample::subsequence(PHRASES.to_vec(), 0..4),
        limit in 0_usize..6,
    ) {
        let ranked = recommend_drills(&drills, &issues, category, level, limit);
        prop_assert!(ranked.len() <= limit);
        for pair in ranked.windows(2) {
            prop_assert!(pair[0].relevance_score >= pair[1].relevance_score);
        }
        prop_assert!(ranked.iter().all(|r| r.relevance_score > 0.0));
    }

    #[test]
    fn pt_other_categories_never_returned(
        drills in prop::collection::vec(drill_strategy(SkillCategory::Hitting), 0..6),
        level in level_strategy(),
        issues in prop::sample::subsequence(PHRASES.to_vec(), 0..3),
    ) {
        let ranked = recommend_drills(&drills, &issues, SkillCategory::Pitching, level, 10);
        prop_assert!(ranked.is_empty());
    }
}
