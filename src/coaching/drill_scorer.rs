//! 规则化训练推荐评分
//!
//! 对某技能类别的训练逐条累计得分：问题直接命中、标签命中、技能类型、难度匹配；
//! 去掉零分，按得分降序（同分按名称升序）截取前 N 条。

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::coaching::issue_tags::{bidirectional_match, normalize_issue, relevant_tags};
use crate::coaching::types::{AthleteLevel, DrillRecommendation, SkillCategory};
use crate::constants::FALLBACK_MIN_SCORE;
use crate::store::operations::drills::DrillKnowledgeEntry;

pub const ISSUE_MATCH_SCORE: f64 = 100.0;
pub const EXACT_TAG_SCORE: f64 = 30.0;
pub const PARTIAL_TAG_SCORE: f64 = 15.0;
pub const SKILL_TYPE_SCORE: f64 = 10.0;
pub const DIFFICULTY_MATCH_SCORE: f64 = 5.0;
pub const VERSATILITY_SCORE: f64 = 2.5;

const VERSATILE_DIFFICULTY: &str = "Intermediate";

#[derive(Debug, Default)]
struct ScoreBreakdown {
    score: f64,
    matched_issues: Vec<String>,
    matched_tags: Vec<String>,
}

fn score_desc(a: &DrillRecommendation, b: &DrillRecommendation) -> Ordering {
    b.relevance_score
        .partial_cmp(&a.relevance_score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.entry.name.cmp(&b.entry.name))
}

fn score_drill(
    drill: &DrillKnowledgeEntry,
    issues: &[String],
    tags: &BTreeSet<String>,
    category: SkillCategory,
    level: AthleteLevel,
) -> ScoreBreakdown {
    let mut out = ScoreBreakdown::default();

    if let Some(addressed) = drill.issue_addressed.as_deref() {
        let addressed = normalize_issue(addressed);
        for issue in issues {
            if bidirectional_match(issue, &addressed) {
                out.score += ISSUE_MATCH_SCORE;
                out.matched_issues.push(issue.clone());
            }
        }
    }

    for raw_tag in &drill.mechanic_tags {
        let tag = normalize_issue(raw_tag);
        if tag.is_empty() {
            continue;
        }
        if tags.contains(&tag) {
            out.score += EXACT_TAG_SCORE;
            out.matched_tags.push(tag);
        } else if tags.iter().any(|t| bidirectional_match(t, &tag)) {
            out.score += PARTIAL_TAG_SCORE;
            out.matched_tags.push(tag);
        }
    }

    if drill
        .skill_type
        .as_deref()
        .is_some_and(|s| s.trim().eq_ignore_ascii_case(category.as_str()))
    {
        out.score += SKILL_TYPE_SCORE;
    }

    let difficulty = drill.difficulty.trim();
    if difficulty.eq_ignore_ascii_case(level.as_str()) {
        out.score += DIFFICULTY_MATCH_SCORE;
    } else if difficulty.eq_ignore_ascii_case(VERSATILE_DIFFICULTY) {
        out.score += VERSATILITY_SCORE;
    }

    out
}

fn match_reason(breakdown: &ScoreBreakdown, category: SkillCategory) -> String {
    let mut parts = Vec::new();
    if !breakdown.matched_issues.is_empty() {
        parts.push(format!("Addresses {}", breakdown.matched_issues.join(", ")));
    }
    if !breakdown.matched_tags.is_empty() {
        parts.push(format!("Targets {}", breakdown.matched_tags.join(", ")));
    }
    if parts.is_empty() {
        format!("General {} drill", category.as_str().to_lowercase())
    } else {
        parts.join("; ")
    }
}

/// 对知识库评分并返回前 `limit` 条推荐
///
/// 不检查 `limit` 上限，调用方负责裁剪；`limit == 0` 返回空列表。
pub fn recommend_drills<S: AsRef<str>>(
    drills: &[DrillKnowledgeEntry],
    detected_issues: &[S],
    category: SkillCategory,
    level: AthleteLevel,
    limit: usize,
) -> Vec<DrillRecommendation> {
    let issues: Vec<String> = detected_issues
        .iter()
        .map(|i| normalize_issue(i.as_ref()))
        .filter(|i| !i.is_empty())
        .collect();
    let tags = relevant_tags(&issues);
    let no_issues = issues.is_empty();

    let mut ranked: Vec<DrillRecommendation> = drills
        .iter()
        .filter(|d| d.category == category.as_str())
        .filter_map(|drill| {
            let mut breakdown = score_drill(drill, &issues, &tags, category, level);
            // 无问题输入时以类别匹配分为下限，保证仍有泛用推荐
            if no_issues {
                breakdown.score = breakdown.score.max(FALLBACK_MIN_SCORE);
            }
            if breakdown.score <= 0.0 {
                return None;
            }
            Some(DrillRecommendation {
                match_reason: match_reason(&breakdown, category),
                relevance_score: breakdown.score,
                entry: drill.clone(),
            })
        })
        .collect();

    ranked.sort_by(score_desc);
    ranked.truncate(limit);

    tracing::debug!(
        category = %category,
        level = %level,
        issues = issues.len(),
        returned = ranked.len(),
        "Drill recommendations scored"
    );
    ranked
}
