//! 反馈报告组装：规则检测 → 推荐评分 → 可选 LLM 补充

use pose_kinematics_wasm::BiomechanicsMetrics;

use crate::coaching::drill_scorer::recommend_drills;
use crate::coaching::feedback::{build_feedback, detect_issues, merge_issues};
use crate::coaching::types::{AthleteLevel, FeedbackReport, FeedbackSource, SkillCategory};
use crate::config::CoachingConfig;
use crate::constants::MAX_ELABORATION_CHARS;
use crate::services::llm_provider::{ChatMessage, LlmError, LlmProvider};
use crate::store::{Store, StoreError};

pub struct FeedbackInput<'a> {
    pub metrics: Option<&'a BiomechanicsMetrics>,
    pub detected_issues: &'a [String],
    pub category: SkillCategory,
    pub level: AthleteLevel,
}

pub async fn compose_feedback(
    store: &Store,
    llm: &LlmProvider,
    coaching: &CoachingConfig,
    input: FeedbackInput<'_>,
) -> Result<FeedbackReport, StoreError> {
    let detected = input
        .metrics
        .map(|m| detect_issues(m, &coaching.feedback))
        .unwrap_or_default();
    let issues = merge_issues(detected, input.detected_issues);

    let drills = store.list_drills_by_category(input.category.as_str())?;
    let recommendations = recommend_drills(
        &drills,
        &issues,
        input.category,
        input.level,
        coaching.recommendation_default_limit,
    );
    let summary = build_feedback(&issues, &recommendations);

    let (elaboration, source) = if llm.is_enabled() {
        match elaborate(llm, &summary, input.category, input.level).await {
            Ok(text) => (Some(text), FeedbackSource::Llm),
            Err(e) => {
                tracing::warn!(error = %e, "LLM elaboration failed, using rule-based feedback only");
                (None, FeedbackSource::Rules)
            }
        }
    } else {
        (None, FeedbackSource::Rules)
    };

    Ok(FeedbackReport {
        issues,
        summary,
        recommendations,
        elaboration,
        source,
    })
}

async fn elaborate(
    llm: &LlmProvider,
    summary: &str,
    category: SkillCategory,
    level: AthleteLevel,
) -> Result<String, LlmError> {
    let messages = vec![
        ChatMessage::system(
            "You are a youth fastpitch softball coach. Expand the analysis into short, \
             encouraging, age-appropriate coaching cues. Do not invent measurements.",
        ),
        ChatMessage::user(format!(
            "Skill: {category}. Athlete level: {level}.\nAnalysis: {summary}"
        )),
    ];
    let text = llm.chat(messages).await?;
    Ok(text.trim().chars().take(MAX_ELABORATION_CHARS).collect())
}
