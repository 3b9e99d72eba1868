use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::store::operations::drills::DrillKnowledgeEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillCategory {
    Pitching,
    Hitting,
    Fielding,
    Catching,
    Baserunning,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 5] = [
        SkillCategory::Pitching,
        SkillCategory::Hitting,
        SkillCategory::Fielding,
        SkillCategory::Catching,
        SkillCategory::Baserunning,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SkillCategory::Pitching => "Pitching",
            SkillCategory::Hitting => "Hitting",
            SkillCategory::Fielding => "Fielding",
            SkillCategory::Catching => "Catching",
            SkillCategory::Baserunning => "Baserunning",
        }
    }
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SkillCategory {
    type Err = ();

    /// 不区分大小写，忽略首尾空白
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(needle))
            .ok_or(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AthleteLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl AthleteLevel {
    pub const ALL: [AthleteLevel; 3] = [
        AthleteLevel::Beginner,
        AthleteLevel::Intermediate,
        AthleteLevel::Advanced,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AthleteLevel::Beginner => "Beginner",
            AthleteLevel::Intermediate => "Intermediate",
            AthleteLevel::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for AthleteLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AthleteLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|l| l.as_str().eq_ignore_ascii_case(needle))
            .ok_or(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrillRecommendation {
    pub entry: DrillKnowledgeEntry,
    pub relevance_score: f64,
    pub match_reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackSource {
    Rules,
    Llm,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackReport {
    pub issues: Vec<String>,
    pub summary: String,
    pub recommendations: Vec<DrillRecommendation>,
    pub elaboration: Option<String>,
    pub source: FeedbackSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parse_is_case_insensitive() {
        assert_eq!(" pitching ".parse::<SkillCategory>(), Ok(SkillCategory::Pitching));
        assert_eq!("BASERUNNING".parse::<SkillCategory>(), Ok(SkillCategory::Baserunning));
        assert!("Bowling".parse::<SkillCategory>().is_err());
    }

    #[test]
    fn level_parse_rejects_unknown() {
        assert_eq!("intermediate".parse::<AthleteLevel>(), Ok(AthleteLevel::Intermediate));
        assert!("".parse::<AthleteLevel>().is_err());
        assert!("Expert".parse::<AthleteLevel>().is_err());
    }

    #[test]
    fn feedback_source_serializes_lowercase() {
        assert_eq!(serde_json::to_value(FeedbackSource::Llm).unwrap(), "llm");
        assert_eq!(serde_json::to_value(FeedbackSource::Rules).unwrap(), "rules");
    }
}
