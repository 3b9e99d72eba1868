//! 已知问题短语 → 动作要点标签
//!
//! 短语与标签均为小写。匹配为双向子串包含，检测短语先去空白并转小写。

use std::collections::BTreeSet;

use once_cell::sync::Lazy;

static ISSUE_TAGS: Lazy<Vec<(&'static str, &'static [&'static str])>> = Lazy::new(|| {
    vec![
        // 投球
        ("weak leg drive", &["leg drive", "push off", "stride length"][..]),
        ("short stride", &["stride length", "leg drive"][..]),
        ("low arm slot", &["arm slot", "arm circle", "release point"][..]),
        ("arm circle too wide", &["arm circle", "arm path"][..]),
        ("early release", &["release point", "wrist snap"][..]),
        ("late release", &["release point", "arm circle"][..]),
        ("stiff front leg", &["front leg", "knee flexion", "stride landing"][..]),
        ("over-bent knee", &["knee flexion", "front leg", "balance"][..]),
        ("poor hip shoulder separation", &["hip shoulder separation", "hip rotation", "torque"][..]),
        ("opening too early", &["stay closed", "hip rotation"][..]),
        ("weak wrist snap", &["wrist snap", "release point"][..]),
        ("crossfire landing", &["stride landing", "power line"][..]),
        ("no follow through", &["follow through", "balance"][..]),
        ("leaning back", &["posture", "balance"][..]),
        // 击球
        ("no load", &["load", "hip shoulder separation"][..]),
        ("casting hands", &["bat path", "hands inside", "casting"][..]),
        ("dropping back shoulder", &["bat path", "posture"][..]),
        ("lunging", &["balance", "load", "stride length"][..]),
        ("pulling head", &["head position", "balance"][..]),
        ("slow bat speed", &["hip rotation", "bat path", "torque"][..]),
        // 守备
        ("standing up on grounders", &["stay low", "glove work", "ready position"][..]),
        ("flat footed throws", &["footwork", "throwing mechanics", "momentum"][..]),
        ("slow first step", &["first step", "ready position", "acceleration"][..]),
        ("poor glove position", &["glove work", "ready position"][..]),
        ("weak throwing arm", &["throwing mechanics", "arm path", "leg drive"][..]),
        // 接捕
        ("balls getting past", &["blocking", "stay low", "knee flexion"][..]),
        ("slow release", &["transfer", "footwork", "throwing mechanics"][..]),
        ("poor framing", &["receiving", "glove work"][..]),
        // 跑垒
        ("slow start", &["first step", "leg drive", "acceleration"][..]),
        ("wide turns", &["footwork", "momentum"][..]),
    ]
});

pub fn normalize_issue(issue: &str) -> String {
    issue.trim().to_lowercase()
}

/// `a` 包含 `b` 或 `b` 包含 `a`；两者都应已归一化
pub fn bidirectional_match(a: &str, b: &str) -> bool {
    !a.is_empty() && !b.is_empty() && (a.contains(b) || b.contains(a))
}

/// 收集所有与检测问题匹配的已知短语的标签
pub fn relevant_tags<S: AsRef<str>>(issues: &[S]) -> BTreeSet<String> {
    let mut tags = BTreeSet::new();
    for issue in issues {
        let issue = normalize_issue(issue.as_ref());
        if issue.is_empty() {
            continue;
        }
        for (known, known_tags) in ISSUE_TAGS.iter() {
            if bidirectional_match(&issue, known) {
                tags.extend(known_tags.iter().map(|t| t.to_string()));
            }
        }
    }
    tags
}

/// 已知短语是否存在于表中（精确匹配）
pub fn is_known_issue(phrase: &str) -> bool {
    let phrase = normalize_issue(phrase);
    ISSUE_TAGS.iter().any(|(known, _)| *known == phrase)
}

pub fn known_issue_count() -> usize {
    ISSUE_TAGS.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_about_thirty_entries() {
        assert_eq!(known_issue_count(), 30);
    }

    #[test]
    fn exact_phrase_yields_its_tags() {
        let tags = relevant_tags(&["weak leg drive"]);
        assert!(tags.contains("leg drive"));
        assert!(tags.contains("push off"));
    }

    #[test]
    fn matching_is_case_insensitive_and_trimmed() {
        let tags = relevant_tags(&["  LOW ARM SLOT  "]);
        assert!(tags.contains("arm slot"));
    }

    #[test]
    fn detected_issue_may_contain_known_phrase() {
        let tags = relevant_tags(&["pitcher shows a stiff front leg at landing"]);
        assert!(tags.contains("front leg"));
    }

    #[test]
    fn known_phrase_may_contain_detected_issue() {
        let tags = relevant_tags(&["separation"]);
        assert!(tags.contains("torque"));
    }

    #[test]
    fn blank_issues_match_nothing() {
        assert!(relevant_tags(&["", "   "]).is_empty());
        assert!(!bidirectional_match("", "leg drive"));
    }

    #[test]
    fn unknown_issue_matches_nothing() {
        assert!(relevant_tags(&["bad attitude"]).is_empty());
    }

    #[test]
    fn feedback_phrases_are_in_table() {
        for phrase in [
            "low arm slot",
            "stiff front leg",
            "over-bent knee",
            "poor hip shoulder separation",
        ] {
            assert!(is_known_issue(phrase), "{phrase}");
        }
    }
}
