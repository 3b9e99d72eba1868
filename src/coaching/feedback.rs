//! 指标 → 问题短语 → 文字反馈

use pose_kinematics_wasm::BiomechanicsMetrics;

use crate::coaching::types::DrillRecommendation;
use crate::config::FeedbackThresholds;

pub const LOW_ARM_SLOT: &str = "low arm slot";
pub const STIFF_FRONT_LEG: &str = "stiff front leg";
pub const OVER_BENT_KNEE: &str = "over-bent knee";
pub const POOR_SEPARATION: &str = "poor hip shoulder separation";

/// 按阈值把一帧指标映射为问题短语；缺失的指标不产生问题
pub fn detect_issues(metrics: &BiomechanicsMetrics, thresholds: &FeedbackThresholds) -> Vec<String> {
    let mut issues = Vec::new();

    if let Some(arm) = metrics.arm_slot_angle {
        if arm < thresholds.low_arm_slot_deg {
            issues.push(LOW_ARM_SLOT.to_string());
        }
    }
    if let Some(knee) = metrics.knee_flexion {
        if knee > thresholds.stiff_knee_deg {
            issues.push(STIFF_FRONT_LEG.to_string());
        } else if knee < thresholds.deep_knee_deg {
            issues.push(OVER_BENT_KNEE.to_string());
        }
    }
    if let Some(torque) = metrics.torque_separation {
        if torque < thresholds.min_torque_pct {
            issues.push(POOR_SEPARATION.to_string());
        }
    }

    issues
}

/// 合并检测到的问题与调用方提供的问题，去重并保持先后顺序
pub fn merge_issues(detected: Vec<String>, supplied: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(detected.len() + supplied.len());
    for issue in detected.into_iter().chain(supplied.iter().cloned()) {
        let trimmed = issue.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !merged.iter().any(|m| m.eq_ignore_ascii_case(trimmed)) {
            merged.push(trimmed.to_string());
        }
    }
    merged
}

/// 确定性的规则反馈文本
pub fn build_feedback(issues: &[String], recommendations: &[DrillRecommendation]) -> String {
    let mut summary = if issues.is_empty() {
        "No mechanical issues detected. Keep reinforcing your current mechanics.".to_string()
    } else {
        format!("Focus areas: {}.", issues.join(", "))
    };

    if recommendations.is_empty() {
        summary.push_str(" No matching drills found in the knowledge base.");
    } else {
        let names: Vec<&str> = recommendations
            .iter()
            .map(|r| r.entry.name.as_str())
            .collect();
        summary.push_str(&format!(" Recommended drills: {}.", names.join(", ")));
    }

    summary
}
