//! HTTP 边界的输入校验

use pose_kinematics_wasm::{BiomechanicsMetrics, BiomechanicsPayload};

use crate::coaching::types::{AthleteLevel, SkillCategory};
use crate::constants::{MAX_DETECTED_ISSUES, MAX_JOINT_ANGLE_DEG, MAX_RECOMMENDATION_LIMIT};
use crate::response::AppError;

pub fn parse_skill_category(raw: &str) -> Result<SkillCategory, AppError> {
    raw.parse::<SkillCategory>().map_err(|_| {
        AppError::bad_request(
            "INVALID_SKILL_CATEGORY",
            &format!(
                "Unknown skill category '{}'; expected one of Pitching, Hitting, Fielding, Catching, Baserunning",
                raw.trim()
            ),
        )
    })
}

pub fn parse_athlete_level(raw: &str) -> Result<AthleteLevel, AppError> {
    raw.parse::<AthleteLevel>().map_err(|_| {
        AppError::bad_request(
            "INVALID_ATHLETE_LEVEL",
            &format!(
                "Unknown athlete level '{}'; expected one of Beginner, Intermediate, Advanced",
                raw.trim()
            ),
        )
    })
}

/// 缺省取 `default`，并裁剪到 1..=MAX_RECOMMENDATION_LIMIT
pub fn clamp_limit(requested: Option<usize>, default: usize) -> usize {
    requested
        .unwrap_or(default)
        .clamp(1, MAX_RECOMMENDATION_LIMIT)
}

pub fn validate_issue_list(issues: &[String]) -> Result<(), AppError> {
    if issues.len() > MAX_DETECTED_ISSUES {
        return Err(AppError::bad_request(
            "TOO_MANY_ISSUES",
            &format!("At most {MAX_DETECTED_ISSUES} detected issues are accepted"),
        ));
    }
    Ok(())
}

/// 角度 0..=180，扭转分离度非负
pub fn validate_metrics(metrics: &BiomechanicsMetrics) -> Result<(), AppError> {
    let angles = [
        ("armSlotAngle", metrics.arm_slot_angle),
        ("kneeFlexion", metrics.knee_flexion),
    ];
    for (field, value) in angles {
        if let Some(v) = value {
            if !(0..=MAX_JOINT_ANGLE_DEG).contains(&v) {
                return Err(AppError::bad_request(
                    "INVALID_METRICS",
                    &format!("{field} must be between 0 and {MAX_JOINT_ANGLE_DEG}, got {v}"),
                ));
            }
        }
    }
    if let Some(t) = metrics.torque_separation {
        if t < 0 {
            return Err(AppError::bad_request(
                "INVALID_METRICS",
                &format!("torqueSeparation must not be negative, got {t}"),
            ));
        }
    }
    Ok(())
}

pub fn validate_payload(payload: &BiomechanicsPayload) -> Result<(), AppError> {
    if payload.assessment_id <= 0 {
        return Err(AppError::bad_request(
            "INVALID_ASSESSMENT_ID",
            "assessmentId must be a positive integer",
        ));
    }
    validate_metrics(&payload.metrics)
}
