//! 生物力学指标聚合
//!
//! 从一帧关键点计算三个投球指标：
//! - 出手臂位角 (arm slot)：髋→肩→肘，主导侧；不可计算时整帧结果为 None
//! - 膝关节屈曲 (knee flexion)：髋→膝→踝，主导侧；可单独为空
//! - 躯干扭转分离度 (torque separation)：肩中点与髋中点的水平偏移 / 肩宽，百分比
//!
//! 每个关键点都需要可见度 ≥ `MIN_VISIBILITY` 才参与计算。

use serde::{Deserialize, Serialize};

use crate::angles::joint_angle;
use crate::landmark::{LandmarkSet, LEFT_HIP, LEFT_SHOULDER, RIGHT_HIP, RIGHT_SHOULDER};
use crate::side::{select_dominant_side, Side};

/// 参与计算的关键点最低可见度
pub const MIN_VISIBILITY: f64 = 0.5;

/// 肩宽低于此值（如正对镜头）时不计算扭转分离度，避免除以近零值
pub const MIN_SHOULDER_WIDTH: f64 = 0.01;

/// 单次更新得到的指标快照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiomechanicsMetrics {
    /// 度
    pub arm_slot_angle: Option<i32>,
    /// 度
    pub knee_flexion: Option<i32>,
    /// 百分比
    pub torque_separation: Option<i32>,
}

/// 按原始投票选侧后计算指标
///
/// 少于 33 个关键点时返回 None。
pub fn compute_metrics(landmarks: &[crate::landmark::Landmark]) -> Option<BiomechanicsMetrics> {
    let set = LandmarkSet::new(landmarks)?;
    let side = select_dominant_side(&set);
    compute_metrics_for_side(&set, side)
}

/// 使用调用方给定的一侧计算指标
pub fn compute_metrics_for_side(set: &LandmarkSet<'_>, side: Side) -> Option<BiomechanicsMetrics> {
    let arm_slot_angle = Some(arm_slot_angle(set, side)?);

    Some(BiomechanicsMetrics {
        arm_slot_angle,
        knee_flexion: knee_flexion(set, side),
        torque_separation: torque_separation(set),
    })
}

fn arm_slot_angle(set: &LandmarkSet<'_>, side: Side) -> Option<i32> {
    let hip = set.get(side.hip());
    let shoulder = set.get(side.shoulder());
    let elbow = set.get(side.elbow());
    if ![hip, shoulder, elbow]
        .iter()
        .all(|lm| lm.is_visible(MIN_VISIBILITY))
    {
        return None;
    }
    Some(joint_angle(hip, shoulder, elbow))
}

fn knee_flexion(set: &LandmarkSet<'_>, side: Side) -> Option<i32> {
    let hip = set.get(side.hip());
    let knee = set.get(side.knee());
    let ankle = set.get(side.ankle());
    if ![hip, knee, ankle]
        .iter()
        .all(|lm| lm.is_visible(MIN_VISIBILITY))
    {
        return None;
    }
    Some(joint_angle(hip, knee, ankle))
}

/// 与主导侧无关，直接使用左右肩髋四个点
fn torque_separation(set: &LandmarkSet<'_>) -> Option<i32> {
    let left_shoulder = set.get(LEFT_SHOULDER);
    let right_shoulder = set.get(RIGHT_SHOULDER);
    let left_hip = set.get(LEFT_HIP);
    let right_hip = set.get(RIGHT_HIP);
    if ![left_shoulder, right_shoulder, left_hip, right_hip]
        .iter()
        .all(|lm| lm.is_visible(MIN_VISIBILITY))
    {
        return None;
    }

    let shoulder_width = (right_shoulder.x - left_shoulder.x).abs();
    if shoulder_width <= MIN_SHOULDER_WIDTH {
        return None;
    }

    let shoulder_mid_x = (right_shoulder.x + left_shoulder.x) / 2.0;
    let hip_mid_x = (right_hip.x + left_hip.x) / 2.0;
    let separation = (shoulder_mid_x - hip_mid_x).abs() / shoulder_width * 100.0;
    Some(separation.round() as i32)
}
