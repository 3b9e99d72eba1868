//! 主导侧选择模块
//!
//! 按肩、肘、髋三个关键点的可见度之和在左右两侧之间投票，平票时选右侧。
//! `SideTracker` 在原始投票之上提供可选的迟滞，避免可见度接近时逐帧翻转。

use serde::Serialize;

use crate::landmark::{
    LandmarkSet, LEFT_ANKLE, LEFT_ELBOW, LEFT_HIP, LEFT_KNEE, LEFT_SHOULDER, RIGHT_ANKLE,
    RIGHT_ELBOW, RIGHT_HIP, RIGHT_KNEE, RIGHT_SHOULDER,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    pub fn shoulder(self) -> usize {
        match self {
            Side::Left => LEFT_SHOULDER,
            Side::Right => RIGHT_SHOULDER,
        }
    }

    pub fn elbow(self) -> usize {
        match self {
            Side::Left => LEFT_ELBOW,
            Side::Right => RIGHT_ELBOW,
        }
    }

    pub fn hip(self) -> usize {
        match self {
            Side::Left => LEFT_HIP,
            Side::Right => RIGHT_HIP,
        }
    }

    pub fn knee(self) -> usize {
        match self {
            Side::Left => LEFT_KNEE,
            Side::Right => RIGHT_KNEE,
        }
    }

    pub fn ankle(self) -> usize {
        match self {
            Side::Left => LEFT_ANKLE,
            Side::Right => RIGHT_ANKLE,
        }
    }
}

/// 单侧肩、肘、髋可见度之和
pub fn side_visibility(set: &LandmarkSet<'_>, side: Side) -> f64 {
    [side.shoulder(), side.elbow(), side.hip()]
        .iter()
        .map(|&i| set.get(i).visibility)
        .sum()
}

fn vote(left: f64, right: f64) -> Side {
    if right >= left {
        Side::Right
    } else {
        Side::Left
    }
}

/// 逐帧原始投票（无迟滞）
pub fn select_dominant_side(set: &LandmarkSet<'_>) -> Side {
    vote(
        side_visibility(set, Side::Left),
        side_visibility(set, Side::Right),
    )
}

/// 带迟滞的主导侧跟踪器
///
/// - `margin`: 挑战侧可见度之和领先当前侧不少于此值才算赢下一帧（含等于，
///   因此 0 时平票仍按原始投票偏向右侧）
/// - `confirm_frames`: 挑战侧需要连续赢下的帧数
///
/// 默认值 (0.0, 1) 与逐帧原始投票完全一致。
#[derive(Debug, Clone)]
pub struct SideTracker {
    margin: f64,
    confirm_frames: u32,
    current: Option<Side>,
    challenger_streak: u32,
}

impl Default for SideTracker {
    fn default() -> Self {
        Self::new(0.0, 1)
    }
}

impl SideTracker {
    pub fn new(margin: f64, confirm_frames: u32) -> Self {
        Self {
            margin: margin.max(0.0),
            confirm_frames: confirm_frames.max(1),
            current: None,
            challenger_streak: 0,
        }
    }

    /// 输入一帧，返回本帧采用的一侧
    pub fn observe(&mut self, set: &LandmarkSet<'_>) -> Side {
        let left = side_visibility(set, Side::Left);
        let right = side_visibility(set, Side::Right);
        let raw = vote(left, right);

        let Some(current) = self.current else {
            self.current = Some(raw);
            return raw;
        };

        let challenger = current.opposite();
        let (current_sum, challenger_sum) = match current {
            Side::Left => (left, right),
            Side::Right => (right, left),
        };

        if raw == challenger && challenger_sum - current_sum >= self.margin {
            self.challenger_streak += 1;
            if self.challenger_streak >= self.confirm_frames {
                self.challenger_streak = 0;
                self.current = Some(challenger);
                return challenger;
            }
        } else {
            self.challenger_streak = 0;
        }

        current
    }
}
