//! 姿态关键点模块
//!
//! 定义 MediaPipe Pose 输出的单个关键点、33 点关键点集合，以及从 JS 侧
//! 扁平 `Float64Array` 解析关键点的工具函数。

use serde::{Deserialize, Serialize};

/// MediaPipe Pose 关键点总数
pub const POSE_LANDMARK_COUNT: usize = 33;

/// JS 侧每个关键点占用的浮点数个数: x, y, z, visibility
pub const FLAT_STRIDE: usize = 4;

pub const LEFT_SHOULDER: usize = 11;
pub const RIGHT_SHOULDER: usize = 12;
pub const LEFT_ELBOW: usize = 13;
pub const RIGHT_ELBOW: usize = 14;
pub const LEFT_WRIST: usize = 15;
pub const RIGHT_WRIST: usize = 16;
pub const LEFT_HIP: usize = 23;
pub const RIGHT_HIP: usize = 24;
pub const LEFT_KNEE: usize = 25;
pub const RIGHT_KNEE: usize = 26;
pub const LEFT_ANKLE: usize = 27;
pub const RIGHT_ANKLE: usize = 28;

/// 单个关键点（归一化坐标）
///
/// `visibility` 缺省时按 0 处理。
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
    #[serde(default)]
    pub visibility: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64, z: f64, visibility: f64) -> Self {
        Self { x, y, z, visibility }
    }

    pub fn is_visible(&self, min_visibility: f64) -> bool {
        self.visibility >= min_visibility
    }
}

/// 经过长度校验的关键点集合
///
/// 少于 33 个关键点的输入无法构造，下游指标计算因此不需要再做越界检查。
#[derive(Debug, Clone, Copy)]
pub struct LandmarkSet<'a> {
    points: &'a [Landmark],
}

impl<'a> LandmarkSet<'a> {
    pub fn new(points: &'a [Landmark]) -> Option<Self> {
        if points.len() < POSE_LANDMARK_COUNT {
            return None;
        }
        Some(Self { points })
    }

    pub fn get(&self, index: usize) -> &Landmark {
        &self.points[index]
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// 解析 JS 传入的扁平数组（每 4 个数为一个关键点）
///
/// 末尾不足 4 个数的残片直接丢弃。
pub fn landmarks_from_flat(data: &[f64]) -> Vec<Landmark> {
    data.chunks_exact(FLAT_STRIDE)
        .map(|c| Landmark::new(c[0], c[1], c[2], c[3]))
        .collect()
}
