//! JS 绑定
//!
//! `PoseSession` 在挂载时创建、卸载时调用 `dispose`。每个方法返回一个命令数组，
//! 形如 `[{ type: "dispatchFrame", ticket: 3 }, { type: "scheduleAnimationFrame" }]`，
//! 由 JS 侧逐条执行。

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::landmark::landmarks_from_flat;
use crate::metrics::compute_metrics;
use crate::playback::{
    ControllerCommand, ControllerConfig, PlaybackController, PlaybackSpeed, StepDirection,
};

fn to_js<T: Serialize>(value: &T) -> JsValue {
    // json_compatible: Option::None 输出为 null，map 输出为普通对象
    match value.serialize(&serde_wasm_bindgen::Serializer::json_compatible()) {
        Ok(js) => js,
        Err(err) => {
            tracing::warn!(error = %err, "Failed to marshal value for JS, returning null");
            JsValue::NULL
        }
    }
}

/// 单次计算一帧的指标，关键点为 4 × n 的扁平数组
#[wasm_bindgen(js_name = "computeMetrics")]
pub fn compute_metrics_flat(landmarks: &[f64]) -> JsValue {
    let points = landmarks_from_flat(landmarks);
    to_js(&compute_metrics(&points))
}

/// 视频播放与姿态分析会话
#[wasm_bindgen]
pub struct PoseSession {
    controller: Option<PlaybackController>,
}

#[wasm_bindgen]
impl PoseSession {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            controller: Some(PlaybackController::default()),
        }
    }

    /// 自定义节流与选侧迟滞
    ///
    /// # 参数
    /// - `throttle_ms`: 指标重算最小间隔，推荐 500
    /// - `side_margin`: 切换主导侧所需的可见度领先量，0 表示不设迟滞
    /// - `side_confirm_frames`: 切换主导侧所需的连续帧数，1 表示不设迟滞
    #[wasm_bindgen(js_name = "withTuning")]
    pub fn with_tuning(throttle_ms: f64, side_margin: f64, side_confirm_frames: u32) -> Self {
        let config = ControllerConfig {
            throttle_ms,
            persist_window_ms: throttle_ms,
            side_margin,
            side_confirm_frames,
            ..ControllerConfig::default()
        };
        Self {
            controller: Some(PlaybackController::new(config)),
        }
    }

    #[wasm_bindgen(js_name = "attachAssessment")]
    pub fn attach_assessment(&mut self, assessment_id: i32) {
        if let Some(ctrl) = self.controller.as_mut() {
            ctrl.attach_assessment(i64::from(assessment_id));
        }
    }

    #[wasm_bindgen(js_name = "detachAssessment")]
    pub fn detach_assessment(&mut self) {
        if let Some(ctrl) = self.controller.as_mut() {
            ctrl.detach_assessment();
        }
    }

    #[wasm_bindgen(js_name = "setDuration")]
    pub fn set_duration(&mut self, duration_secs: f64) {
        if let Some(ctrl) = self.controller.as_mut() {
            ctrl.set_duration(duration_secs);
        }
    }

    pub fn play(&mut self) -> JsValue {
        self.run(|c| c.play())
    }

    pub fn pause(&mut self) -> JsValue {
        self.run(|c| c.pause())
    }

    pub fn ended(&mut self) -> JsValue {
        self.run(|c| c.ended())
    }

    pub fn seeking(&mut self) {
        if let Some(ctrl) = self.controller.as_mut() {
            ctrl.seeking();
        }
    }

    pub fn seeked(&mut self) -> JsValue {
        self.run(|c| c.seeked())
    }

    #[wasm_bindgen(js_name = "animationFrame")]
    pub fn animation_frame(&mut self) -> JsValue {
        self.run(|c| c.animation_frame())
    }

    /// 方向键 → 步进；`forward` 为 false 表示后退
    pub fn step(&mut self, forward: bool, current_time_secs: f64) -> JsValue {
        let direction = if forward {
            StepDirection::Forward
        } else {
            StepDirection::Backward
        };
        self.run(|c| c.step(direction, current_time_secs))
    }

    /// 仅接受 0.25 / 0.5 / 1.0，其余值忽略
    #[wasm_bindgen(js_name = "setSpeed")]
    pub fn set_speed(&mut self, rate: f64) -> JsValue {
        match PlaybackSpeed::from_rate(rate) {
            Some(speed) => self.run(|c| c.set_speed(speed)),
            None => to_js(&Vec::<ControllerCommand>::new()),
        }
    }

    pub fn stop(&mut self) -> JsValue {
        self.run(|c| c.stop())
    }

    #[wasm_bindgen(js_name = "frameReady")]
    pub fn frame_ready(&mut self, ticket: u32, landmarks: &[f64], now_ms: f64) -> JsValue {
        let points = landmarks_from_flat(landmarks);
        self.run(|c| c.frame_ready(ticket, &points, now_ms))
    }

    #[wasm_bindgen(js_name = "frameFailed")]
    pub fn frame_failed(&mut self, ticket: u32, reason: &str, now_ms: f64) -> JsValue {
        self.run(|c| c.frame_failed(ticket, reason, now_ms))
    }

    #[wasm_bindgen(js_name = "persistFailed")]
    pub fn persist_failed(&self, reason: &str) {
        if let Some(ctrl) = self.controller.as_ref() {
            ctrl.persist_failed(reason);
        }
    }

    #[wasm_bindgen(js_name = "trackingLost")]
    pub fn tracking_lost(&self) -> bool {
        self.controller
            .as_ref()
            .map(|c| c.tracking_lost())
            .unwrap_or(false)
    }

    /// 卸载会话；之后所有调用都返回空命令数组
    pub fn dispose(&mut self) -> JsValue {
        match self.controller.take() {
            Some(ctrl) => to_js(&ctrl.dispose()),
            None => to_js(&Vec::<ControllerCommand>::new()),
        }
    }
}

impl Default for PoseSession {
    fn default() -> Self {
        Self::new()
    }
}

impl PoseSession {
    fn run<F>(&mut self, f: F) -> JsValue
    where
        F: FnOnce(&mut PlaybackController) -> Vec<ControllerCommand>,
    {
        let commands = self.controller.as_mut().map(f).unwrap_or_default();
        to_js(&commands)
    }
}
