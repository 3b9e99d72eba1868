//! 播放/帧同步控制器
//!
//! 基于视频元素传输状态的状态机：
//! Idle → Playing（逐动画帧请求关键点）→ PausedStable
//! Seeking / Stepping 在暂停状态下各处理恰好一帧，然后回到 PausedStable。
//!
//! 控制器不做任何 IO：每个事件方法返回宿主需要执行的 `ControllerCommand` 列表。
//! 宿主负责调度 requestAnimationFrame、调用姿态模型、发起持久化请求，
//! 并把结果带着派发时的 ticket 回传。ticket 不匹配的结果一律丢弃，
//! 因此 `stop`/`dispose` 之后不会有残留的续延被执行。

use serde::Serialize;

use crate::landmark::{Landmark, LandmarkSet};
use crate::metrics::{compute_metrics_for_side, BiomechanicsMetrics};
use crate::persistence::{BiomechanicsPayload, PersistGate};
use crate::side::{Side, SideTracker};

const TIME_EPSILON_SECS: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransportState {
    Idle,
    Playing,
    PausedStable,
    Seeking,
    Stepping,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackSpeed {
    Quarter,
    Half,
    Normal,
}

impl PlaybackSpeed {
    pub fn rate(self) -> f64 {
        match self {
            PlaybackSpeed::Quarter => 0.25,
            PlaybackSpeed::Half => 0.5,
            PlaybackSpeed::Normal => 1.0,
        }
    }

    pub fn from_rate(rate: f64) -> Option<Self> {
        [Self::Quarter, Self::Half, Self::Normal]
            .into_iter()
            .find(|s| (s.rate() - rate).abs() < 1e-9)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    Forward,
    Backward,
}

/// 宿主需要执行的副作用
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ControllerCommand {
    ScheduleAnimationFrame,
    CancelAnimationFrame,
    /// 将当前视频帧送入姿态模型，结果需携带此 ticket 回传
    DispatchFrame { ticket: u32 },
    SetPlaybackRate { rate: f64 },
    PauseVideo,
    SeekTo {
        #[serde(rename = "timeSecs")]
        time_secs: f64,
    },
    Persist { payload: BiomechanicsPayload },
    MetricsUpdated {
        metrics: Option<BiomechanicsMetrics>,
        #[serde(rename = "trackingLost")]
        tracking_lost: bool,
        side: Option<Side>,
    },
    /// 释放姿态模型实例
    ReleaseSource,
}

#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// 连续播放时两次指标重算的最小间隔（墙钟毫秒）
    pub throttle_ms: f64,
    /// 逐帧步进的时长（约 25fps 的一帧）
    pub step_secs: f64,
    /// 两次持久化之间的最小间隔
    pub persist_window_ms: f64,
    pub side_margin: f64,
    pub side_confirm_frames: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            throttle_ms: 500.0,
            step_secs: 0.04,
            persist_window_ms: 500.0,
            side_margin: 0.0,
            side_confirm_frames: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    /// 连续播放循环中的帧，受节流约束
    Continuous,
    /// seek/step 触发的单帧，绕过节流
    OneShot,
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    ticket: u32,
    kind: FrameKind,
}

#[derive(Debug)]
pub struct PlaybackController {
    config: ControllerConfig,
    state: TransportState,
    loop_active: bool,
    in_flight: Option<InFlight>,
    next_ticket: u32,
    pending_one_shot: bool,
    resume_after_seek: bool,
    last_tick_ms: Option<f64>,
    tracking_lost: bool,
    metrics: Option<BiomechanicsMetrics>,
    side: Option<Side>,
    side_tracker: SideTracker,
    duration_secs: Option<f64>,
    persist: PersistGate,
}

impl Default for PlaybackController {
    fn default() -> Self {
        Self::new(ControllerConfig::default())
    }
}

impl PlaybackController {
    pub fn new(config: ControllerConfig) -> Self {
        let side_tracker = SideTracker::new(config.side_margin, config.side_confirm_frames);
        let persist = PersistGate::new(config.persist_window_ms);
        Self {
            config,
            state: TransportState::Idle,
            loop_active: false,
            in_flight: None,
            next_ticket: 1,
            pending_one_shot: false,
            resume_after_seek: false,
            last_tick_ms: None,
            tracking_lost: false,
            metrics: None,
            side: None,
            side_tracker,
            duration_secs: None,
            persist,
        }
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn is_loop_active(&self) -> bool {
        self.loop_active
    }

    pub fn has_frame_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn tracking_lost(&self) -> bool {
        self.tracking_lost
    }

    pub fn metrics(&self) -> Option<BiomechanicsMetrics> {
        self.metrics
    }

    pub fn set_duration(&mut self, duration_secs: f64) {
        self.duration_secs = (duration_secs.is_finite() && duration_secs > 0.0).then_some(duration_secs);
    }

    pub fn attach_assessment(&mut self, assessment_id: i64) {
        self.persist.attach(assessment_id);
    }

    /// 解绑评估，之后不再产出持久化请求
    pub fn detach_assessment(&mut self) {
        self.persist.detach();
    }

    /// `play` 事件：启动连续帧循环
    ///
    /// 尚未派发的 seek/step 单帧随之作废，播放中的帧一律受节流约束。
    pub fn play(&mut self) -> Vec<ControllerCommand> {
        self.state = TransportState::Playing;
        self.resume_after_seek = false;
        self.pending_one_shot = false;
        if self.loop_active {
            return Vec::new();
        }
        self.loop_active = true;
        vec![ControllerCommand::ScheduleAnimationFrame]
    }

    /// `pause` 事件：同步停止连续帧循环
    ///
    /// 进行中的帧结果仍会被接收，用于刷新最后一帧的指标。
    pub fn pause(&mut self) -> Vec<ControllerCommand> {
        let commands = self.halt_loop();
        if !matches!(self.state, TransportState::Seeking | TransportState::Stepping) {
            self.state = TransportState::PausedStable;
        }
        self.resume_after_seek = false;
        commands
    }

    /// `ended` 事件，与暂停相同
    pub fn ended(&mut self) -> Vec<ControllerCommand> {
        self.pause()
    }

    /// 动画帧回调；循环已停止时不再派发任何工作
    pub fn animation_frame(&mut self) -> Vec<ControllerCommand> {
        if !self.loop_active {
            return Vec::new();
        }
        let mut commands = Vec::with_capacity(2);
        if self.in_flight.is_none() {
            commands.push(self.dispatch(FrameKind::Continuous));
        }
        commands.push(ControllerCommand::ScheduleAnimationFrame);
        commands
    }

    /// `seeking` 事件：记录拖动前传输是否处于播放中
    pub fn seeking(&mut self) {
        if self.state == TransportState::Playing {
            self.resume_after_seek = true;
        }
        if self.state != TransportState::Stepping {
            self.state = TransportState::Seeking;
        }
    }

    /// `seeked` 事件
    ///
    /// 暂停状态下立即处理一帧（绕过节流）；播放状态下恢复连续循环。
    pub fn seeked(&mut self) -> Vec<ControllerCommand> {
        let transport_playing = self.resume_after_seek || self.state == TransportState::Playing;
        self.resume_after_seek = false;

        if transport_playing {
            self.state = TransportState::Playing;
            self.pending_one_shot = false;
            if self.loop_active {
                return Vec::new();
            }
            self.loop_active = true;
            return vec![ControllerCommand::ScheduleAnimationFrame];
        }

        if self.state != TransportState::Stepping {
            self.state = TransportState::Seeking;
        }
        self.request_one_shot()
    }

    /// 前后步进一帧；先暂停，再跳转，跳转完成后的 `seeked` 处理该帧
    pub fn step(&mut self, direction: StepDirection, current_time_secs: f64) -> Vec<ControllerCommand> {
        let was_playing = self.state == TransportState::Playing;
        let mut commands = self.halt_loop();
        if was_playing {
            commands.push(ControllerCommand::PauseVideo);
        }
        self.resume_after_seek = false;
        self.state = TransportState::Stepping;

        let delta = match direction {
            StepDirection::Forward => self.config.step_secs,
            StepDirection::Backward => -self.config.step_secs,
        };
        let mut target = (current_time_secs + delta).max(0.0);
        if let Some(duration) = self.duration_secs {
            target = target.min(duration);
        }

        if (target - current_time_secs).abs() < TIME_EPSILON_SECS {
            // 已到边界，浏览器不会触发 seeked，直接处理当前帧
            commands.extend(self.request_one_shot());
        } else {
            commands.push(ControllerCommand::SeekTo { time_secs: target });
        }
        commands
    }

    /// 只改变视频的原生播放速率，节流仍按墙钟计算
    pub fn set_speed(&mut self, speed: PlaybackSpeed) -> Vec<ControllerCommand> {
        vec![ControllerCommand::SetPlaybackRate { rate: speed.rate() }]
    }

    /// 显式停止：停止循环并作废进行中的帧
    pub fn stop(&mut self) -> Vec<ControllerCommand> {
        let commands = self.halt_loop();
        if let Some(flight) = self.in_flight.take() {
            tracing::debug!(ticket = flight.ticket, "Invalidating in-flight frame on stop");
        }
        self.pending_one_shot = false;
        self.resume_after_seek = false;
        self.state = TransportState::Idle;
        commands
    }

    /// 卸载：消费控制器，返回最后需要执行的清理命令
    pub fn dispose(mut self) -> Vec<ControllerCommand> {
        self.stop();
        vec![
            ControllerCommand::CancelAnimationFrame,
            ControllerCommand::ReleaseSource,
        ]
    }

    /// 姿态模型返回结果
    pub fn frame_ready(
        &mut self,
        ticket: u32,
        landmarks: &[Landmark],
        now_ms: f64,
    ) -> Vec<ControllerCommand> {
        let Some(flight) = self.claim(ticket) else {
            return Vec::new();
        };
        let mut commands = self.apply_frame(flight.kind, landmarks, now_ms);
        commands.extend(self.after_frame(flight.kind));
        commands
    }

    /// 姿态模型抛错：记录日志并按"本帧无关键点"处理
    pub fn frame_failed(&mut self, ticket: u32, reason: &str, now_ms: f64) -> Vec<ControllerCommand> {
        let Some(flight) = self.claim(ticket) else {
            return Vec::new();
        };
        tracing::warn!(ticket, reason, "Landmark source failed, treating frame as empty");
        let mut commands = self.apply_frame(flight.kind, &[], now_ms);
        commands.extend(self.after_frame(flight.kind));
        commands
    }

    /// 宿主上报持久化失败；不重试
    pub fn persist_failed(&self, reason: &str) {
        self.persist.report_failure(reason);
    }

    fn halt_loop(&mut self) -> Vec<ControllerCommand> {
        if self.loop_active {
            self.loop_active = false;
            vec![ControllerCommand::CancelAnimationFrame]
        } else {
            Vec::new()
        }
    }

    fn dispatch(&mut self, kind: FrameKind) -> ControllerCommand {
        let ticket = self.next_ticket;
        self.next_ticket = self.next_ticket.wrapping_add(1).max(1);
        self.in_flight = Some(InFlight { ticket, kind });
        ControllerCommand::DispatchFrame { ticket }
    }

    fn request_one_shot(&mut self) -> Vec<ControllerCommand> {
        if self.in_flight.is_some() {
            // 单帧守卫：等进行中的帧返回后再派发
            self.pending_one_shot = true;
            return Vec::new();
        }
        vec![self.dispatch(FrameKind::OneShot)]
    }

    fn claim(&mut self, ticket: u32) -> Option<InFlight> {
        match self.in_flight {
            Some(flight) if flight.ticket == ticket => {
                self.in_flight = None;
                Some(flight)
            }
            _ => {
                tracing::debug!(ticket, "Dropping stale frame result");
                None
            }
        }
    }

    fn apply_frame(
        &mut self,
        kind: FrameKind,
        landmarks: &[Landmark],
        now_ms: f64,
    ) -> Vec<ControllerCommand> {
        if landmarks.is_empty() {
            if self.tracking_lost {
                return Vec::new();
            }
            self.tracking_lost = true;
            self.metrics = None;
            self.side = None;
            return vec![self.metrics_update()];
        }

        let recovered = std::mem::replace(&mut self.tracking_lost, false);
        let due = kind == FrameKind::OneShot
            || self
                .last_tick_ms
                .map_or(true, |last| now_ms - last >= self.config.throttle_ms);
        if !due {
            return if recovered {
                vec![self.metrics_update()]
            } else {
                Vec::new()
            };
        }

        self.last_tick_ms = Some(now_ms);
        let (metrics, side) = match LandmarkSet::new(landmarks) {
            Some(set) => {
                let side = self.side_tracker.observe(&set);
                (compute_metrics_for_side(&set, side), Some(side))
            }
            None => (None, None),
        };
        self.metrics = metrics;
        self.side = side;

        let mut commands = vec![self.metrics_update()];
        if let Some(metrics) = metrics {
            if let Some(payload) = self.persist.offer(metrics, now_ms) {
                commands.push(ControllerCommand::Persist { payload });
            }
        }
        commands
    }

    fn after_frame(&mut self, kind: FrameKind) -> Vec<ControllerCommand> {
        if self.pending_one_shot && self.state != TransportState::Playing {
            self.pending_one_shot = false;
            return vec![self.dispatch(FrameKind::OneShot)];
        }
        if kind == FrameKind::OneShot
            && matches!(self.state, TransportState::Seeking | TransportState::Stepping)
        {
            self.state = TransportState::PausedStable;
        }
        Vec::new()
    }

    fn metrics_update(&self) -> ControllerCommand {
        ControllerCommand::MetricsUpdated {
            metrics: self.metrics,
            tracking_lost: self.tracking_lost,
            side: self.side,
        }
    }
}
