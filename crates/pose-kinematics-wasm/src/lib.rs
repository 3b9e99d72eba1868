//! 投球生物力学 WASM 库
//!
//! 本库从 MediaPipe Pose 的 33 个关键点中提取投球相关的关节角度，并协调视频
//! 播放状态与关键点请求的节奏。编译为 WebAssembly 在浏览器端运行，同时以
//! rlib 形式供后端复用指标计算。
//!
//! ## 模块
//! - `landmark`: 关键点与 33 点集合
//! - `side`: 主导侧选择（含可选迟滞）
//! - `angles`: 三点关节角
//! - `metrics`: 臂位角 / 膝屈曲 / 扭转分离度聚合
//! - `persistence`: 持久化请求体与窗口门控
//! - `playback`: 播放/帧同步状态机
//! - `session`: JS 绑定

pub mod angles;
pub mod landmark;
pub mod metrics;
pub mod persistence;
pub mod playback;
pub mod session;
pub mod side;

// 重新导出核心类型，方便外部使用
pub use angles::joint_angle;
pub use landmark::{Landmark, LandmarkSet, POSE_LANDMARK_COUNT};
pub use metrics::{compute_metrics, compute_metrics_for_side, BiomechanicsMetrics, MIN_VISIBILITY};
pub use persistence::BiomechanicsPayload;
pub use playback::{ControllerCommand, ControllerConfig, PlaybackController, TransportState};
pub use session::PoseSession;
pub use side::{select_dominant_side, Side, SideTracker};
