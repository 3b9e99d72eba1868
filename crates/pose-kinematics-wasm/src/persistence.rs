//! 指标持久化门控
//!
//! 控制器每个节流窗口最多产出一次持久化请求，由宿主发往后端。
//! 投递语义为最多一次：失败只记录日志，不重试，下一窗口的新值会覆盖丢失的值。

use serde::{Deserialize, Serialize};

use crate::metrics::BiomechanicsMetrics;

/// 持久化接口的请求体
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiomechanicsPayload {
    pub assessment_id: i64,
    #[serde(flatten)]
    pub metrics: BiomechanicsMetrics,
}

#[derive(Debug, Clone)]
pub struct PersistGate {
    window_ms: f64,
    assessment_id: Option<i64>,
    last_sent_ms: Option<f64>,
}

impl PersistGate {
    pub fn new(window_ms: f64) -> Self {
        Self {
            window_ms,
            assessment_id: None,
            last_sent_ms: None,
        }
    }

    /// 绑定评估 ID；切换到新的评估时重置窗口
    pub fn attach(&mut self, assessment_id: i64) {
        if self.assessment_id != Some(assessment_id) {
            self.last_sent_ms = None;
        }
        self.assessment_id = Some(assessment_id);
    }

    pub fn detach(&mut self) {
        self.assessment_id = None;
        self.last_sent_ms = None;
    }

    /// 窗口已到期且绑定了评估时返回待发送的请求体
    pub fn offer(&mut self, metrics: BiomechanicsMetrics, now_ms: f64) -> Option<BiomechanicsPayload> {
        let assessment_id = self.assessment_id?;
        if let Some(last) = self.last_sent_ms {
            if now_ms - last < self.window_ms {
                return None;
            }
        }
        self.last_sent_ms = Some(now_ms);
        Some(BiomechanicsPayload {
            assessment_id,
            metrics,
        })
    }

    pub fn report_failure(&self, reason: &str) {
        tracing::warn!(
            assessment_id = ?self.assessment_id,
            reason,
            "Biomechanics persist failed, dropping snapshot"
        );
    }
}
