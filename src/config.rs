use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use std::fmt;

use crate::constants::DEFAULT_RECOMMENDATION_LIMIT;

#[derive(Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub enable_file_logs: bool,
    pub log_dir: String,
    pub sled_path: String,
    pub cors_origin: String,
    pub trust_proxy: bool,
    pub rate_limit: RateLimitConfig,
    pub coaching: CoachingConfig,
    pub llm: LLMConfig,
}

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub window_secs: u64,
    pub max_requests: u64,
}

#[derive(Debug, Clone)]
pub struct CoachingConfig {
    pub recommendation_default_limit: usize,
    pub feedback: FeedbackThresholds,
}

/// 指标 → 问题短语的判定阈值
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeedbackThresholds {
    /// 臂位角低于此值判为 "low arm slot"
    pub low_arm_slot_deg: i32,
    /// 膝角高于此值判为 "stiff front leg"
    pub stiff_knee_deg: i32,
    /// 膝角低于此值判为 "over-bent knee"
    pub deep_knee_deg: i32,
    /// 扭转分离度低于此值判为 "poor hip shoulder separation"
    pub min_torque_pct: i32,
}

impl Default for FeedbackThresholds {
    fn default() -> Self {
        Self {
            low_arm_slot_deg: 70,
            stiff_knee_deg: 165,
            deep_knee_deg: 100,
            min_torque_pct: 10,
        }
    }
}

impl Default for CoachingConfig {
    fn default() -> Self {
        Self {
            recommendation_default_limit: DEFAULT_RECOMMENDATION_LIMIT,
            feedback: FeedbackThresholds::default(),
        }
    }
}

#[derive(Clone)]
pub struct LLMConfig {
    pub enabled: bool,
    pub mock: bool,
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            mock: true,
            api_url: String::new(),
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
            timeout_secs: 30,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("log_level", &self.log_level)
            .field("enable_file_logs", &self.enable_file_logs)
            .field("log_dir", &self.log_dir)
            .field("sled_path", &self.sled_path)
            .field("cors_origin", &self.cors_origin)
            .field("trust_proxy", &self.trust_proxy)
            .field("rate_limit", &self.rate_limit)
            .field("coaching", &self.coaching)
            .field("llm", &self.llm)
            .finish()
    }
}

impl fmt::Debug for LLMConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LLMConfig")
            .field("enabled", &self.enabled)
            .field("mock", &self.mock)
            .field("api_url", &self.api_url)
            .field("api_key", &"***REDACTED***")
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Self {
        let feedback_defaults = FeedbackThresholds::default();
        let llm_defaults = LLMConfig::default();

        Self {
            host: env_or_parse("HOST", IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))),
            port: env_or_parse("PORT", 3000_u16),
            log_level: env_or("RUST_LOG", "info"),
            enable_file_logs: env_or_bool("ENABLE_FILE_LOGS", false),
            log_dir: env_or("LOG_DIR", "./logs"),
            sled_path: env_or("SLED_PATH", "./data/pitchlab.sled"),
            cors_origin: env_or("CORS_ORIGIN", "http://localhost:5173"),
            trust_proxy: env_or_bool("TRUST_PROXY", false),
            rate_limit: RateLimitConfig {
                window_secs: env_or_parse("RATE_LIMIT_WINDOW_SECS", 900_u64),
                max_requests: env_or_parse("RATE_LIMIT_MAX", 500_u64),
            },
            coaching: CoachingConfig {
                recommendation_default_limit: env_or_parse(
                    "RECOMMENDATION_DEFAULT_LIMIT",
                    DEFAULT_RECOMMENDATION_LIMIT,
                ),
                feedback: FeedbackThresholds {
                    low_arm_slot_deg: env_or_parse(
                        "FEEDBACK_LOW_ARM_SLOT_DEG",
                        feedback_defaults.low_arm_slot_deg,
                    ),
                    stiff_knee_deg: env_or_parse(
                        "FEEDBACK_STIFF_KNEE_DEG",
                        feedback_defaults.stiff_knee_deg,
                    ),
                    deep_knee_deg: env_or_parse(
                        "FEEDBACK_DEEP_KNEE_DEG",
                        feedback_defaults.deep_knee_deg,
                    ),
                    min_torque_pct: env_or_parse(
                        "FEEDBACK_MIN_TORQUE_PCT",
                        feedback_defaults.min_torque_pct,
                    ),
                },
            },
            llm: LLMConfig {
                enabled: env_or_bool("LLM_ENABLED", llm_defaults.enabled),
                mock: env_or_bool("LLM_MOCK", llm_defaults.mock),
                api_url: env_or("LLM_API_URL", ""),
                api_key: env_or("LLM_API_KEY", ""),
                model: env_or("LLM_MODEL", &llm_defaults.model),
                timeout_secs: env_or_parse("LLM_TIMEOUT_SECS", llm_defaults.timeout_secs),
            },
        }
    }
}

pub fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn env_or_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match env::var(key) {
        Ok(raw) => match raw.parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(
                    key,
                    value = %raw,
                    "Failed to parse env var, using default"
                );
                default
            }
        },
        Err(_) => default,
    }
}

pub fn env_or_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Mutex, OnceLock};

    use super::*;

    fn env_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }

    fn managed_keys() -> &'static [&'static str] {
        &[
            "HOST",
            "PORT",
            "RUST_LOG",
            "RATE_LIMIT_MAX",
            "LLM_ENABLED",
            "LLM_TIMEOUT_SECS",
            "LLM_MOCK",
            "RECOMMENDATION_DEFAULT_LIMIT",
            "FEEDBACK_MIN_TORQUE_PCT",
        ]
    }

    fn clear_keys(keys: &[&str]) {
        for key in keys {
            env::remove_var(key);
        }
    }

    #[test]
    fn loads_defaults_when_missing() {
        let _guard = env_lock().lock().expect("env lock");
        clear_keys(managed_keys());

        let cfg = Config::from_env();
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.rate_limit.max_requests, 500);
        assert_eq!(cfg.coaching.recommendation_default_limit, 3);
        assert_eq!(cfg.coaching.feedback, FeedbackThresholds::default());
        assert!(!cfg.llm.enabled);
    }

    #[test]
    fn parses_numeric_values() {
        let _guard = env_lock().lock().expect("env lock");
        clear_keys(managed_keys());

        env::set_var("PORT", "4000");
        env::set_var("RATE_LIMIT_MAX", "100");
        env::set_var("LLM_TIMEOUT_SECS", "42");
        env::set_var("FEEDBACK_MIN_TORQUE_PCT", "15");

        let cfg = Config::from_env();
        assert_eq!(cfg.port, 4000);
        assert_eq!(cfg.rate_limit.max_requests, 100);
        assert_eq!(cfg.llm.timeout_secs, 42);
        assert_eq!(cfg.coaching.feedback.min_torque_pct, 15);
        clear_keys(managed_keys());
    }

    #[test]
    fn invalid_values_fall_back() {
        let _guard = env_lock().lock().expect("env lock");
        clear_keys(managed_keys());

        env::set_var("PORT", "bad");
        env::set_var("RECOMMENDATION_DEFAULT_LIMIT", "x");

        let cfg = Config::from_env();
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.coaching.recommendation_default_limit, 3);
        clear_keys(managed_keys());
    }

    #[test]
    fn feature_flags_isolation() {
        let _guard = env_lock().lock().expect("env lock");
        clear_keys(managed_keys());

        env::set_var("LLM_ENABLED", "true");
        env::set_var("LLM_MOCK", "false");

        let cfg = Config::from_env();
        assert!(cfg.llm.enabled);
        assert!(!cfg.llm.mock);
        clear_keys(managed_keys());
    }

    #[test]
    fn debug_redacts_api_key() {
        let llm = LLMConfig {
            api_key: "sk-secret".to_string(),
            ..LLMConfig::default()
        };
        let text = format!("{llm:?}");
        assert!(!text.contains("sk-secret"));
        assert!(text.contains("REDACTED"));
    }
}
