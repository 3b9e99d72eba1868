use std::sync::Arc;

use axum::Router;
use tempfile::TempDir;
use tokio::sync::broadcast;

use pitchlab_backend::config::{
    CoachingConfig, Config, FeedbackThresholds, LLMConfig, RateLimitConfig,
};
use pitchlab_backend::routes::build_router;
use pitchlab_backend::state::AppState;
use pitchlab_backend::store::Store;

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub config: Config,
    _temp_dir: TempDir,
}

pub struct TestOptions {
    pub api_limit: u64,
    pub llm: LLMConfig,
    pub run_migrations: bool,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            api_limit: 100,
            llm: LLMConfig::default(),
            run_migrations: true,
        }
    }
}

pub async fn spawn_with(options: TestOptions) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("tempdir");
    let sled_path = temp_dir.path().join("pitchlab-test.sled");

    // 直接构造 Config，避免 set_var 在并行测试中产生竞态
    let config = Config {
        host: std::net::IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
        port: 3000,
        log_level: "info".to_string(),
        enable_file_logs: false,
        log_dir: "./logs".to_string(),
        sled_path: sled_path.to_string_lossy().to_string(),
        cors_origin: "http://localhost:5173".to_string(),
        trust_proxy: false,
        rate_limit: RateLimitConfig {
            window_secs: 60,
            max_requests: options.api_limit,
        },
        coaching: CoachingConfig {
            recommendation_default_limit: 3,
            feedback: FeedbackThresholds::default(),
        },
        llm: options.llm,
    };

    let store = Arc::new(Store::open(&config.sled_path).expect("open store"));
    if options.run_migrations {
        store.run_migrations().expect("run migrations");
    }

    let (shutdown_tx, _) = broadcast::channel::<()>(8);
    let state = AppState::new(store, &config, shutdown_tx);
    let app = build_router(state.clone());

    TestApp {
        app,
        state,
        config,
        _temp_dir: temp_dir,
    }
}

pub async fn spawn_test_server() -> TestApp {
    spawn_with(TestOptions::default()).await
}

pub async fn spawn_test_server_with_limit(api_limit: u64) -> TestApp {
    spawn_with(TestOptions {
        api_limit,
        ..TestOptions::default()
    })
    .await
}

pub async fn spawn_mock_llm_server() -> TestApp {
    spawn_with(TestOptions {
        llm: LLMConfig {
            enabled: true,
            mock: true,
            ..LLMConfig::default()
        },
        ..TestOptions::default()
    })
    .await
}

/// 未执行迁移的空库，用于空知识库场景
pub async fn spawn_empty_server() -> TestApp {
    spawn_with(TestOptions {
        run_migrations: false,
        ..TestOptions::default()
    })
    .await
}
