//! # brokerops-app
//!
//! BROKEROPS 명령 진입점.
//! 명령줄 파싱, 설정 로드/덮어쓰기, 로깅, 종료 시그널, 명령 디스패치.
//!
//! 브로커 클라이언트(`MessageBus` 구현)는 호스트 바이너리가 주입한다:
//!
//! ```ignore
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let cli = brokerops_app::cli::Cli::parse();
//!     let bus = Arc::new(MyBrokerClient::connect(..).await?);
//!     std::process::exit(brokerops_app::run(cli, bus).await?);
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod lifecycle;
pub mod logging;
pub mod prompt;

use anyhow::{Context, Result};
use brokerops_core::config::OpsConfig;
use brokerops_core::config_manager::ConfigManager;
use brokerops_core::ports::transport::MessageBus;
use brokerops_telemetry::terminal::TerminalSurface;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::cli::Cli;
use crate::commands::{dispatch, Collaborators};
use crate::lifecycle::LifecycleManager;
use crate::prompt::StdinConfirmer;

/// 설정 파일 로드 후 명령줄 값 적용
///
/// 설정 파일을 읽을 수 없으면 기본값으로 계속한다.
pub fn load_config(cli: &Cli) -> OpsConfig {
    let manager = match &cli.config {
        Some(path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };

    let base = match manager {
        Ok(manager) => {
            info!("설정 파일: {:?}", manager.config_path());
            manager.get()
        }
        Err(e) => {
            warn!("설정 파일 로드 실패, 기본 설정 사용: {e}");
            OpsConfig::default_config()
        }
    };
    cli.apply(base)
}

/// 명령 실행 후 종료 코드 반환
pub async fn run(cli: Cli, bus: Arc<dyn MessageBus>) -> Result<i32> {
    logging::init(&cli.log_level);
    let config = load_config(&cli);

    let lifecycle = Arc::new(LifecycleManager::new());
    let signal_task = {
        let lifecycle = lifecycle.clone();
        tokio::spawn(async move {
            if let Err(e) = lifecycle.wait_for_signal().await {
                error!("시그널 핸들러 등록 실패: {e}");
            }
        })
    };

    let mut collaborators = Collaborators::over_bus(
        bus,
        &config,
        Arc::new(StdinConfirmer),
        Box::new(TerminalSurface::stdout()),
    );

    let result = dispatch(&cli, &config, &mut collaborators, lifecycle.subscribe()).await;
    signal_task.abort();

    match result {
        Ok(outcome) => {
            if let Some(report) = outcome.report().context("결과 출력 실패")? {
                println!("{report}");
            }
            Ok(outcome.exit_code())
        }
        Err(e) => {
            error!("{e}");
            eprintln!("brokerops: {e}");
            Ok(1)
        }
    }
}
