//! 명령 디스패치.
//!
//! 파싱된 명령을 주입된 포트 위에서 실행하고 결과를 종료 코드로 바꾼다.

use brokerops_cluster::admin::AdminApi;
use brokerops_cluster::peer_removal::{PeerRemoval, PeerRemovalOutcome};
use brokerops_cluster::stand_down::{LeaderStandDown, StandDownOutcome};
use brokerops_core::config::OpsConfig;
use brokerops_core::error::CoreError;
use brokerops_core::ports::cluster::{ClusterControl, ClusterStateSource};
use brokerops_core::ports::display::{Confirmer, RenderSurface};
use brokerops_core::ports::transport::MessageBus;
use brokerops_telemetry::dashboard::LiveDashboard;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::cli::{Cli, ClusterCommand, Command, WatchCommand};

/// 명령 실행에 필요한 외부 협력자
pub struct Collaborators {
    pub bus: Arc<dyn MessageBus>,
    pub state_source: Arc<dyn ClusterStateSource>,
    pub control: Arc<dyn ClusterControl>,
    pub confirmer: Arc<dyn Confirmer>,
    pub surface: Box<dyn RenderSurface>,
}

impl Collaborators {
    /// 메시지 버스 하나로 관리 API까지 구성
    pub fn over_bus(
        bus: Arc<dyn MessageBus>,
        config: &OpsConfig,
        confirmer: Arc<dyn Confirmer>,
        surface: Box<dyn RenderSurface>,
    ) -> Self {
        let admin = Arc::new(AdminApi::new(bus.clone(), config));
        Self {
            bus,
            state_source: admin.clone(),
            control: admin,
            confirmer,
            surface,
        }
    }
}

/// 명령 실행 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// 대시보드가 종료 신호로 끝남
    Watched,
    /// 리더 교체 결과
    StandDown { outcome: StandDownOutcome, json: bool },
    /// 피어 제거 결과
    PeerRemoval {
        outcome: PeerRemovalOutcome,
        json: bool,
    },
    /// 종료 신호로 클러스터 작업 중단
    Interrupted,
}

/// SIGINT로 중단된 명령의 종료 코드
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

impl CommandOutcome {
    /// 프로세스 종료 코드
    ///
    /// 리더가 바뀌지 않은 교체는 에러는 아니지만 실패로 끝낸다.
    pub fn exit_code(&self) -> i32 {
        match self {
            CommandOutcome::StandDown { outcome, .. } if !outcome.is_converged() => 1,
            CommandOutcome::Interrupted => INTERRUPTED_EXIT_CODE,
            _ => 0,
        }
    }

    /// 표준 출력에 쓸 보고서 (없으면 None)
    pub fn report(&self) -> Result<Option<String>, CoreError> {
        let report = match self {
            CommandOutcome::Watched | CommandOutcome::Interrupted => None,
            CommandOutcome::StandDown { outcome, json } => Some(if *json {
                serde_json::to_string_pretty(outcome)?
            } else {
                outcome.summary()
            }),
            CommandOutcome::PeerRemoval { outcome, json } => Some(if *json {
                serde_json::to_string_pretty(outcome)?
            } else {
                outcome.summary()
            }),
        };
        Ok(report)
    }
}

/// 명령 실행
///
/// `config`는 명령줄 덮어쓰기가 이미 적용된 값이어야 한다.
pub async fn dispatch(
    cli: &Cli,
    config: &OpsConfig,
    collaborators: &mut Collaborators,
    shutdown_rx: watch::Receiver<bool>,
) -> Result<CommandOutcome, CoreError> {
    match &cli.command {
        Command::Watch {
            target: WatchCommand::Accounts(args),
        } => {
            let height = collaborators.surface.height();
            let dashboard =
                LiveDashboard::new(collaborators.bus.clone(), &config.watch, args.sort, height)?;
            dashboard
                .run(&mut *collaborators.surface, shutdown_rx)
                .await?;
            info!("계정 감시 종료");
            Ok(CommandOutcome::Watched)
        }
        Command::Cluster {
            action: ClusterCommand::StepDown(args),
        } => {
            let mut operation = LeaderStandDown::new(
                collaborators.state_source.clone(),
                collaborators.control.clone(),
                &config.stand_down,
            )
            .with_placement(args.cluster.clone());
            let finished = until_shutdown(operation.run(), shutdown_rx).await?;
            match finished {
                Some(outcome) => Ok(CommandOutcome::StandDown {
                    outcome,
                    json: args.json,
                }),
                None => {
                    warn!("리더 교체 중단 (단계: {:?})", operation.phase());
                    Ok(CommandOutcome::Interrupted)
                }
            }
        }
        Command::Cluster {
            action: ClusterCommand::PeerRemove(args),
        } => {
            let removal = PeerRemoval::new(
                collaborators.state_source.clone(),
                collaborators.control.clone(),
                collaborators.confirmer.clone(),
            );
            match until_shutdown(removal.run(&args.name, args.force), shutdown_rx).await? {
                Some(outcome) => Ok(CommandOutcome::PeerRemoval {
                    outcome,
                    json: args.json,
                }),
                None => {
                    warn!("피어 제거 중단: {}", args.name);
                    Ok(CommandOutcome::Interrupted)
                }
            }
        }
    }
}

/// 종료 신호가 먼저 오면 작업을 버리고 `None`
///
/// 이미 종료 신호가 켜져 있으면 작업을 시작하지 않는다.
async fn until_shutdown<T, F>(
    work: F,
    mut shutdown_rx: watch::Receiver<bool>,
) -> Result<Option<T>, CoreError>
where
    F: Future<Output = Result<T, CoreError>>,
{
    tokio::select! {
        biased;
        _ = shutdown_signalled(&mut shutdown_rx) => Ok(None),
        result = work => result.map(Some),
    }
}

async fn shutdown_signalled(shutdown_rx: &mut watch::Receiver<bool>) {
    let closed = shutdown_rx.wait_for(|stop| *stop).await.is_err();
    // 송신자가 사라지면 신호는 더 오지 않는다
    if closed {
        std::future::pending::<()>().await;
    }
}
