//! 명령줄 인자.
//!
//! `brokerops watch accounts`, `brokerops cluster step-down`,
//! `brokerops cluster peer-remove <NAME>`

use brokerops_core::config::OpsConfig;
use brokerops_core::models::telemetry::RankingKey;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// 메시지 브로커 운영 도구
#[derive(Parser, Debug)]
#[command(name = "brokerops")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// 요청 타임아웃 (밀리초, 기본: 설정 파일)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// 관리 API 요청/응답 페이로드 기록
    #[arg(long, global = true)]
    pub trace: bool,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', global = true, default_value = "info")]
    pub log_level: String,

    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// 실시간 사용량 감시
    Watch {
        #[command(subcommand)]
        target: WatchCommand,
    },
    /// 클러스터 관리
    Cluster {
        #[command(subcommand)]
        action: ClusterCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum WatchCommand {
    /// 계정별 연결/트래픽 순위
    Accounts(WatchAccountsArgs),
}

#[derive(Args, Debug)]
pub struct WatchAccountsArgs {
    /// 정렬 기준 (conns, subs, slow, sentb, sentm, recvb, recvm)
    #[arg(long, short = 's', default_value_t = RankingKey::Conns)]
    pub sort: RankingKey,

    /// 표시할 계정 수 (0: 화면 높이에 맞춤)
    #[arg(long, short = 'n')]
    pub number: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum ClusterCommand {
    /// 메타 리더 교체
    StepDown(StepDownArgs),
    /// 오프라인 피어를 메타 그룹에서 제거
    PeerRemove(PeerRemoveArgs),
}

#[derive(Args, Debug)]
pub struct StepDownArgs {
    /// 새 리더를 둘 클러스터
    #[arg(long)]
    pub cluster: Option<String>,

    /// 결과를 JSON으로 출력
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct PeerRemoveArgs {
    /// 제거할 피어 이름 또는 ID
    pub name: String,

    /// 확인 없이 제거
    #[arg(long, short = 'f')]
    pub force: bool,

    /// 결과를 JSON으로 출력
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// 설정 파일 값 위에 명령줄 값을 덮어쓴다
    pub fn apply(&self, mut config: OpsConfig) -> OpsConfig {
        if let Some(timeout) = self.timeout {
            config.request_timeout_ms = timeout;
        }
        if self.trace {
            config.trace = true;
        }
        if let Command::Watch {
            target: WatchCommand::Accounts(args),
        } = &self.command
        {
            if let Some(number) = args.number {
                config.watch.row_limit = number;
            }
        }
        config
    }
}
