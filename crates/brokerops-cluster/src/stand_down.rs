//! 메타 리더 교체.
//!
//! `Idle → CommandIssued → Polling → Converged | TimedOut`
//!
//! 교체 명령은 한 번만 보내고, 클러스터 상태를 제한 폴링해
//! 리더가 바뀌었는지 확인한다. 종료 후 재개는 없다.

use brokerops_core::config::StandDownConfig;
use brokerops_core::error::CoreError;
use brokerops_core::models::cluster::Placement;
use brokerops_core::ports::cluster::{ClusterControl, ClusterStateSource};
use serde::{Serialize, Serializer};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::poll::{BoundedPoll, PollOutcome};

/// 진행 단계
///
/// 작업이 중간에 취소되면 마지막 단계로 교체 명령이 나갔는지 알 수 있다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandDownPhase {
    /// 시작 전
    Idle,
    /// 교체 명령 전송 완료
    CommandIssued,
    /// 상태 폴링 중
    Polling,
    /// 새 리더 확인
    Converged,
    /// 시도 횟수 소진
    TimedOut,
}

/// 리더 교체 결과
///
/// 시간 초과는 에러가 아니라 별도 결과다. 명령 자체는 수락되었지만
/// 제한 안에 리더 변경을 관찰하지 못한 경우.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StandDownOutcome {
    /// 새 리더 선출
    Converged {
        previous_leader: String,
        new_leader: String,
        attempts: u32,
        #[serde(rename = "elapsed_ms", serialize_with = "as_millis")]
        elapsed: Duration,
    },
    /// 리더 변경 미확인
    TimedOut {
        previous_leader: String,
        attempts: u32,
        #[serde(rename = "elapsed_ms", serialize_with = "as_millis")]
        elapsed: Duration,
    },
}

impl StandDownOutcome {
    /// 새 리더가 선출되었는지
    pub fn is_converged(&self) -> bool {
        matches!(self, StandDownOutcome::Converged { .. })
    }

    /// 운영자에게 보여줄 한 줄 요약
    pub fn summary(&self) -> String {
        match self {
            StandDownOutcome::Converged {
                new_leader,
                elapsed,
                ..
            } => format!(
                "New leader elected: {new_leader} (after {})",
                format_elapsed(*elapsed)
            ),
            StandDownOutcome::TimedOut {
                previous_leader,
                elapsed,
                ..
            } => format!(
                "Leader did not change after {}, still {previous_leader}",
                format_elapsed(*elapsed)
            ),
        }
    }
}

fn as_millis<S: Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(elapsed.as_millis() as u64)
}

fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.1}s", elapsed.as_secs_f64())
}

/// 메타 리더 교체 작업
pub struct LeaderStandDown {
    state_source: Arc<dyn ClusterStateSource>,
    control: Arc<dyn ClusterControl>,
    poll: BoundedPoll,
    placement: Option<Placement>,
    phase: StandDownPhase,
}

impl LeaderStandDown {
    /// 설정의 폴링 간격/횟수로 생성
    pub fn new(
        state_source: Arc<dyn ClusterStateSource>,
        control: Arc<dyn ClusterControl>,
        config: &StandDownConfig,
    ) -> Self {
        Self {
            state_source,
            control,
            poll: BoundedPoll::new(config.poll_interval(), config.max_attempts),
            placement: None,
            phase: StandDownPhase::Idle,
        }
    }

    /// 새 리더를 둘 클러스터 제한 (빈 문자열은 제한 없음)
    pub fn with_placement(mut self, cluster: Option<String>) -> Self {
        self.placement = cluster
            .filter(|c| !c.is_empty())
            .map(|cluster| Placement { cluster });
        self
    }

    /// 현재 단계
    pub fn phase(&self) -> StandDownPhase {
        self.phase
    }

    fn enter(&mut self, phase: StandDownPhase) {
        debug!("리더 교체 단계: {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }

    /// 교체 실행
    ///
    /// 최초 상태 조회와 명령 전송 실패는 즉시 에러. 폴링 중 실패는 경고 후 계속.
    pub async fn run(&mut self) -> Result<StandDownOutcome, CoreError> {
        let state = self.state_source.cluster_state().await?;
        if !state.has_leader() {
            return Err(CoreError::NoLeader);
        }
        let previous_leader = state.leader.clone();

        info!(
            "메타 리더 교체 요청: 현재 리더 {previous_leader}, RAFT 그룹 크기 {}",
            state.raft_group_size()
        );
        if let Some(placement) = &self.placement {
            info!("새 리더 배치 제한: 클러스터 {}", placement.cluster);
        }

        self.control
            .meta_leader_stand_down(self.placement.as_ref())
            .await?;
        self.enter(StandDownPhase::CommandIssued);

        info!(
            "새 리더 확인: {}ms 간격, 최대 {}회",
            self.poll.interval().as_millis(),
            self.poll.max_attempts()
        );
        self.enter(StandDownPhase::Polling);
        let source = Arc::clone(&self.state_source);
        let outcome = self
            .poll
            .run(|attempt| {
                let source = Arc::clone(&source);
                let previous = previous_leader.clone();
                async move {
                    source.cluster_state().await.map(|state| {
                        // 빈 리더는 선거 진행 중이라 아직 수렴이 아니다
                        if state.has_leader() && state.leader != previous {
                            Some(state.leader)
                        } else {
                            debug!("리더 변경 대기 중 ({attempt}): {}", state.leader);
                            None
                        }
                    })
                }
            })
            .await;

        let result = match outcome {
            PollOutcome::Converged {
                value,
                attempts,
                elapsed,
            } => {
                self.enter(StandDownPhase::Converged);
                StandDownOutcome::Converged {
                    previous_leader,
                    new_leader: value,
                    attempts,
                    elapsed,
                }
            }
            PollOutcome::Exhausted { attempts, elapsed } => {
                self.enter(StandDownPhase::TimedOut);
                StandDownOutcome::TimedOut {
                    previous_leader,
                    attempts,
                    elapsed,
                }
            }
        };

        if result.is_converged() {
            info!("{}", result.summary());
        } else {
            warn!("{}", result.summary());
        }
        Ok(result)
    }
}
