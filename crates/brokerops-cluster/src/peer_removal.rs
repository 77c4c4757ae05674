//! 오프라인 피어 제거.
//!
//! 제거 명령 전에 대상이 오프라인인지 확인하는 유일한 안전장치.
//! 검증은 조회한 스냅샷만 보고 판단한다. 검증 이후 피어가 다시
//! 온라인이 되는 경합은 허용한다.

use brokerops_core::error::CoreError;
use brokerops_core::models::cluster::{ClusterState, PeerIdentity};
use brokerops_core::ports::cluster::{ClusterControl, ClusterStateSource};
use brokerops_core::ports::display::Confirmer;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// 제거 대상 검증
///
/// 이름이나 ID가 일치하는 레플리카를 찾는다. 일치하는 피어 중 하나라도
/// 온라인이면 실패한다. 여러 개가 일치하면 마지막 항목을 쓴다.
pub fn validate_peer_removal(
    target: &str,
    state: &ClusterState,
) -> Result<PeerIdentity, CoreError> {
    let mut found = None;

    for replica in &state.replicas {
        if replica.name != target && replica.id != target {
            continue;
        }
        if !replica.offline {
            return Err(CoreError::PeerOnline(target.to_string()));
        }
        found = Some(PeerIdentity {
            name: replica.name.clone(),
            id: replica.id.clone(),
        });
    }

    found.ok_or_else(|| CoreError::UnknownPeer(target.to_string()))
}

/// 되돌릴 수 없는 작업에 대한 안내문
pub fn removal_warning(target: &str) -> String {
    format!(
        "Removing {target} can not be reversed, data on this node will be inaccessible \
         and the server name can not be used again. You should only remove nodes that \
         will not return in future."
    )
}

/// 확인 질문
///
/// 이름으로 지정했으면 이름만, ID로 지정했으면 이름과 ID를 함께 보여준다.
pub fn confirmation_question(target: &str, peer: &PeerIdentity) -> String {
    if target == peer.name || peer.name.contains(&peer.id) {
        format!("Really remove peer {}", peer.name)
    } else {
        format!("Really remove peer {} with id {}", peer.name, peer.id)
    }
}

/// 제거 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PeerRemovalOutcome {
    /// 제거 명령 완료
    Removed { peer: PeerIdentity },
    /// 운영자가 거절
    Canceled { peer: PeerIdentity },
}

impl PeerRemovalOutcome {
    /// 운영자에게 보여줄 한 줄 요약
    pub fn summary(&self) -> String {
        match self {
            PeerRemovalOutcome::Removed { peer } => {
                format!("Removed peer {} ({})", peer.name, peer.id)
            }
            PeerRemovalOutcome::Canceled { .. } => "Removal canceled".to_string(),
        }
    }
}

/// 피어 제거 흐름: 상태 조회 → 검증 → 확인 → 제거
pub struct PeerRemoval {
    state_source: Arc<dyn ClusterStateSource>,
    control: Arc<dyn ClusterControl>,
    confirmer: Arc<dyn Confirmer>,
}

impl PeerRemoval {
    pub fn new(
        state_source: Arc<dyn ClusterStateSource>,
        control: Arc<dyn ClusterControl>,
        confirmer: Arc<dyn Confirmer>,
    ) -> Self {
        Self {
            state_source,
            control,
            confirmer,
        }
    }

    /// 제거 실행
    ///
    /// `force`이면 확인 없이 제거한다. 검증 실패 시 제거 명령은 보내지 않는다.
    pub async fn run(&self, target: &str, force: bool) -> Result<PeerRemovalOutcome, CoreError> {
        let state = match self.state_source.cluster_state().await {
            Ok(state) => state,
            // 메타 리더가 응답하지 않음 (권한 없는 계정 등)
            Err(CoreError::Timeout { .. }) => {
                return Err(CoreError::NoMetaLeaderResponse { received: 0 })
            }
            Err(e) => return Err(e),
        };

        let peer = validate_peer_removal(target, &state)?;

        if !force && !self.ask(target, &peer).await? {
            info!("피어 제거 취소: {}", peer.name);
            return Ok(PeerRemovalOutcome::Canceled { peer });
        }

        // ID를 알면 ID로 제거
        if peer.id.is_empty() {
            self.control.meta_peer_remove(&peer.name, "").await?;
        } else {
            self.control.meta_peer_remove("", &peer.id).await?;
        }
        info!("피어 제거 완료: {} ({})", peer.name, peer.id);

        Ok(PeerRemovalOutcome::Removed { peer })
    }

    /// 경고 후 확인 질문
    ///
    /// 응답 대기는 블로킹이므로 런타임 워커 밖에서 실행한다.
    async fn ask(&self, target: &str, peer: &PeerIdentity) -> Result<bool, CoreError> {
        let confirmer = Arc::clone(&self.confirmer);
        let warning = removal_warning(target);
        let question = confirmation_question(target, peer);

        tokio::task::spawn_blocking(move || {
            confirmer.notice(&warning)?;
            confirmer.confirm(&question)
        })
        .await
        .map_err(|e| CoreError::Io(std::io::Error::other(e)))?
    }
}
