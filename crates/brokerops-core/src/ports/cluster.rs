//! 클러스터 관리 포트.
//!
//! 구현: `brokerops-cluster` crate (메시지 버스 위의 관리 API 어댑터)

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::cluster::{ClusterState, Placement};

/// 클러스터 상태 조회 (최종 일관성 뷰)
#[async_trait]
pub trait ClusterStateSource: Send + Sync {
    /// 메타 리더 기준 현재 클러스터 상태
    async fn cluster_state(&self) -> Result<ClusterState, CoreError>;
}

/// 클러스터 제어 명령
#[async_trait]
pub trait ClusterControl: Send + Sync {
    /// 메타 리더 교체 요청 (응답은 성공/실패만)
    async fn meta_leader_stand_down(&self, placement: Option<&Placement>)
        -> Result<(), CoreError>;

    /// 메타 그룹에서 피어 제거
    ///
    /// `peer_id`가 비어 있으면 `name`으로 제거한다.
    async fn meta_peer_remove(&self, name: &str, peer_id: &str) -> Result<(), CoreError>;
}
