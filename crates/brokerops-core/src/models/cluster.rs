//! 클러스터 상태 모델.
//!
//! 메타 그룹 리더, 피어 레플리카 목록, 관리 API 요청/응답 구조를 정의.

use serde::{Deserialize, Serialize};

use super::telemetry::ServerInfo;

/// 클러스터 상태 조회 subject (메타 리더만 응답하도록 요청)
pub const JSZ_PING_SUBJECT: &str = "$SYS.REQ.SERVER.PING.JSZ";

/// 메타 리더 교체 API subject
pub const META_LEADER_STEPDOWN_SUBJECT: &str = "$JS.API.META.LEADER.STEPDOWN";

/// 피어 제거 API subject
pub const SERVER_REMOVE_SUBJECT: &str = "$JS.API.SERVER.REMOVE";

/// 메타 그룹 피어 레코드
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerRecord {
    /// 피어(서버) 이름
    #[serde(default)]
    pub name: String,
    /// 피어 ID
    #[serde(default, rename = "peer")]
    pub id: String,
    /// 로그가 최신인지
    #[serde(default)]
    pub current: bool,
    /// 오프라인 여부
    #[serde(default)]
    pub offline: bool,
    /// 마지막 활동 이후 경과 (나노초)
    #[serde(default)]
    pub active: i64,
    /// 리더 대비 지연 엔트리 수
    #[serde(default)]
    pub lag: u64,
}

/// 메타 그룹 상태 스냅샷
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterState {
    /// 메타 그룹(클러스터) 이름
    #[serde(default)]
    pub name: String,
    /// 현재 메타 리더 (리더 없음이면 빈 문자열)
    #[serde(default)]
    pub leader: String,
    /// 클러스터 크기
    #[serde(default)]
    pub cluster_size: usize,
    /// 리더를 제외한 피어 레플리카
    #[serde(default)]
    pub replicas: Vec<PeerRecord>,
}

impl ClusterState {
    /// 리더가 있는지
    pub fn has_leader(&self) -> bool {
        !self.leader.is_empty()
    }

    /// RAFT 그룹 크기 (레플리카 + 리더)
    pub fn raft_group_size(&self) -> usize {
        self.replicas.len() + 1
    }
}

/// 클러스터 상태 조회 요청 옵션
#[derive(Debug, Clone, Default, Serialize)]
pub struct JszOptions {
    /// 메타 리더만 응답
    pub leader_only: bool,
}

/// JetStream 정보 (클러스터 상태 응답의 `data`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JetStreamInfo {
    /// 메타 그룹 상태 (클러스터 모드가 아니면 없음)
    #[serde(default)]
    pub meta_cluster: Option<ClusterState>,
}

/// 클러스터 상태 조회 응답 envelope
#[derive(Debug, Clone, Deserialize)]
pub struct JszResponse {
    /// JetStream 정보
    #[serde(default)]
    pub data: Option<JetStreamInfo>,
    /// 응답한 서버
    #[serde(default)]
    pub server: Option<ServerInfo>,
}

/// 리더 배치 제약
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// 새 리더를 둘 클러스터 이름
    pub cluster: String,
}

/// 메타 리더 교체 요청
#[derive(Debug, Clone, Default, Serialize)]
pub struct LeaderStepDownRequest {
    /// 배치 제약 (없으면 생략)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placement: Option<Placement>,
}

/// 피어 제거 요청
#[derive(Debug, Clone, Serialize)]
pub struct PeerRemoveRequest {
    /// 피어 이름 (ID로 제거할 때는 빈 문자열)
    #[serde(skip_serializing_if = "String::is_empty")]
    pub peer: String,
    /// 피어 ID
    #[serde(skip_serializing_if = "String::is_empty")]
    pub peer_id: String,
}

/// 관리 API 에러 본문
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    /// 에러 코드
    #[serde(default)]
    pub code: u16,
    /// 에러 설명
    #[serde(default)]
    pub description: String,
}

/// 관리 API 공통 응답
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    /// 성공 여부
    #[serde(default)]
    pub success: bool,
    /// 실패 시 에러
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
}

/// 제거 API에 넘길 검증된 피어 식별자
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeerIdentity {
    /// 피어 이름
    pub name: String,
    /// 피어 ID
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jsz_response_decodes_meta_cluster() {
        let raw = r#"{
            "server": {"name": "n1", "id": "NSRV1", "time": "2024-05-01T10:00:00.123456789Z"},
            "data": {
                "meta_cluster": {
                    "name": "east",
                    "leader": "n1",
                    "cluster_size": 3,
                    "replicas": [
                        {"name": "n2", "peer": "p2", "current": true, "active": 120000000},
                        {"name": "n3", "peer": "p3", "offline": true, "lag": 4}
                    ]
                }
            }
        }"#;

        let resp: JszResponse = serde_json::from_str(raw).unwrap();
        let meta = resp.data.unwrap().meta_cluster.unwrap();
        assert_eq!(meta.leader, "n1");
        assert_eq!(meta.raft_group_size(), 3);
        assert_eq!(meta.replicas[1].id, "p3");
        assert!(meta.replicas[1].offline);
        assert!(!meta.replicas[0].offline);
    }

    #[test]
    fn step_down_request_omits_missing_placement() {
        let json = serde_json::to_string(&LeaderStepDownRequest::default()).unwrap();
        assert_eq!(json, "{}");

        let json = serde_json::to_string(&LeaderStepDownRequest {
            placement: Some(Placement {
                cluster: "west".into(),
            }),
        })
        .unwrap();
        assert_eq!(json, r#"{"placement":{"cluster":"west"}}"#);
    }

    #[test]
    fn peer_remove_request_by_id_only() {
        let json = serde_json::to_string(&PeerRemoveRequest {
            peer: String::new(),
            peer_id: "p3".into(),
        })
        .unwrap();
        assert_eq!(json, r#"{"peer_id":"p3"}"#);
    }
}
