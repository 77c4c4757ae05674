//! 관리 API 어댑터.
//!
//! `ClusterStateSource` + `ClusterControl` 포트 구현.
//! 메시지 버스의 요청/응답 위에서 JSON 관리 API를 호출한다.

use async_trait::async_trait;
use brokerops_core::config::OpsConfig;
use brokerops_core::error::CoreError;
use brokerops_core::models::cluster::{
    ApiResponse, ClusterState, JszOptions, JszResponse, LeaderStepDownRequest, PeerRemoveRequest,
    Placement, JSZ_PING_SUBJECT, META_LEADER_STEPDOWN_SUBJECT, SERVER_REMOVE_SUBJECT,
};
use brokerops_core::ports::cluster::{ClusterControl, ClusterStateSource};
use brokerops_core::ports::transport::MessageBus;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

/// 관리 API 클라이언트
pub struct AdminApi {
    bus: Arc<dyn MessageBus>,
    timeout: Duration,
    trace: bool,
}

impl AdminApi {
    /// 설정의 타임아웃/trace 값으로 생성
    pub fn new(bus: Arc<dyn MessageBus>, config: &OpsConfig) -> Self {
        Self {
            bus,
            timeout: config.request_timeout(),
            trace: config.trace,
        }
    }

    /// JSON 요청 후 원시 응답 반환
    async fn request_json<T: Serialize + ?Sized>(
        &self,
        subject: &str,
        body: &T,
    ) -> Result<Vec<u8>, CoreError> {
        let payload = serde_json::to_vec(body)?;
        if self.trace {
            trace!(">>> {subject}: {}", String::from_utf8_lossy(&payload));
        }

        let reply = self.bus.request(subject, payload, self.timeout).await?;
        if self.trace {
            trace!("<<< {subject}: {}", String::from_utf8_lossy(&reply));
        }
        Ok(reply)
    }

    /// 성공/실패만 있는 관리 API 호출
    async fn call<T: Serialize + ?Sized>(&self, subject: &str, body: &T) -> Result<(), CoreError> {
        let reply = self.request_json(subject, body).await?;
        let response: ApiResponse = serde_json::from_slice(&reply)?;

        if let Some(error) = response.error {
            return Err(CoreError::Api {
                code: error.code,
                description: error.description,
            });
        }
        if !response.success {
            return Err(CoreError::Api {
                code: 0,
                description: format!("{subject} 요청이 성공 응답을 반환하지 않았습니다"),
            });
        }
        Ok(())
    }
}

/// 클러스터 상태 응답 파싱
pub fn parse_cluster_state(reply: &[u8]) -> Result<ClusterState, CoreError> {
    let response: JszResponse = serde_json::from_slice(reply)?;
    let data = response.data.ok_or_else(|| CoreError::Validation {
        field: "data".to_string(),
        message: "응답에 data가 없습니다".to_string(),
    })?;

    data.meta_cluster.ok_or_else(|| CoreError::Validation {
        field: "meta_cluster".to_string(),
        message: "JetStream 클러스터 정보가 없습니다 (클러스터 모드가 아닌 서버)".to_string(),
    })
}

#[async_trait]
impl ClusterStateSource for AdminApi {
    async fn cluster_state(&self) -> Result<ClusterState, CoreError> {
        let reply = self
            .request_json(JSZ_PING_SUBJECT, &JszOptions { leader_only: true })
            .await?;
        let state = parse_cluster_state(&reply)?;
        debug!(
            "클러스터 상태: leader={:?}, replicas={}",
            state.leader,
            state.replicas.len()
        );
        Ok(state)
    }
}

#[async_trait]
impl ClusterControl for AdminApi {
    async fn meta_leader_stand_down(
        &self,
        placement: Option<&Placement>,
    ) -> Result<(), CoreError> {
        let request = LeaderStepDownRequest {
            placement: placement.cloned(),
        };
        self.call(META_LEADER_STEPDOWN_SUBJECT, &request).await
    }

    async fn meta_peer_remove(&self, name: &str, peer_id: &str) -> Result<(), CoreError> {
        // ID를 알면 ID만 보낸다
        let request = if peer_id.is_empty() {
            PeerRemoveRequest {
                peer: name.to_string(),
                peer_id: String::new(),
            }
        } else {
            PeerRemoveRequest {
                peer: String::new(),
                peer_id: peer_id.to_string(),
            }
        };
        self.call(SERVER_REMOVE_SUBJECT, &request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use brokerops_core::ports::transport::Subscription;
    use parking_lot::Mutex;

    /// 정해진 응답을 돌려주고 요청을 기록하는 버스
    struct ScriptedBus {
        reply: Result<Vec<u8>, ()>,
        requests: Mutex<Vec<(String, serde_json::Value)>>,
    }

    impl ScriptedBus {
        fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply.as_bytes().to_vec()),
                requests: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl MessageBus for ScriptedBus {
        async fn subscribe(&self, _subject: &str) -> Result<Subscription, CoreError> {
            Err(CoreError::Transport("subscribe not scripted".into()))
        }

        async fn request(
            &self,
            subject: &str,
            payload: Vec<u8>,
            timeout: Duration,
        ) -> Result<Vec<u8>, CoreError> {
            self.requests.lock().push((
                subject.to_string(),
                serde_json::from_slice(&payload).unwrap(),
            ));
            self.reply.clone().map_err(|_| CoreError::Timeout {
                subject: subject.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            })
        }
    }

    #[tokio::test]
    async fn cluster_state_requests_leader_only() {
        let bus = ScriptedBus::replying(
            r#"{"data":{"meta_cluster":{"leader":"n1","replicas":[{"name":"n2","peer":"p2"}]}}}"#,
        );
        let api = AdminApi::new(bus.clone(), &OpsConfig::default_config());

        let state = api.cluster_state().await.unwrap();
        assert_eq!(state.leader, "n1");
        assert_eq!(state.replicas[0].id, "p2");

        let requests = bus.requests.lock();
        assert_eq!(requests[0].0, JSZ_PING_SUBJECT);
        assert_eq!(requests[0].1, serde_json::json!({"leader_only": true}));
    }

    #[tokio::test]
    async fn missing_meta_cluster_is_validation_error() {
        let bus = ScriptedBus::replying(r#"{"data":{}}"#);
        let api = AdminApi::new(bus, &OpsConfig::default_config());
        assert_matches!(
            api.cluster_state().await,
            Err(CoreError::Validation { field, .. }) if field == "meta_cluster"
        );
    }

    #[tokio::test]
    async fn request_timeout_propagates() {
        let bus = Arc::new(ScriptedBus {
            reply: Err(()),
            requests: Mutex::new(Vec::new()),
        });
        let api = AdminApi::new(bus, &OpsConfig::default_config());
        assert_matches!(
            api.cluster_state().await,
            Err(CoreError::Timeout { timeout_ms: 5_000, .. })
        );
    }

    #[tokio::test]
    async fn stand_down_sends_placement() {
        let bus = ScriptedBus::replying(r#"{"success":true}"#);
        let api = AdminApi::new(bus.clone(), &OpsConfig::default_config());

        api.meta_leader_stand_down(Some(&Placement {
            cluster: "west".into(),
        }))
        .await
        .unwrap();

        let requests = bus.requests.lock();
        assert_eq!(requests[0].0, META_LEADER_STEPDOWN_SUBJECT);
        assert_eq!(
            requests[0].1,
            serde_json::json!({"placement": {"cluster": "west"}})
        );
    }

    #[tokio::test]
    async fn api_error_is_surfaced() {
        let bus = ScriptedBus::replying(
            r#"{"error":{"code":400,"description":"peer not found"}}"#,
        );
        let api = AdminApi::new(bus, &OpsConfig::default_config());
        assert_matches!(
            api.meta_peer_remove("n3", "p3").await,
            Err(CoreError::Api { code: 400, description }) if description == "peer not found"
        );
    }

    #[tokio::test]
    async fn peer_remove_prefers_id() {
        let bus = ScriptedBus::replying(r#"{"success":true}"#);
        let api = AdminApi::new(bus.clone(), &OpsConfig::default_config());

        api.meta_peer_remove("n3", "p3").await.unwrap();
        api.meta_peer_remove("n4", "").await.unwrap();

        let requests = bus.requests.lock();
        assert_eq!(requests[0].0, SERVER_REMOVE_SUBJECT);
        assert_eq!(requests[0].1, serde_json::json!({"peer_id": "p3"}));
        assert_eq!(requests[1].1, serde_json::json!({"peer": "n4"}));
    }
}
