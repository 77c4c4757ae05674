//! # brokerops-core
//!
//! BROKEROPS 도메인 모델, 포트(trait) 정의, 에러 타입.
//! 텔레메트리 집계와 클러스터 제어 크레이트가 공유하는 핵심 타입과 인터페이스를 제공한다.
//!
//! ## 구조
//!
//! - [`models`]: 도메인 데이터 구조체 (serde Serialize/Deserialize)
//! - [`ports`]: Hexagonal Architecture 포트 인터페이스 (async_trait)
//! - [`error`]: 핵심 에러 타입 (thiserror)
//! - [`config`]: 운영 도구 설정 구조체
//! - [`config_manager`]: 설정 파일 관리 (로드/저장)

pub mod config;
pub mod config_manager;
pub mod error;
pub mod models;
pub mod ports;

#[cfg(test)]
mod tests {
    use crate::models::cluster::ClusterState;
    use crate::models::telemetry::StatSample;

    #[test]
    fn stat_sample_decodes_server_payload() {
        let raw = r#"{
            "server": {"name": "n1", "host": "0.0.0.0", "id": "NSRV1", "time": "2024-05-01T10:00:00Z"},
            "acc": "ACME",
            "conns": 3,
            "leafnodes": 1,
            "total_conns": 4,
            "num_subscriptions": 12,
            "slow_consumers": 0,
            "sent": {"msgs": 100, "bytes": 2048},
            "received": {"msgs": 50, "bytes": 1024}
        }"#;

        let sample = StatSample::decode(raw.as_bytes()).unwrap();
        assert_eq!(sample.account, "ACME");
        assert_eq!(sample.server.id, "NSRV1");
        assert_eq!(sample.counters.conns, 3);
        assert_eq!(sample.counters.total_conns, 4);
        assert_eq!(sample.counters.sent.bytes, 2048);
    }

    #[test]
    fn cluster_state_tolerates_missing_meta() {
        let state: ClusterState = serde_json::from_str("{}").unwrap();
        assert!(state.leader.is_empty());
        assert!(state.replicas.is_empty());
        assert_eq!(state.raft_group_size(), 1);
    }

    #[test]
    fn config_defaults() {
        let config = crate::config::OpsConfig::default_config();
        assert_eq!(config.request_timeout_ms, 5_000);
        assert!(!config.trace);
        assert_eq!(config.watch.render_interval_ms, 1_000);
        assert_eq!(config.watch.stale_after_secs, 35);
        assert_eq!(config.stand_down.poll_interval_ms, 500);
        assert_eq!(config.stand_down.max_attempts, 5);
    }
}
