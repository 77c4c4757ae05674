//! BROKEROPS 도메인 모델.
//!
//! 브로커가 발행하는 텔레메트리와 클러스터 상태 응답의 구조체를 정의한다.
//! 모든 모델은 `serde` Serialize/Deserialize를 구현한다.

pub mod cluster;
pub mod telemetry;
