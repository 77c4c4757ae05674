//! # brokerops-cluster
//!
//! 클러스터 제어 작업.
//! 제어 명령을 한 번 보내고, 최종 일관성을 갖는 클러스터 상태를
//! 정해진 간격/횟수 안에서 폴링해 목표 조건을 확인한다.
//!
//! - [`poll`]: 재사용 가능한 제한 폴링 (간격, 최대 횟수, 조건)
//! - [`admin`]: 메시지 버스 위의 관리 API 어댑터 (상태 조회, 제어 명령)
//! - [`stand_down`]: 메타 리더 교체 상태 머신
//! - [`peer_removal`]: 오프라인 피어 제거 사전 검증과 제거 흐름

pub mod admin;
pub mod peer_removal;
pub mod poll;
pub mod stand_down;
