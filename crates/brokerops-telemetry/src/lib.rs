//! # brokerops-telemetry
//!
//! 계정 사용량 텔레메트리 파이프라인.
//! 여러 서버가 발행하는 계정별 통계를 구독해 합산하고,
//! 선택한 기준으로 순위를 매겨 주기적으로 화면을 다시 그린다.
//!
//! 구독 메시지 → [`store::AggregationStore`] → [`ranking::rank`] → [`table`] → 화면

pub mod dashboard;
pub mod format;
pub mod ranking;
pub mod store;
pub mod table;
pub mod terminal;
