//! 계정 사용량 텔레메트리 모델.
//!
//! 각 서버가 주기적으로 발행하는 계정별 연결/구독/트래픽 통계와
//! 여러 서버의 샘플을 합산한 집계 뷰, 정렬 기준을 정의.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::AddAssign;
use std::str::FromStr;

use crate::error::CoreError;

/// 계정 사용량 텔레메트리 subject 패턴 (계정 자리에 와일드카드)
pub const ACCOUNT_CONNS_SUBJECT: &str = "$SYS.ACCOUNT.*.SERVER.CONNS";

/// 보고 서버 정보
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfo {
    /// 서버 이름
    #[serde(default)]
    pub name: String,
    /// 서버 고유 ID
    pub id: String,
    /// 클러스터 이름
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,
    /// 서버 자체 시각 (샘플 생성 시각)
    pub time: DateTime<Utc>,
}

/// 메시지/바이트 카운터 쌍
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataStats {
    /// 메시지 수
    #[serde(default)]
    pub msgs: u64,
    /// 바이트 수
    #[serde(default)]
    pub bytes: u64,
}

/// 합산은 포화 덧셈 (u64::MAX에서 멈춤)
impl AddAssign for DataStats {
    fn add_assign(&mut self, rhs: Self) {
        self.msgs = self.msgs.saturating_add(rhs.msgs);
        self.bytes = self.bytes.saturating_add(rhs.bytes);
    }
}

/// 계정 사용량 카운터 묶음
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageCounters {
    /// 활성 클라이언트 연결 수
    #[serde(default)]
    pub conns: u64,
    /// 리프노드 연결 수
    #[serde(default)]
    pub leafnodes: u64,
    /// 전체 연결 수 (클라이언트 + 리프노드)
    #[serde(default)]
    pub total_conns: u64,
    /// 구독 수
    #[serde(default, rename = "num_subscriptions")]
    pub subscriptions: u64,
    /// 느린 소비자 수
    #[serde(default)]
    pub slow_consumers: u64,
    /// 송신 통계
    #[serde(default)]
    pub sent: DataStats,
    /// 수신 통계
    #[serde(default)]
    pub received: DataStats,
}

/// 합산은 포화 덧셈. 비정상적으로 큰 값이 와도 렌더 루프가 멈추지 않는다.
impl AddAssign for UsageCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.conns = self.conns.saturating_add(rhs.conns);
        self.leafnodes = self.leafnodes.saturating_add(rhs.leafnodes);
        self.total_conns = self.total_conns.saturating_add(rhs.total_conns);
        self.subscriptions = self.subscriptions.saturating_add(rhs.subscriptions);
        self.slow_consumers = self.slow_consumers.saturating_add(rhs.slow_consumers);
        self.sent += rhs.sent;
        self.received += rhs.received;
    }
}

/// 한 서버가 본 한 계정의 사용량 스냅샷
///
/// (account, server.id) 쌍으로 식별된다. 같은 쌍의 새 샘플은 이전 샘플을 대체한다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatSample {
    /// 계정 ID
    #[serde(rename = "acc")]
    pub account: String,
    /// 보고 서버
    pub server: ServerInfo,
    /// 사용량 카운터
    #[serde(flatten)]
    pub counters: UsageCounters,
}

impl StatSample {
    /// 텔레메트리 메시지 페이로드 디코딩
    pub fn decode(payload: &[u8]) -> Result<Self, CoreError> {
        Ok(serde_json::from_slice(payload)?)
    }

    /// 보고 서버의 샘플 시각
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.server.time
    }
}

/// 신선한 샘플들을 합산한 계정 집계
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregatedAccountView {
    /// 계정 ID
    pub account: String,
    /// 기여한 서버 수
    pub servers: usize,
    /// 합산 카운터
    pub counters: UsageCounters,
}

/// 계정 순위 정렬 기준
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankingKey {
    /// 연결 수
    #[default]
    Conns,
    /// 구독 수
    Subs,
    /// 느린 소비자 수
    Slow,
    /// 송신 바이트
    SentB,
    /// 송신 메시지
    SentM,
    /// 수신 바이트
    RecvB,
    /// 수신 메시지
    RecvM,
}

impl RankingKey {
    /// 모든 정렬 기준 (CLI 토큰 사전순)
    pub const ALL: [RankingKey; 7] = [
        RankingKey::Conns,
        RankingKey::RecvB,
        RankingKey::RecvM,
        RankingKey::SentB,
        RankingKey::SentM,
        RankingKey::Slow,
        RankingKey::Subs,
    ];

    /// CLI 토큰
    pub fn token(self) -> &'static str {
        match self {
            RankingKey::Conns => "conns",
            RankingKey::Subs => "subs",
            RankingKey::Slow => "slow",
            RankingKey::SentB => "sentb",
            RankingKey::SentM => "sentm",
            RankingKey::RecvB => "recvb",
            RankingKey::RecvM => "recvm",
        }
    }

    /// 화면 제목에 쓰는 이름
    pub fn label(self) -> &'static str {
        match self {
            RankingKey::Conns => "Connections",
            RankingKey::Subs => "Subscriptions",
            RankingKey::Slow => "Slow Consumers",
            RankingKey::SentB => "Sent Bytes",
            RankingKey::SentM => "Sent Messages",
            RankingKey::RecvB => "Received Bytes",
            RankingKey::RecvM => "Received Messages",
        }
    }

    /// 선택된 카운터 값
    pub fn value(self, counters: &UsageCounters) -> u64 {
        match self {
            RankingKey::Conns => counters.conns,
            RankingKey::Subs => counters.subscriptions,
            RankingKey::Slow => counters.slow_consumers,
            RankingKey::SentB => counters.sent.bytes,
            RankingKey::SentM => counters.sent.msgs,
            RankingKey::RecvB => counters.received.bytes,
            RankingKey::RecvM => counters.received.msgs,
        }
    }
}

impl fmt::Display for RankingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for RankingKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RankingKey::ALL
            .into_iter()
            .find(|key| key.token() == s)
            .ok_or_else(|| CoreError::Validation {
                field: "sort".to_string(),
                message: format!(
                    "알 수 없는 정렬 기준 '{s}' (가능: {})",
                    RankingKey::ALL.map(RankingKey::token).join(", ")
                ),
            })
    }
}
