//! 계정 사용량 집계 저장소.
//!
//! (계정, 서버) 쌍마다 최신 샘플 하나를 보관하고, 읽을 때 오래된 샘플을 걸러 합산한다.
//! 계정은 삭제하지 않는다. 모든 샘플이 오래된 계정은 스냅샷에서만 빠진다.

use brokerops_core::config::DEFAULT_STALE_AFTER_SECS;
use brokerops_core::models::telemetry::{AggregatedAccountView, StatSample, UsageCounters};
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;

/// 기본 샘플 유효 기간 (컴파일 시점에 계산)
const DEFAULT_STALE_AFTER: Duration = Duration::seconds(DEFAULT_STALE_AFTER_SECS as i64);

#[derive(Debug, Default)]
struct StoreInner {
    /// 계정 → 서버 ID → 최신 샘플
    accounts: HashMap<String, HashMap<String, StatSample>>,
    /// 마지막 샘플 수신 시각
    last_received: Option<DateTime<Utc>>,
}

/// 시간 인지 계정 사용량 누산기
///
/// 락은 메모리 내 갱신/합산 동안에만 잡는다.
#[derive(Debug)]
pub struct AggregationStore {
    stale_after: Duration,
    inner: Mutex<StoreInner>,
}

impl AggregationStore {
    /// 샘플 유효 기간을 지정해 생성
    pub fn new(stale_after: Duration) -> Self {
        Self {
            stale_after,
            inner: Mutex::new(StoreInner::default()),
        }
    }

    /// 샘플 추가 (같은 계정/서버의 이전 샘플 대체)
    pub fn ingest(&self, sample: StatSample) {
        let mut inner = self.inner.lock();
        inner
            .accounts
            .entry(sample.account.clone())
            .or_default()
            .insert(sample.server.id.clone(), sample);
        inner.last_received = Some(Utc::now());
    }

    /// `now` 기준 신선한 샘플만 합산한 계정별 뷰
    pub fn snapshot(&self, now: DateTime<Utc>) -> Vec<AggregatedAccountView> {
        let inner = self.inner.lock();
        inner
            .accounts
            .iter()
            .filter_map(|(account, samples)| {
                let mut counters = UsageCounters::default();
                let mut servers = 0;

                for sample in samples.values() {
                    // 연결이 있는 서버만 보고하므로 마지막 업데이트를 놓치면 값이 남는다
                    if now - sample.timestamp() > self.stale_after {
                        continue;
                    }
                    servers += 1;
                    counters += sample.counters;
                }

                (servers > 0).then(|| AggregatedAccountView {
                    account: account.clone(),
                    servers,
                    counters,
                })
            })
            .collect()
    }

    /// 보관 중인 계정 수 (오래된 계정 포함)
    pub fn tracked_accounts(&self) -> usize {
        self.inner.lock().accounts.len()
    }

    /// 마지막 샘플 수신 시각
    pub fn last_received(&self) -> Option<DateTime<Utc>> {
        self.inner.lock().last_received
    }
}

impl Default for AggregationStore {
    fn default() -> Self {
        Self::new(DEFAULT_STALE_AFTER)
    }
}
