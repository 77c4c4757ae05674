//! 실시간 계정 사용량 대시보드 루프.
//!
//! 세 흐름이 하나의 [`AggregationStore`]를 공유한다.
//! - 수집 태스크: 텔레메트리 구독 → 디코딩 → `ingest`
//! - 렌더 타이머: `snapshot` → `rank` → 화면 다시 그리기
//! - 종료 신호: 구독과 타이머를 멈추고 반환 (마지막 프레임은 화면에 남는다)

use brokerops_core::config::WatchConfig;
use brokerops_core::error::CoreError;
use brokerops_core::models::telemetry::{RankingKey, StatSample, ACCOUNT_CONNS_SUBJECT};
use brokerops_core::ports::display::RenderSurface;
use brokerops_core::ports::transport::{MessageBus, Subscription};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, trace};

use crate::ranking::rank;
use crate::store::AggregationStore;
use crate::table::render_accounts;

/// 표시할 계정 수 결정
///
/// `explicit`이 0이면 화면 높이에서 `reserved` 행을 뺀 값을 쓴다.
/// 높이를 알면 명시값도 화면에 맞게 줄인다.
pub fn resolve_row_limit(
    explicit: usize,
    height: Option<usize>,
    reserved: usize,
) -> Result<usize, CoreError> {
    let available = height.map(|h| h.saturating_sub(reserved));

    let limit = match (explicit, available) {
        (0, None) => {
            return Err(CoreError::Config(
                "화면 크기를 확인할 수 없습니다. 표시할 계정 수를 지정하세요".to_string(),
            ))
        }
        (0, Some(available)) => available,
        (explicit, Some(available)) => explicit.min(available),
        (explicit, None) => explicit,
    };

    if limit < 1 {
        return Err(CoreError::Config(
            "요청한 표시 범위가 화면 크기를 초과합니다".to_string(),
        ));
    }
    Ok(limit)
}

/// 계정 사용량 대시보드
pub struct LiveDashboard {
    bus: Arc<dyn MessageBus>,
    store: Arc<AggregationStore>,
    key: RankingKey,
    limit: usize,
    render_interval: Duration,
}

impl LiveDashboard {
    /// 새 대시보드 생성
    ///
    /// 행 제한과 샘플 유효 기간은 렌더링 전에 확정한다. 결정할 수 없으면 설정 에러.
    pub fn new(
        bus: Arc<dyn MessageBus>,
        config: &WatchConfig,
        key: RankingKey,
        surface_height: Option<usize>,
    ) -> Result<Self, CoreError> {
        let limit = resolve_row_limit(config.row_limit, surface_height, config.reserved_rows)?;
        let stale_after = config.stale_after()?;
        Ok(Self {
            bus,
            store: Arc::new(AggregationStore::new(stale_after)),
            key,
            limit,
            render_interval: config.render_interval(),
        })
    }

    /// 현재 시점 프레임 생성
    pub fn render_frame(&self, now: DateTime<Utc>) -> Result<String, CoreError> {
        let views = self.store.snapshot(now);
        let total = views.len();
        let ranked = rank(views, self.key, self.limit)?;
        Ok(render_accounts(
            &ranked,
            self.key,
            self.limit,
            total,
            self.store.last_received(),
        ))
    }

    /// 종료 신호까지 구독/렌더 루프 실행
    pub async fn run<S>(
        &self,
        surface: &mut S,
        mut shutdown_rx: watch::Receiver<bool>,
    ) -> Result<(), CoreError>
    where
        S: RenderSurface + ?Sized,
    {
        let subscription = self.bus.subscribe(ACCOUNT_CONNS_SUBJECT).await?;
        info!(
            "계정 감시 시작: subject={}, 정렬={}, 표시={}개",
            subscription.subject(),
            self.key.label(),
            self.limit
        );

        let ingest_task = tokio::spawn(ingest_loop(
            subscription,
            self.store.clone(),
            shutdown_rx.clone(),
        ));

        let mut ticker = interval_at(Instant::now() + self.render_interval, self.render_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let result = loop {
            if *shutdown_rx.borrow() {
                break Ok(());
            }

            tokio::select! {
                biased;
                _ = shutdown_rx.changed() => {
                    debug!("대시보드 종료 신호 수신");
                    break Ok(());
                }
                _ = ticker.tick() => {
                    let frame = match self.render_frame(Utc::now()) {
                        Ok(frame) => frame,
                        Err(e) => break Err(e),
                    };
                    if let Err(e) = surface.present(&frame) {
                        break Err(e);
                    }
                }
            }
        };

        // 렌더 루프가 끝나면 더 이상 수집하지 않는다
        ingest_task.abort();
        let _ = ingest_task.await;
        info!(
            "계정 감시 종료: 추적 계정 {}개",
            self.store.tracked_accounts()
        );

        result
    }
}

/// 구독 메시지를 저장소에 반영 (디코딩 실패는 조용히 버린다)
async fn ingest_loop(
    mut subscription: Subscription,
    store: Arc<AggregationStore>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            msg = subscription.next() => match msg {
                Some(msg) => match StatSample::decode(&msg.payload) {
                    Ok(sample) => store.ingest(sample),
                    Err(e) => trace!("텔레메트리 디코딩 실패 ({}): {e}", msg.subject),
                },
                None => {
                    debug!("텔레메트리 구독 채널 닫힘");
                    break;
                }
            },
            _ = shutdown_rx.changed() => break,
        }
    }
    subscription.unsubscribe();
}
