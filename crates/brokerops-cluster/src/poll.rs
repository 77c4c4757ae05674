//! 제한 폴링.
//!
//! 조건이 성립하거나 시도 횟수를 다 쓸 때까지 일정 간격으로 확인 함수를 호출한다.
//! 첫 시도는 즉시, 이후 시도 사이에만 대기한다. 한 번에 하나의 확인만 실행된다.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

/// 폴링 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome<T> {
    /// 조건 성립
    Converged {
        /// 확인 함수가 돌려준 값
        value: T,
        /// 사용한 시도 횟수
        attempts: u32,
        /// 첫 시도부터 경과 시간
        elapsed: Duration,
    },
    /// 시도 횟수 소진
    Exhausted {
        /// 사용한 시도 횟수
        attempts: u32,
        /// 첫 시도부터 경과 시간
        elapsed: Duration,
    },
}

/// 간격과 최대 시도 횟수로 제한된 폴러
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundedPoll {
    interval: Duration,
    max_attempts: u32,
}

impl BoundedPoll {
    /// 새 폴러
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    /// 시도 간격
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// 최대 시도 횟수
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// 확인 반복 실행
    ///
    /// `Ok(Some(v))`이면 성립, `Ok(None)`이면 미성립, `Err`는 경고 후 다음 시도로 넘어간다.
    /// 에러도 시도 횟수를 소비한다.
    pub async fn run<T, E, F, Fut>(&self, mut check: F) -> PollOutcome<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<Option<T>, E>>,
        E: Display,
    {
        let start = Instant::now();

        for attempt in 1..=self.max_attempts {
            if attempt > 1 {
                tokio::time::sleep(self.interval).await;
            }

            match check(attempt).await {
                Ok(Some(value)) => {
                    return PollOutcome::Converged {
                        value,
                        attempts: attempt,
                        elapsed: start.elapsed(),
                    };
                }
                Ok(None) => {
                    debug!("조건 미성립 ({attempt}/{})", self.max_attempts);
                }
                Err(e) => {
                    warn!("폴링 실패 ({attempt}/{}): {e}", self.max_attempts);
                }
            }
        }

        PollOutcome::Exhausted {
            attempts: self.max_attempts,
            elapsed: start.elapsed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test(start_paused = true)]
    async fn converges_on_first_success() {
        let poll = BoundedPoll::new(Duration::from_millis(500), 5);
        let calls = AtomicU32::new(0);

        let outcome = poll
            .run(|attempt| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move { Ok::<_, String>((attempt == 3).then_some("done")) }
            })
            .await;

        match outcome {
            PollOutcome::Converged {
                value,
                attempts,
                elapsed,
            } => {
                assert_eq!(value, "done");
                assert_eq!(attempts, 3);
                assert!(elapsed >= Duration::from_millis(1_000));
                assert!(elapsed < Duration::from_millis(1_050));
            }
            other => panic!("수렴해야 함: {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn errors_consume_attempts() {
        let poll = BoundedPoll::new(Duration::from_millis(100), 3);
        let calls = AtomicU32::new(0);

        let outcome = poll
            .run(|_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<Option<()>, _>("unreachable") }
            })
            .await;

        match outcome {
            PollOutcome::Exhausted { attempts, elapsed } => {
                assert_eq!(attempts, 3);
                assert!(elapsed >= Duration::from_millis(200));
                assert!(elapsed < Duration::from_millis(250));
            }
            other => panic!("소진되어야 함: {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_budget_never_checks() {
        let poll = BoundedPoll::new(Duration::from_millis(100), 0);
        let outcome = poll
            .run(|_| async { Ok::<Option<()>, String>(Some(())) })
            .await;
        assert_eq!(
            outcome,
            PollOutcome::Exhausted {
                attempts: 0,
                elapsed: Duration::ZERO,
            }
        );
    }
}
