//! 운영 도구 설정 구조체.
//!
//! 요청 타임아웃, trace 플래그, 계정 감시/리더 교체 주기 등 런타임 설정을 정의한다.
//! 전역 상태를 읽지 않고 각 컴포넌트에 값으로 전달한다.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::CoreError;

/// 텔레메트리 샘플이 집계에서 제외되기까지의 최대 나이 (초).
/// 서버 보고 주기(30초)에 여유 5초를 더한 값.
pub const DEFAULT_STALE_AFTER_SECS: u64 = 35;

/// 최상위 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpsConfig {
    /// 요청/응답 타임아웃 (밀리초)
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// 요청/응답 페이로드 trace 로깅
    #[serde(default)]
    pub trace: bool,
    /// 계정 감시 설정
    #[serde(default)]
    pub watch: WatchConfig,
    /// 리더 교체 설정
    #[serde(default)]
    pub stand_down: StandDownConfig,
}

// ============================================================
// 계정 감시 설정
// ============================================================

/// 계정 사용량 대시보드 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// 다시 그리기 주기 (밀리초)
    #[serde(default = "default_render_interval_ms")]
    pub render_interval_ms: u64,
    /// 샘플 유효 기간 (초)
    #[serde(default = "default_stale_after_secs")]
    pub stale_after_secs: u64,
    /// 표시할 계정 수 (0 = 터미널 높이에서 계산)
    #[serde(default)]
    pub row_limit: usize,
    /// 제목/헤더/테두리에 쓰이는 행 수
    #[serde(default = "default_reserved_rows")]
    pub reserved_rows: usize,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            render_interval_ms: default_render_interval_ms(),
            stale_after_secs: default_stale_after_secs(),
            row_limit: 0,
            reserved_rows: default_reserved_rows(),
        }
    }
}

impl WatchConfig {
    /// 다시 그리기 주기를 Duration으로 반환
    pub fn render_interval(&self) -> Duration {
        Duration::from_millis(self.render_interval_ms)
    }

    /// 샘플 유효 기간을 chrono Duration으로 반환
    ///
    /// chrono가 표현할 수 없는 값이면 설정 에러.
    pub fn stale_after(&self) -> Result<chrono::Duration, CoreError> {
        i64::try_from(self.stale_after_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .ok_or_else(|| {
                CoreError::Config(format!(
                    "watch.stale_after_secs 값이 너무 큽니다: {}",
                    self.stale_after_secs
                ))
            })
    }
}

// ============================================================
// 리더 교체 설정
// ============================================================

/// 메타 리더 교체 후 수렴 확인 폴링 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandDownConfig {
    /// 폴링 간격 (밀리초)
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// 최대 폴링 횟수
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for StandDownConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl StandDownConfig {
    /// 폴링 간격을 Duration으로 반환
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl OpsConfig {
    /// 기본 설정 생성
    pub fn default_config() -> Self {
        Self {
            request_timeout_ms: default_request_timeout_ms(),
            trace: false,
            watch: WatchConfig::default(),
            stand_down: StandDownConfig::default(),
        }
    }

    /// 요청 타임아웃을 Duration으로 반환
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for OpsConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

// ============================================================
// 기본값 함수
// ============================================================

fn default_request_timeout_ms() -> u64 {
    5_000
}
fn default_render_interval_ms() -> u64 {
    1_000
}
fn default_stale_after_secs() -> u64 {
    DEFAULT_STALE_AFTER_SECS
}
fn default_reserved_rows() -> usize {
    8
}
fn default_poll_interval_ms() -> u64 {
    500
}
fn default_max_attempts() -> u32 {
    5
}
