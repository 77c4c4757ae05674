//! 로깅 초기화.

use tracing_subscriber::EnvFilter;

/// 워크스페이스 crate 전체에 같은 레벨을 거는 필터
pub fn filter_directive(level: &str) -> String {
    [
        "brokerops",
        "brokerops_app",
        "brokerops_core",
        "brokerops_telemetry",
        "brokerops_cluster",
    ]
    .iter()
    .map(|target| format!("{target}={level}"))
    .collect::<Vec<_>>()
    .join(",")
}

/// tracing 초기화
///
/// `RUST_LOG`가 있으면 우선한다. 이미 초기화되어 있으면 아무것도 하지 않는다.
pub fn init(level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_directive(level)));

    // 대시보드 화면과 섞이지 않도록 stderr로 출력
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
