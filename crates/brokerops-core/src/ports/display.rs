//! 화면/프롬프트 포트.
//!
//! 구현: `brokerops-telemetry::terminal` (crossterm), 테스트용 버퍼

use crate::error::CoreError;

/// 전체 화면 다시 그리기 표면
pub trait RenderSurface: Send {
    /// 화면을 지우고 프레임을 그린다 (덧붙이지 않음)
    fn present(&mut self, frame: &str) -> Result<(), CoreError>;

    /// 표시 가능한 행 수 (알 수 없으면 None)
    fn height(&self) -> Option<usize>;
}

/// 파괴적 작업 전 확인
///
/// 경고와 질문은 로그 레벨과 무관하게 사용자에게 보여야 한다.
pub trait Confirmer: Send + Sync {
    /// 질문 전에 보여줄 경고
    fn notice(&self, message: &str) -> Result<(), CoreError>;

    /// 질문에 대한 사용자 응답 (기본값: 아니오)
    fn confirm(&self, question: &str) -> Result<bool, CoreError>;
}
