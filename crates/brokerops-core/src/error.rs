//! BROKEROPS 핵심 에러 타입.
//!
//! 모든 크레이트가 같은 `CoreError`를 반환한다.
//! 명령 레이어(`brokerops-app`)에서만 `anyhow`로 감싼다.

use thiserror::Error;

/// 코어 레이어 에러.
/// 직렬화, 설정, 전송, 클러스터 제어 검증 에러를 정의한다.
#[derive(Debug, Error)]
pub enum CoreError {
    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 설정값 오류 (화면 크기 미확인, 0 이하 행 제한 등)
    #[error("설정 에러: {0}")]
    Config(String),

    /// 필드 유효성 검증 실패
    #[error("유효성 검증 실패 ({field}): {message}")]
    Validation {
        /// 검증 실패한 필드명
        field: String,
        /// 실패 사유
        message: String,
    },

    /// 전송 계층 에러 (구독 실패, 연결 끊김)
    #[error("전송 에러: {0}")]
    Transport(String),

    /// 요청/응답 타임아웃
    #[error("요청 타임아웃: {subject} ({timeout_ms}ms 초과)")]
    Timeout {
        /// 요청 subject
        subject: String,
        /// 초과된 타임아웃 (밀리초)
        timeout_ms: u64,
    },

    /// 메타 리더가 없는 클러스터
    #[error("클러스터에 현재 리더가 없습니다")]
    NoLeader,

    /// 메타 리더 응답 없음 (시스템 계정 권한 부족 등)
    #[error("메타 리더 응답을 받지 못했습니다 (응답 {received}개). 시스템 권한이 있는 계정인지 확인하세요")]
    NoMetaLeaderResponse {
        /// 실제 수신한 응답 수
        received: usize,
    },

    /// 이름/ID가 일치하는 피어 없음
    #[error("{0} 이름의 레플리카를 찾을 수 없습니다")]
    UnknownPeer(String),

    /// 오프라인이 아닌 피어 제거 시도
    #[error("오프라인 노드만 제거할 수 있습니다: {0}")]
    PeerOnline(String),

    /// 클러스터 관리 API 에러 응답
    #[error("API 에러 {code}: {description}")]
    Api {
        /// 에러 코드
        code: u16,
        /// 에러 설명
        description: String,
    },

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_message_names_subject() {
        let msg = CoreError::Timeout {
            subject: "$SYS.REQ.SERVER.PING.JSZ".into(),
            timeout_ms: 5_000,
        }
        .to_string();
        assert!(msg.contains("$SYS.REQ.SERVER.PING.JSZ"));
        assert!(msg.contains("5000"));
    }

    #[test]
    fn error_messages_name_the_peer() {
        let msg = CoreError::UnknownPeer("n9".into()).to_string();
        assert!(msg.contains("n9"));
    }
}
