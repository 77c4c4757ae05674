//! 메시지 버스 포트.
//!
//! 와일드카드 subject 구독과 타임아웃 있는 요청/응답.
//! 구현: 호스트가 주입하는 브로커 클라이언트

use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use crate::error::CoreError;

/// 수신 메시지
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// 실제 발행 subject
    pub subject: String,
    /// 페이로드
    pub payload: Vec<u8>,
}

impl InboundMessage {
    /// 새 수신 메시지
    pub fn new(subject: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            subject: subject.into(),
            payload: payload.into(),
        }
    }
}

/// 활성 구독
///
/// 어댑터가 메시지를 `mpsc` 채널로 밀어 넣고, 구독 해제는 `oneshot`으로 알린다.
/// drop 시에도 해제 신호가 전달된다.
#[derive(Debug)]
pub struct Subscription {
    subject: String,
    receiver: mpsc::Receiver<InboundMessage>,
    cancel: Option<oneshot::Sender<()>>,
}

impl Subscription {
    /// 어댑터용 생성자
    pub fn new(
        subject: impl Into<String>,
        receiver: mpsc::Receiver<InboundMessage>,
        cancel: oneshot::Sender<()>,
    ) -> Self {
        Self {
            subject: subject.into(),
            receiver,
            cancel: Some(cancel),
        }
    }

    /// 구독 subject 패턴
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// 다음 메시지 (어댑터가 채널을 닫으면 None)
    pub async fn next(&mut self) -> Option<InboundMessage> {
        self.receiver.recv().await
    }

    /// 구독 해제
    pub fn unsubscribe(mut self) {
        self.cancel_inner();
    }

    fn cancel_inner(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            debug!("구독 해제: {}", self.subject);
            let _ = cancel.send(());
        }
        self.receiver.close();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_inner();
    }
}

/// 메시지 버스 (publish/subscribe + request/reply)
#[async_trait]
pub trait MessageBus: Send + Sync {
    /// subject 패턴 구독 (`*` 와일드카드 지원)
    async fn subscribe(&self, subject: &str) -> Result<Subscription, CoreError>;

    /// 요청 후 첫 응답 대기
    ///
    /// 시간 초과 시 `CoreError::Timeout`.
    async fn request(
        &self,
        subject: &str,
        payload: Vec<u8>,
        timeout: Duration,
    ) -> Result<Vec<u8>, CoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn drop_signals_cancel() {
        let (_tx, rx) = mpsc::channel(4);
        let (cancel_tx, cancel_rx) = oneshot::channel();
        let sub = Subscription::new("a.*", rx, cancel_tx);
        assert_eq!(sub.subject(), "a.*");

        drop(sub);
        assert!(cancel_rx.await.is_ok());
    }

    #[tokio::test]
    async fn unsubscribe_closes_receiver() {
        let (tx, rx) = mpsc::channel(4);
        let (cancel_tx, cancel_rx) = oneshot::channel();
        let mut sub = Subscription::new("a.*", rx, cancel_tx);

        tx.send(InboundMessage::new("a.b", b"x".to_vec())).await.unwrap();
        assert_eq!(sub.next().await.unwrap().subject, "a.b");

        sub.unsubscribe();
        assert!(cancel_rx.await.is_ok());
        assert!(tx.send(InboundMessage::new("a.c", Vec::new())).await.is_err());
    }
}
