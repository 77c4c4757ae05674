//! 렌더 표면 어댑터.
//!
//! `RenderSurface` 포트 구현. 실제 터미널(crossterm)과 메모리 캡처.

use brokerops_core::error::CoreError;
use brokerops_core::ports::display::RenderSurface;
use crossterm::cursor::MoveTo;
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::QueueableCommand;
use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;

/// 표준 출력 터미널
pub struct TerminalSurface {
    out: io::Stdout,
}

impl TerminalSurface {
    /// 표준 출력에 연결
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl RenderSurface for TerminalSurface {
    fn present(&mut self, frame: &str) -> Result<(), CoreError> {
        self.out.queue(Clear(ClearType::All))?;
        self.out.queue(MoveTo(0, 0))?;
        // raw 모드가 아니어도 줄 시작에서 그려지도록 CRLF 사용
        for line in frame.lines() {
            write!(self.out, "{line}\r\n")?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn height(&self) -> Option<usize> {
        terminal::size().ok().map(|(_, rows)| rows as usize)
    }
}

/// 그린 프레임을 메모리에 쌓는 표면 (헤드리스 실행, 테스트용)
#[derive(Debug, Clone, Default)]
pub struct CapturedFrames {
    frames: Arc<Mutex<Vec<String>>>,
    height: Option<usize>,
}

impl CapturedFrames {
    /// 고정 높이 캡처 표면
    pub fn with_height(height: Option<usize>) -> Self {
        Self {
            frames: Arc::new(Mutex::new(Vec::new())),
            height,
        }
    }

    /// 지금까지 그린 프레임 (복제본)
    pub fn frames(&self) -> Vec<String> {
        self.frames.lock().clone()
    }

    /// 마지막 프레임
    pub fn last(&self) -> Option<String> {
        self.frames.lock().last().cloned()
    }
}

impl RenderSurface for CapturedFrames {
    fn present(&mut self, frame: &str) -> Result<(), CoreError> {
        self.frames.lock().push(frame.to_string());
        Ok(())
    }

    fn height(&self) -> Option<usize> {
        self.height
    }
}
