//! 표준 입력 확인 프롬프트.

use brokerops_core::error::CoreError;
use brokerops_core::ports::display::Confirmer;
use std::io::{self, BufRead, Write};

/// `[y/N]` 확인. 빈 입력은 아니오.
///
/// 읽기는 블로킹이다. 비동기 코드에서는 `spawn_blocking` 안에서 부른다.
pub struct StdinConfirmer;

impl Confirmer for StdinConfirmer {
    fn notice(&self, message: &str) -> Result<(), CoreError> {
        let mut out = io::stdout();
        writeln!(out, "{message}")?;
        writeln!(out)?;
        out.flush()?;
        Ok(())
    }

    fn confirm(&self, question: &str) -> Result<bool, CoreError> {
        let mut out = io::stdout();
        write!(out, "{question} [y/N] ")?;
        out.flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(is_yes(&answer))
    }
}

/// 긍정 응답인지
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_no() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes("\n"));
        assert!(!is_yes("nope"));
    }
}
