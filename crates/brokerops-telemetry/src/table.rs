//! 순위 표 렌더링.
//!
//! 제목 한 줄 + 테두리 있는 표. 첫 열은 왼쪽, 나머지는 오른쪽 정렬.

use brokerops_core::models::telemetry::{AggregatedAccountView, RankingKey};
use chrono::{DateTime, Utc};

use crate::format::{comma, iec_bytes};

/// 계정 표 헤더
pub const ACCOUNT_HEADERS: [&str; 8] = [
    "Account",
    "Servers",
    "Connections",
    "Leafnodes",
    "Subscriptions",
    "Slow",
    "Sent",
    "Received",
];

/// 단순 텍스트 표
#[derive(Debug, Clone, Default)]
pub struct TableWriter {
    title: String,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TableWriter {
    /// 제목을 가진 빈 표
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// 헤더 설정
    pub fn headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.headers = headers.into_iter().map(Into::into).collect();
        self
    }

    /// 행 추가
    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// 행 수
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// 행이 없는지
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 문자열로 렌더링
    pub fn render(&self) -> String {
        let columns = self
            .rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0);

        let mut widths = vec![0usize; columns];
        for row in std::iter::once(&self.headers).chain(self.rows.iter()) {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        let border = |left: &str, mid: &str, right: &str| {
            let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
            format!("{left}{}{right}", segments.join(mid))
        };
        let line = |row: &[String]| {
            let cells: Vec<String> = widths
                .iter()
                .enumerate()
                .map(|(i, &w)| {
                    let cell = row.get(i).map(String::as_str).unwrap_or("");
                    if i == 0 {
                        format!(" {cell:<w$} ")
                    } else {
                        format!(" {cell:>w$} ")
                    }
                })
                .collect();
            format!("│{}│", cells.join("│"))
        };

        let mut out = Vec::with_capacity(self.rows.len() + 5);
        out.push(self.title.clone());
        out.push(border("╭", "┬", "╮"));
        if !self.headers.is_empty() {
            out.push(line(&self.headers));
            out.push(border("├", "┼", "┤"));
        }
        for row in &self.rows {
            out.push(line(row));
        }
        out.push(border("╰", "┴", "╯"));
        out.join("\n")
    }
}

/// 대시보드 제목
///
/// 전체가 제한보다 많으면 "표시 / 전체" 형태로 보여준다.
pub fn heading(
    key: RankingKey,
    limit: usize,
    total: usize,
    last_received: Option<DateTime<Utc>>,
) -> String {
    let count = if total > limit {
        format!("{limit} / {total}")
    } else {
        total.to_string()
    };
    let at = last_received
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());

    format!("Top {count} Account activity by {} at {at}", key.label())
}

/// 순위가 매겨진 계정 표
pub fn render_accounts(
    ranked: &[AggregatedAccountView],
    key: RankingKey,
    limit: usize,
    total: usize,
    last_received: Option<DateTime<Utc>>,
) -> String {
    let mut table =
        TableWriter::new(heading(key, limit, total, last_received)).headers(ACCOUNT_HEADERS);

    for view in ranked {
        let c = &view.counters;
        table.add_row(vec![
            view.account.clone(),
            view.servers.to_string(),
            comma(c.conns),
            comma(c.leafnodes),
            comma(c.subscriptions),
            comma(c.slow_consumers),
            format!("{} / {}", comma(c.sent.msgs), iec_bytes(c.sent.bytes)),
            format!("{} / {}", comma(c.received.msgs), iec_bytes(c.received.bytes)),
        ]);
    }

    table.render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use brokerops_core::models::telemetry::{DataStats, UsageCounters};
    use chrono::TimeZone;

    #[test]
    fn heading_shows_truncation() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        assert_eq!(
            heading(RankingKey::SentB, 10, 25, Some(at)),
            "Top 10 / 25 Account activity by Sent Bytes at 2024-05-01 10:00:00"
        );
        assert_eq!(
            heading(RankingKey::Conns, 10, 3, None),
            "Top 3 Account activity by Connections at -"
        );
    }

    #[test]
    fn renders_account_rows() {
        let ranked = vec![AggregatedAccountView {
            account: "ACME".into(),
            servers: 2,
            counters: UsageCounters {
                conns: 1_200,
                leafnodes: 3,
                subscriptions: 45_000,
                slow_consumers: 1,
                sent: DataStats {
                    msgs: 10_000,
                    bytes: 1_536,
                },
                received: DataStats { msgs: 5, bytes: 8 },
                ..Default::default()
            },
        }];

        let out = render_accounts(&ranked, RankingKey::Conns, 10, 1, None);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 6);
        assert!(lines[2].contains("Account"));
        assert!(lines[2].contains("Subscriptions"));
        assert!(lines[4].contains("ACME"));
        assert!(lines[4].contains("1,200"));
        assert!(lines[4].contains("45,000"));
        assert!(lines[4].contains("10,000 / 1.5 KiB"));
        assert!(lines[4].contains("5 / 8 B"));
    }

    #[test]
    fn rows_share_width() {
        let mut table = TableWriter::new("t").headers(["a", "b"]);
        table.add_row(vec!["long-value".into(), "1".into()]);
        table.add_row(vec!["x".into(), "22222".into()]);
        let out = table.render();
        let widths: Vec<usize> = out.lines().skip(1).map(|l| l.chars().count()).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(table.len(), 2);
    }
}
