//! 계정 순위.
//!
//! 선택 기준 내림차순 → 연결 수 내림차순 → 계정 ID 오름차순.
//! 같은 입력이면 매번 같은 순서가 나와 화면이 흔들리지 않는다.

use brokerops_core::error::CoreError;
use brokerops_core::models::telemetry::{AggregatedAccountView, RankingKey};
use std::cmp::Ordering;

/// 두 계정 뷰 비교 (앞에 올 쪽이 `Less`)
pub fn compare(a: &AggregatedAccountView, b: &AggregatedAccountView, key: RankingKey) -> Ordering {
    key.value(&b.counters)
        .cmp(&key.value(&a.counters))
        .then_with(|| b.counters.conns.cmp(&a.counters.conns))
        .then_with(|| a.account.cmp(&b.account))
}

/// 정렬 후 상위 `limit`개 반환
///
/// 반환 길이는 `min(limit, views.len())`. `limit`이 0이면 설정 에러.
pub fn rank(
    mut views: Vec<AggregatedAccountView>,
    key: RankingKey,
    limit: usize,
) -> Result<Vec<AggregatedAccountView>, CoreError> {
    if limit == 0 {
        return Err(CoreError::Config(
            "표시할 계정 수는 1 이상이어야 합니다".to_string(),
        ));
    }

    views.sort_by(|a, b| compare(a, b, key));
    views.truncate(limit);
    Ok(views)
}

#[cfg(test)]
mod tests {
    use super::*;
    use brokerops_core::models::telemetry::{DataStats, UsageCounters};

    fn view(account: &str, conns: u64, subs: u64, sent_bytes: u64) -> AggregatedAccountView {
        AggregatedAccountView {
            account: account.to_string(),
            servers: 1,
            counters: UsageCounters {
                conns,
                subscriptions: subs,
                sent: DataStats {
                    msgs: 0,
                    bytes: sent_bytes,
                },
                ..Default::default()
            },
        }
    }

    fn accounts(views: &[AggregatedAccountView]) -> Vec<&str> {
        views.iter().map(|v| v.account.as_str()).collect()
    }

    #[test]
    fn sorts_descending_by_selected_key() {
        let views = vec![view("a", 1, 5, 0), view("b", 1, 50, 0), view("c", 1, 20, 0)];
        let ranked = rank(views, RankingKey::Subs, 10).unwrap();
        assert_eq!(accounts(&ranked), ["b", "c", "a"]);
    }

    #[test]
    fn connections_break_ties() {
        let views = vec![view("low", 2, 10, 0), view("high", 9, 10, 0)];
        let ranked = rank(views, RankingKey::Subs, 10).unwrap();
        assert_eq!(accounts(&ranked), ["high", "low"]);

        let views = vec![view("low", 2, 0, 7), view("high", 9, 0, 7)];
        let ranked = rank(views, RankingKey::SentB, 10).unwrap();
        assert_eq!(accounts(&ranked), ["high", "low"]);
    }

    #[test]
    fn full_ties_are_stable_across_calls() {
        let forward = vec![view("x", 3, 3, 3), view("y", 3, 3, 3), view("z", 3, 3, 3)];
        let mut reversed = forward.clone();
        reversed.reverse();

        let a = rank(forward, RankingKey::Conns, 10).unwrap();
        let b = rank(reversed, RankingKey::Conns, 10).unwrap();
        assert_eq!(a, b);
        assert_eq!(accounts(&a), ["x", "y", "z"]);
    }

    #[test]
    fn truncates_to_limit() {
        let views: Vec<_> = (0..6).map(|i| view(&format!("a{i}"), i, 0, 0)).collect();

        assert_eq!(rank(views.clone(), RankingKey::Conns, 3).unwrap().len(), 3);
        assert_eq!(rank(views.clone(), RankingKey::Conns, 6).unwrap().len(), 6);
        assert_eq!(rank(views.clone(), RankingKey::Conns, 50).unwrap().len(), 6);
        assert_eq!(accounts(&rank(views, RankingKey::Conns, 2).unwrap()), ["a5", "a4"]);
    }

    #[test]
    fn zero_limit_is_config_error() {
        let err = rank(vec![view("a", 1, 1, 1)], RankingKey::Conns, 0).unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }

    #[test]
    fn empty_input_ranks_to_empty() {
        assert!(rank(Vec::new(), RankingKey::Slow, 5).unwrap().is_empty());
    }
}
