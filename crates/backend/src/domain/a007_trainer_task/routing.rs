//! Выбор тренера для нового обращения.
//!
//! Побеждает кандидат с минимальным отношением `нагрузка / вес`.
//! При равенстве выигрывает больший вес, затем меньший id тренера.

use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub trainer_id: String,
    pub weight: i32,
    /// Обращения тренера в статусах opened / pending / reopened
    pub open_load: usize,
    pub is_active: bool,
}

/// load_a / weight_a против load_b / weight_b без деления
fn compare_share(a: &Candidate, b: &Candidate) -> Ordering {
    let left = a.open_load as i64 * b.weight.max(1) as i64;
    let right = b.open_load as i64 * a.weight.max(1) as i64;
    left.cmp(&right)
        .then_with(|| b.weight.cmp(&a.weight))
        .then_with(|| a.trainer_id.cmp(&b.trainer_id))
}

/// `None`, если активных кандидатов нет: обращение остаётся без тренера
pub fn pick_trainer(candidates: &[Candidate]) -> Option<&Candidate> {
    candidates
        .iter()
        .filter(|c| c.is_active && c.weight > 0)
        .min_by(|a, b| compare_share(a, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: &str, weight: i32, load: usize) -> Candidate {
        Candidate {
            trainer_id: id.into(),
            weight,
            open_load: load,
            is_active: true,
        }
    }

    fn picked(candidates: &[Candidate]) -> Option<&str> {
        pick_trainer(candidates).map(|c| c.trainer_id.as_str())
    }

    #[test]
    fn test_no_candidates() {
        assert_eq!(picked(&[]), None);
    }

    #[test]
    fn test_lowest_share_wins() {
        // 4/2 = 2.0 против 3/1 = 3.0
        let candidates = [candidate("t1", 1, 3), candidate("t2", 2, 4)];
        assert_eq!(picked(&candidates), Some("t2"));
    }

    #[test]
    fn test_weight_breaks_tie() {
        // 2/1 == 4/2
        let candidates = [candidate("t1", 1, 2), candidate("t2", 2, 4)];
        assert_eq!(picked(&candidates), Some("t2"));
    }

    #[test]
    fn test_id_breaks_full_tie() {
        let candidates = [candidate("t9", 3, 0), candidate("t1", 3, 0)];
        assert_eq!(picked(&candidates), Some("t1"));
    }

    #[test]
    fn test_inactive_trainers_ignored() {
        let mut busy = candidate("t1", 5, 0);
        busy.is_active = false;
        let candidates = [busy, candidate("t2", 1, 10)];
        assert_eq!(picked(&candidates), Some("t2"));

        let mut only = candidate("t3", 1, 0);
        only.is_active = false;
        assert_eq!(picked(&[only]), None);
    }

    #[test]
    fn test_heavier_weight_gets_more_before_tie() {
        // Вес 3 принимает три обращения, пока вес 1 принимает одно
        let mut loads = [0usize, 0usize];
        for _ in 0..8 {
            let candidates = [candidate("a", 3, loads[0]), candidate("b", 1, loads[1])];
            match picked(&candidates) {
                Some("a") => loads[0] += 1,
                Some("b") => loads[1] += 1,
                other => panic!("unexpected pick {:?}", other),
            }
        }
        assert_eq!(loads, [6, 2]);
    }
}
