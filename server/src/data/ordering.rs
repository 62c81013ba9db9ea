//! Dense-rank arithmetic for ordered sibling collections
//!
//! Siblings under one parent (sections of a board, columns of a board, items of a
//! section) carry ranks `0..count`. Every insert, delete and move is expressed as a
//! set of [`RankShift`]s plus one direct write, so the ranks stay contiguous.

/// Shift every sibling rank in `lo..=hi` by `delta` (`hi = None` is open-ended)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankShift {
    pub lo: i64,
    pub hi: Option<i64>,
    pub delta: i64,
}

impl RankShift {
    /// Shift after removing the sibling at `removed`
    pub fn close_gap(removed: i64) -> Self {
        Self {
            lo: removed + 1,
            hi: None,
            delta: -1,
        }
    }

    /// Shift before inserting a sibling at `at`
    pub fn open_gap(at: i64) -> Self {
        Self {
            lo: at,
            hi: None,
            delta: 1,
        }
    }

    pub fn applies_to(&self, rank: i64) -> bool {
        rank >= self.lo && self.hi.is_none_or(|hi| rank <= hi)
    }
}

/// Target rank for a move inside a parent holding `sibling_count` members (mover included)
pub fn clamp_within(target: i64, sibling_count: i64) -> i64 {
    target.clamp(0, (sibling_count - 1).max(0))
}

/// Target rank in a new parent currently holding `count_new` members
pub fn clamp_across(target: i64, count_new: i64) -> i64 {
    target.clamp(0, count_new.max(0))
}

/// Shift needed to move one sibling from `old` to `new` in the same parent
///
/// `None` when the rank is unchanged.
pub fn plan_move_within(old: i64, new: i64) -> Option<RankShift> {
    use std::cmp::Ordering;

    match new.cmp(&old) {
        Ordering::Equal => None,
        Ordering::Less => Some(RankShift {
            lo: new,
            hi: Some(old - 1),
            delta: 1,
        }),
        Ordering::Greater => Some(RankShift {
            lo: old + 1,
            hi: Some(new),
            delta: -1,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// In-memory sibling set keyed by id, used to replay rank plans
    #[derive(Debug, Default)]
    struct Model {
        rows: Vec<(String, String, i64)>,
    }

    impl Model {
        fn apply(&mut self, parent: &str, shift: RankShift) {
            for (_, p, rank) in self.rows.iter_mut() {
                if p == parent && shift.applies_to(*rank) {
                    *rank += shift.delta;
                }
            }
        }

        fn count(&self, parent: &str) -> i64 {
            self.rows.iter().filter(|(_, p, _)| p == parent).count() as i64
        }

        fn insert(&mut self, id: &str, parent: &str) {
            let rank = self.count(parent);
            self.rows.push((id.into(), parent.into(), rank));
        }

        fn rank(&self, id: &str) -> (String, i64) {
            let (_, p, r) = self.rows.iter().find(|(i, _, _)| i == id).unwrap();
            (p.clone(), *r)
        }

        fn delete(&mut self, id: &str) {
            let (parent, rank) = self.rank(id);
            self.rows.retain(|(i, _, _)| i != id);
            self.apply(&parent, RankShift::close_gap(rank));
        }

        fn move_within(&mut self, id: &str, target: i64) {
            let (parent, old) = self.rank(id);
            let new = clamp_within(target, self.count(&parent));
            if let Some(shift) = plan_move_within(old, new) {
                self.apply(&parent, shift);
                self.set(id, &parent, new);
            }
        }

        fn move_across(&mut self, id: &str, to: &str, target: i64) {
            let (from, old) = self.rank(id);
            let new = clamp_across(target, self.count(to));
            self.apply(&from, RankShift::close_gap(old));
            self.apply(to, RankShift::open_gap(new));
            self.set(id, to, new);
        }

        fn set(&mut self, id: &str, parent: &str, rank: i64) {
            let row = self.rows.iter_mut().find(|(i, _, _)| i == id).unwrap();
            row.1 = parent.into();
            row.2 = rank;
        }

        fn ordered(&self, parent: &str) -> Vec<String> {
            let mut rows: Vec<_> = self.rows.iter().filter(|(_, p, _)| p == parent).collect();
            rows.sort_by_key(|(_, _, r)| *r);
            rows.into_iter().map(|(i, _, _)| i.clone()).collect()
        }

        fn assert_dense(&self, parent: &str) {
            let mut ranks: Vec<i64> = self
                .rows
                .iter()
                .filter(|(_, p, _)| p == parent)
                .map(|(_, _, r)| *r)
                .collect();
            ranks.sort_unstable();
            assert_eq!(ranks, (0..self.count(parent)).collect::<Vec<_>>());
        }
    }

    fn seeded(ids: &[&str]) -> Model {
        let mut model = Model::default();
        for id in ids {
            model.insert(id, "p");
        }
        model
    }

    #[test]
    fn test_plan_move_up_shifts_range_down() {
        assert_eq!(
            plan_move_within(2, 0),
            Some(RankShift {
                lo: 0,
                hi: Some(1),
                delta: 1
            })
        );
    }

    #[test]
    fn test_plan_move_down_shifts_range_up() {
        assert_eq!(
            plan_move_within(1, 3),
            Some(RankShift {
                lo: 2,
                hi: Some(3),
                delta: -1
            })
        );
    }

    #[test]
    fn test_plan_move_same_rank_is_noop() {
        assert_eq!(plan_move_within(2, 2), None);
    }

    #[test]
    fn test_clamping() {
        assert_eq!(clamp_within(10, 4), 3);
        assert_eq!(clamp_within(-1, 4), 0);
        assert_eq!(clamp_within(5, 0), 0);
        assert_eq!(clamp_across(10, 4), 4);
        assert_eq!(clamp_across(2, 0), 0);
    }

    #[test]
    fn test_move_two_to_zero() {
        let mut model = seeded(&["a", "b", "c", "d"]);
        model.move_within("c", 0);
        assert_eq!(model.ordered("p"), vec!["c", "a", "b", "d"]);
        assert_eq!(model.rank("a").1, 1);
        assert_eq!(model.rank("b").1, 2);
        assert_eq!(model.rank("d").1, 3);
        model.assert_dense("p");
    }

    #[test]
    fn test_delete_middle_keeps_sequence() {
        let mut model = seeded(&["a", "b", "c", "d"]);
        model.delete("b");
        assert_eq!(model.ordered("p"), vec!["a", "c", "d"]);
        model.assert_dense("p");
    }

    #[test]
    fn test_move_across_parents() {
        let mut model = seeded(&["a", "b", "c"]);
        model.insert("x", "q");
        model.insert("y", "q");
        model.move_across("b", "q", 1);
        assert_eq!(model.ordered("p"), vec!["a", "c"]);
        assert_eq!(model.ordered("q"), vec!["x", "b", "y"]);
        model.assert_dense("p");
        model.assert_dense("q");

        model.move_across("a", "q", 99);
        assert_eq!(model.ordered("q"), vec!["x", "b", "y", "a"]);
        model.assert_dense("p");
        model.assert_dense("q");
    }

    #[test]
    fn test_mixed_sequence_stays_dense() {
        let mut model = seeded(&["a", "b", "c", "d", "e", "f"]);
        let steps: [(&str, i64); 6] = [("a", 5), ("f", 0), ("c", 3), ("e", 100), ("b", 1), ("d", 2)];
        for (id, target) in steps {
            model.move_within(id, target);
            model.assert_dense("p");
        }
        model.delete("c");
        model.assert_dense("p");
        model.move_across("a", "q", 0);
        model.move_across("d", "q", 0);
        model.assert_dense("p");
        model.assert_dense("q");
        assert_eq!(model.ordered("q"), vec!["d", "a"]);
        model.insert("g", "p");
        model.assert_dense("p");
    }
}
