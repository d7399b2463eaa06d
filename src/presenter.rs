use crate::models::QuestionRecord;
use crate::utils::truncate_string;
use std::collections::HashMap;
use std::hash::Hash;

/// A single step of a list patch.
///
/// Patches are applied in order: `Remove` and `Move` positions refer to the
/// list as it is at that step (a move removes at `from` and then inserts at
/// `to`), `Insert` and `Update` positions refer to the new list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOp {
    Remove { index: usize },
    Move { from: usize, to: usize },
    Insert { index: usize },
    Update { index: usize },
}

/// Computes the patch turning `old` into `new`.
///
/// Items are matched by `key`; matched items whose content differs according
/// to `same_content` produce an `Update`. Items on a longest common
/// subsequence of matched keys stay in place and every other matched item is
/// moved once. Keys are expected to be unique within each list.
pub fn diff<T, K, FK, FC>(old: &[T], new: &[T], key: FK, same_content: FC) -> Vec<ListOp>
where
    K: Eq + Hash,
    FK: Fn(&T) -> K,
    FC: Fn(&T, &T) -> bool,
{
    let new_positions: HashMap<K, usize> = new
        .iter()
        .enumerate()
        .map(|(i, item)| (key(item), i))
        .collect();
    let old_positions: HashMap<K, usize> = old
        .iter()
        .enumerate()
        .map(|(i, item)| (key(item), i))
        .collect();

    let mut ops = Vec::new();

    for (i, item) in old.iter().enumerate().rev() {
        if !new_positions.contains_key(&key(item)) {
            ops.push(ListOp::Remove { index: i });
        }
    }

    // Surviving rows, each identified by its position in `new`.
    let mut working: Vec<usize> = old
        .iter()
        .filter_map(|item| new_positions.get(&key(item)).copied())
        .collect();

    let stable = stable_mask(&working);
    let mut to_move: Vec<usize> = working
        .iter()
        .zip(stable.iter())
        .filter(|(_, keep)| !**keep)
        .map(|(p, _)| *p)
        .collect();
    to_move.sort_unstable();

    for target in to_move {
        let Some(from) = working.iter().position(|&p| p == target) else {
            continue;
        };
        working.remove(from);
        // Everything positioned before `target` in the new list is already in order.
        let to = working
            .iter()
            .enumerate()
            .filter(|(_, p)| **p < target)
            .max_by_key(|(_, p)| **p)
            .map(|(i, _)| i + 1)
            .unwrap_or(0);
        working.insert(to, target);
        if from != to {
            ops.push(ListOp::Move { from, to });
        }
    }

    for (j, item) in new.iter().enumerate() {
        if !old_positions.contains_key(&key(item)) {
            ops.push(ListOp::Insert { index: j });
        }
    }

    for (j, item) in new.iter().enumerate() {
        if let Some(&i) = old_positions.get(&key(item))
            && !same_content(&old[i], item)
        {
            ops.push(ListOp::Update { index: j });
        }
    }

    ops
}

/// Marks the entries of a longest strictly increasing subsequence.
fn stable_mask(seq: &[usize]) -> Vec<bool> {
    let mut tails: Vec<usize> = Vec::new();
    let mut prev: Vec<Option<usize>> = vec![None; seq.len()];

    for i in 0..seq.len() {
        let pos = tails.partition_point(|&t| seq[t] < seq[i]);
        if pos > 0 {
            prev[i] = Some(tails[pos - 1]);
        }
        if pos == tails.len() {
            tails.push(i);
        } else {
            tails[pos] = i;
        }
    }

    let mut keep = vec![false; seq.len()];
    let mut cur = tails.last().copied();
    while let Some(i) = cur {
        keep[i] = true;
        cur = prev[i];
    }
    keep
}

/// Replays a patch produced by [`diff`] on a copy of `old`.
pub fn apply_patch<T: Clone>(old: &[T], new: &[T], ops: &[ListOp]) -> Vec<T> {
    let mut rows = old.to_vec();
    for op in ops {
        match *op {
            ListOp::Remove { index } => {
                rows.remove(index);
            }
            ListOp::Move { from, to } => {
                let item = rows.remove(from);
                rows.insert(to, item);
            }
            ListOp::Insert { index } => rows.insert(index, new[index].clone()),
            ListOp::Update { index } => rows[index] = new[index].clone(),
        }
    }
    rows
}

/// Display-side copy of the question list, patched on every render.
#[derive(Debug, Default)]
pub struct QuestionListPresenter {
    rows: Vec<QuestionRecord>,
}

impl QuestionListPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Brings the displayed rows in line with `snapshot` and returns the patch
    /// that was applied. Rendering an unchanged snapshot yields no operations.
    pub fn render(&mut self, snapshot: &[QuestionRecord]) -> Vec<ListOp> {
        let ops = diff(&self.rows, snapshot, |r| r.index, |a, b| a == b);
        if !ops.is_empty() {
            self.rows = apply_patch(&self.rows, snapshot, &ops);
        }
        debug_assert_eq!(self.rows.as_slice(), snapshot);
        ops
    }

    pub fn rows(&self) -> &[QuestionRecord] {
        &self.rows
    }

    pub fn row_label(position: usize, record: &QuestionRecord, max_len: usize) -> String {
        format!(
            "{}. {}",
            position + 1,
            truncate_string(&record.statement, max_len)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(index: usize, statement: &str) -> QuestionRecord {
        QuestionRecord {
            index,
            statement: statement.to_string(),
            option1: "a".to_string(),
            option2: "b".to_string(),
            option3: "c".to_string(),
            option4: "d".to_string(),
            answer: "a".to_string(),
        }
    }

    fn keys(old: &[char], new: &[char]) -> Vec<ListOp> {
        diff(old, new, |c| *c, |a, b| a == b)
    }

    #[test]
    fn test_append_is_single_insert() {
        let ops = keys(&['a', 'b'], &['a', 'b', 'c']);
        assert_eq!(ops, vec![ListOp::Insert { index: 2 }]);
    }

    #[test]
    fn test_remove_middle() {
        let ops = keys(&['a', 'b', 'c'], &['a', 'c']);
        assert_eq!(ops, vec![ListOp::Remove { index: 1 }]);
    }

    #[test]
    fn test_removals_are_emitted_back_to_front() {
        let ops = keys(&['a', 'b', 'c', 'd'], &['b', 'd']);
        assert_eq!(
            ops,
            vec![ListOp::Remove { index: 2 }, ListOp::Remove { index: 0 }]
        );
    }

    #[test]
    fn test_last_to_front_is_one_move() {
        let ops = keys(&['a', 'b', 'c', 'd'], &['d', 'a', 'b', 'c']);
        assert_eq!(ops, vec![ListOp::Move { from: 3, to: 0 }]);
    }

    #[test]
    fn test_front_to_last_is_one_move() {
        let ops = keys(&['a', 'b', 'c', 'd'], &['b', 'c', 'd', 'a']);
        assert_eq!(ops, vec![ListOp::Move { from: 0, to: 3 }]);
    }

    #[test]
    fn test_reverse_moves_all_but_one() {
        let old = ['a', 'b', 'c', 'd'];
        let new = ['d', 'c', 'b', 'a'];
        let ops = keys(&old, &new);
        let moves = ops
            .iter()
            .filter(|op| matches!(op, ListOp::Move { .. }))
            .count();
        assert_eq!(moves, 3);
        assert_eq!(apply_patch(&old, &new, &ops), new.to_vec());
    }

    #[test]
    fn test_mixed_patch_reproduces_new_list() {
        let old = ['a', 'b', 'c', 'd', 'e'];
        let new = ['e', 'a', 'x', 'c', 'y', 'b'];
        let ops = keys(&old, &new);
        assert_eq!(apply_patch(&old, &new, &ops), new.to_vec());
    }

    #[test]
    fn test_empty_lists() {
        assert!(keys(&[], &[]).is_empty());
        assert_eq!(
            keys(&[], &['a', 'b']),
            vec![ListOp::Insert { index: 0 }, ListOp::Insert { index: 1 }]
        );
        assert_eq!(
            keys(&['a', 'b'], &[]),
            vec![ListOp::Remove { index: 1 }, ListOp::Remove { index: 0 }]
        );
    }

    #[test]
    fn test_same_identity_different_content_is_update() {
        let old = vec![record(0, "first"), record(1, "second")];
        let new = vec![record(0, "first"), record(1, "second, edited")];
        let ops = diff(&old, &new, |r| r.index, |a, b| a == b);
        assert_eq!(ops, vec![ListOp::Update { index: 1 }]);
    }

    #[test]
    fn test_render_is_idempotent() {
        let mut presenter = QuestionListPresenter::new();
        let snapshot = vec![record(0, "q0"), record(1, "q1"), record(2, "q2")];

        let first = presenter.render(&snapshot);
        assert_eq!(first.len(), 3);

        let second = presenter.render(&snapshot);
        assert!(second.is_empty());
        assert_eq!(presenter.rows(), snapshot.as_slice());
    }

    #[test]
    fn test_render_after_removal() {
        let mut presenter = QuestionListPresenter::new();
        let mut snapshot = vec![record(0, "q0"), record(1, "q1"), record(2, "q2")];
        presenter.render(&snapshot);

        snapshot.remove(1);
        let ops = presenter.render(&snapshot);
        assert_eq!(ops, vec![ListOp::Remove { index: 1 }]);
        assert_eq!(presenter.rows().len(), 2);
        assert_eq!(presenter.rows()[1].index, 2);
    }

    #[test]
    fn test_row_label() {
        let label = QuestionListPresenter::row_label(0, &record(4, "What is Rust?"), 40);
        assert_eq!(label, "1. What is Rust?");
    }
}
