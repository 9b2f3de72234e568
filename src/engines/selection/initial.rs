use crate::types::SortDirection;
use std::cmp::Ordering;

/// Column positions ordered best first. Stable on ties; NaN always ranks last.
pub fn rank_indices(scores: &[f64], direction: SortDirection) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| compare_scores(scores[a], scores[b], direction));
    order
}

/// The best `top_n` positions.
pub fn top_n_indices(scores: &[f64], direction: SortDirection, top_n: usize) -> Vec<usize> {
    let mut order = rank_indices(scores, direction);
    order.truncate(top_n);
    order
}

fn compare_scores(a: f64, b: f64, direction: SortDirection) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => match direction {
            SortDirection::Ascending => a.total_cmp(&b),
            SortDirection::Descending => b.total_cmp(&a),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descending_rank() {
        let scores = [0.1, 0.5, 0.3];
        assert_eq!(rank_indices(&scores, SortDirection::Descending), vec![1, 2, 0]);
        assert_eq!(top_n_indices(&scores, SortDirection::Descending, 2), vec![1, 2]);
    }

    #[test]
    fn test_ascending_rank() {
        let scores = [0.1, 0.5, 0.3];
        assert_eq!(rank_indices(&scores, SortDirection::Ascending), vec![0, 2, 1]);
    }

    #[test]
    fn test_nan_ranks_last_both_ways() {
        let scores = [f64::NAN, 0.2, 0.1];
        assert_eq!(rank_indices(&scores, SortDirection::Descending), vec![1, 2, 0]);
        assert_eq!(rank_indices(&scores, SortDirection::Ascending), vec![2, 1, 0]);
    }

    #[test]
    fn test_ties_keep_column_order() {
        let scores = [0.2, 0.2, 0.2];
        assert_eq!(rank_indices(&scores, SortDirection::Descending), vec![0, 1, 2]);
        assert_eq!(rank_indices(&scores, SortDirection::Ascending), vec![0, 1, 2]);
    }

    #[test]
    fn test_top_n_larger_than_universe() {
        assert_eq!(top_n_indices(&[0.3, 0.1], SortDirection::Descending, 10), vec![0, 1]);
    }
}
