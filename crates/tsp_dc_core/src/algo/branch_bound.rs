use crate::{constants::INF, matrix::CostMatrix, tour::Tour};

/// Resource bounds for the best-first search. Both caps trade the
/// optimality guarantee for bounded time and memory: with an unbounded
/// budget and no truncation the reduced-matrix bound is admissible and the
/// first completed node is the true optimum.
#[derive(Clone, Copy, Debug)]
pub struct BranchBoundConfig {
    /// Total child-node constructions allowed before the search gives up.
    /// A round only starts while the counter is below this budget, so the
    /// final count may overshoot by at most N-1.
    pub max_expansions: usize,
    /// Retained frontier nodes after each expansion round. Every retained
    /// node owns a full matrix copy, so this directly bounds peak memory.
    pub frontier_cap: usize,
}

impl Default for BranchBoundConfig {
    fn default() -> Self {
        Self {
            max_expansions: 9_999,
            frontier_cap: 5_000,
        }
    }
}

/// A frozen snapshot of partial-search state. Owns its reduced matrix;
/// expanding a node never mutates a sibling's view.
#[derive(Clone, Debug)]
pub(crate) struct SearchNode {
    matrix: CostMatrix,
    /// Admissible lower bound on any completion reachable from here.
    cost: f64,
    visited: Vec<bool>,
    path: Vec<usize>,
    current: usize,
    parent: Option<usize>,
}

impl SearchNode {
    /// Root of the search: the fully reduced matrix, with the reduction
    /// value as the initial lower bound and node 0 already visited.
    fn root(weights: &CostMatrix) -> Self {
        let (matrix, cost) = weights.reduce();
        let mut visited = vec![false; weights.n()];
        visited[0] = true;
        Self {
            matrix,
            cost,
            visited,
            path: vec![0],
            current: 0,
            parent: None,
        }
    }

    /// Child reached by taking the edge `current -> next`.
    fn child(&self, next: usize) -> Self {
        let (matrix, cost) = expand_edge(&self.matrix, self.current, next, self.cost, 0);
        let mut visited = self.visited.clone();
        visited[next] = true;
        let mut path = self.path.clone();
        path.push(next);
        Self {
            matrix,
            cost,
            visited,
            path,
            current: next,
            parent: Some(self.current),
        }
    }

    fn is_complete(&self) -> bool {
        self.visited.iter().all(|&v| v)
    }
}

/// Expands the edge `from -> to` on a node's matrix and returns the child
/// matrix along with the child's lower bound: the direct edge cost out of
/// the reduced parent matrix, plus the cost accumulated so far, plus the
/// value of the second reduction. The reverse edge back to `start` is
/// forbidden and the taken row/column are closed off before re-reducing.
pub(crate) fn expand_edge(
    matrix: &CostMatrix,
    from: usize,
    to: usize,
    prev_cost: f64,
    start: usize,
) -> (CostMatrix, f64) {
    let (mut current, _) = matrix.reduce();
    let edge_cost = current.get(from, to);
    current.set(to, start, INF);
    current.close_edge(from, to);

    let (next, next_reduction) = current.reduce();
    (next, edge_cost + prev_cost + next_reduction)
}

/// Best-first search over `SearchNode`s ordered by lower bound, with a
/// node-count budget and a frontier-size cap. Exhausting either resource
/// reports the infeasible sentinel, same as a genuinely empty frontier;
/// the log line is the only way to tell the two apart.
pub fn branch_and_bound(matrix: &CostMatrix, config: &BranchBoundConfig) -> Tour {
    let n = matrix.n();
    if n == 0 {
        return Tour::infeasible();
    }

    let weights = matrix.with_inf_diagonal();
    let mut frontier = vec![SearchNode::root(&weights)];
    let mut expansions: usize = 0;

    log::debug!(
        "bnb: start n={n} max_expansions={} frontier_cap={}",
        config.max_expansions,
        config.frontier_cap
    );

    loop {
        let Some(best_idx) = frontier
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.cost.total_cmp(&b.1.cost))
            .map(|(i, _)| i)
        else {
            log::warn!("bnb: frontier exhausted, no tour exists n={n}");
            return Tour::infeasible();
        };

        if frontier[best_idx].is_complete() {
            let node = frontier.swap_remove(best_idx);
            log::debug!("bnb: done n={n} cost={:.3} expansions={expansions}", node.cost);
            return Tour::new(node.path, node.cost);
        }

        if expansions >= config.max_expansions {
            log::warn!(
                "bnb: expansion budget exhausted n={n} expansions={expansions} max={}",
                config.max_expansions
            );
            return Tour::infeasible();
        }

        let node = frontier.swap_remove(best_idx);
        log::trace!(
            "bnb: expand current={} parent={:?} depth={} bound={:.3}",
            node.current,
            node.parent,
            node.path.len(),
            node.cost
        );
        for next in 0..n {
            if !node.visited[next] {
                frontier.push(node.child(next));
                expansions += 1;
            }
        }

        truncate_to_smallest(&mut frontier, config.frontier_cap);
    }
}

/// Keeps the `cap` lowest-bound nodes. A partial selection, not a full
/// sort: everything kept is guaranteed no worse than everything dropped.
fn truncate_to_smallest(frontier: &mut Vec<SearchNode>, cap: usize) {
    if cap == 0 {
        frontier.clear();
        return;
    }
    if frontier.len() > cap {
        frontier.select_nth_unstable_by(cap - 1, |a, b| a.cost.total_cmp(&b.cost));
        frontier.truncate(cap);
    }
}

#[cfg(test)]
mod tests {
    use super::{branch_and_bound, expand_edge, truncate_to_smallest, BranchBoundConfig, SearchNode};
    use crate::constants::INF;
    use crate::matrix::CostMatrix;

    fn reduced_5x5() -> CostMatrix {
        CostMatrix::from_rows(vec![
            vec![INF, 10.0, 17.0, 0.0, 1.0],
            vec![12.0, INF, 11.0, 2.0, 0.0],
            vec![0.0, 3.0, INF, 0.0, 2.0],
            vec![15.0, 3.0, 12.0, INF, 0.0],
            vec![11.0, 0.0, 0.0, 12.0, INF],
        ])
        .unwrap()
    }

    fn asymmetric_4x4() -> CostMatrix {
        CostMatrix::from_rows(vec![
            vec![0.0, 4.0, 1.0, 9.0],
            vec![3.0, 0.0, 6.0, 11.0],
            vec![4.0, 1.0, 0.0, 2.0],
            vec![6.0, 5.0, -4.0, 0.0],
        ])
        .unwrap()
    }

    #[test]
    fn expand_edge_zero_one_yields_bound_35_and_sentinel_row_col() {
        let (child, bound) = expand_edge(&reduced_5x5(), 0, 1, 25.0, 0);
        assert!((bound - 35.0).abs() < 1e-12);
        for col in 0..5 {
            assert_eq!(child.get(0, col), INF);
        }
        for row in 0..5 {
            assert_eq!(child.get(row, 1), INF);
        }
    }

    #[test]
    fn expand_edge_zero_two_yields_bound_53() {
        let (child, bound) = expand_edge(&reduced_5x5(), 0, 2, 25.0, 0);
        assert!((bound - 53.0).abs() < 1e-12);
        // column 0 re-reduces by 11 after the expansion
        assert_eq!(child.get(1, 0), 1.0);
        assert_eq!(child.get(3, 0), 4.0);
        assert_eq!(child.get(4, 0), 0.0);
        assert_eq!(child.get(2, 0), INF);
    }

    #[test]
    fn expand_edge_zero_three_yields_bound_25() {
        let (child, bound) = expand_edge(&reduced_5x5(), 0, 3, 25.0, 0);
        assert!((bound - 25.0).abs() < 1e-12);
        // the reverse edge back to the start is forbidden
        assert_eq!(child.get(3, 0), INF);
        assert_eq!(child.get(1, 0), 12.0);
    }

    #[test]
    fn finds_the_known_optimum_on_the_asymmetric_fixture() {
        let tour = branch_and_bound(&asymmetric_4x4(), &BranchBoundConfig::default());
        assert!((tour.cost - 9.0).abs() < 1e-12);
        assert!(tour.is_permutation_of(4));
    }

    #[test]
    fn exhausted_budget_reports_the_sentinel() {
        let config = BranchBoundConfig {
            max_expansions: 1,
            frontier_cap: 5_000,
        };
        let tour = branch_and_bound(&asymmetric_4x4(), &config);
        assert!(!tour.is_feasible());
    }

    #[test]
    fn tight_frontier_cap_still_completes_a_full_tour() {
        let config = BranchBoundConfig {
            max_expansions: 9_999,
            frontier_cap: 1,
        };
        let tour = branch_and_bound(&asymmetric_4x4(), &config);
        assert!(tour.is_feasible());
        assert!(tour.is_permutation_of(4));
        assert!(tour.cost >= 9.0 - 1e-12);
    }

    #[test]
    fn truncation_keeps_the_lowest_bound_nodes() {
        let weights = asymmetric_4x4().with_inf_diagonal();
        let root = SearchNode::root(&weights);
        let mut frontier: Vec<SearchNode> = (1..4).map(|next| root.child(next)).collect();
        let mut costs: Vec<f64> = frontier.iter().map(|node| node.cost).collect();
        costs.sort_by(f64::total_cmp);

        truncate_to_smallest(&mut frontier, 2);
        assert_eq!(frontier.len(), 2);
        let mut kept: Vec<f64> = frontier.iter().map(|node| node.cost).collect();
        kept.sort_by(f64::total_cmp);
        assert_eq!(kept, costs[..2].to_vec());
    }

    #[test]
    fn single_node_instance_is_trivially_complete() {
        let matrix = CostMatrix::from_rows(vec![vec![0.0]]).unwrap();
        let tour = branch_and_bound(&matrix, &BranchBoundConfig::default());
        assert_eq!(tour.path, vec![0]);
        assert_eq!(tour.cost, 0.0);
    }
}
