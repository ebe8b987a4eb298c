use crate::{constants::INF, matrix::CostMatrix, tour::Tour};

/// Exact backtracking search from node 0. Always optimal but exponential,
/// so it is used directly only for small N and as the intra-cluster solver
/// of the divide-and-conquer mode, where cluster sizes stay small by
/// construction. Recursion depth is bounded by N.
pub fn depth_first(matrix: &CostMatrix) -> Tour {
    let n = matrix.n();
    if n == 0 {
        return Tour::infeasible();
    }
    if n == 1 {
        return Tour::new(vec![0], 0.0);
    }

    let mut visited = vec![false; n];
    visited[0] = true;
    let mut path = vec![0];

    let (best_path, best_cost) = search(matrix, &mut visited, 0, &mut path);

    log::debug!("dfs: done n={n} cost={best_cost:.3}");
    if best_cost.is_finite() {
        Tour::new(best_path, best_cost)
    } else {
        Tour::infeasible()
    }
}

/// Returns the cheapest completion from `cur` back to node 0, together
/// with the full path realizing it. The `visited`/`path` buffers are
/// restored exactly before each sibling candidate is tried.
fn search(
    matrix: &CostMatrix,
    visited: &mut Vec<bool>,
    cur: usize,
    path: &mut Vec<usize>,
) -> (Vec<usize>, f64) {
    if visited.iter().all(|&v| v) {
        return (path.clone(), matrix.get(cur, 0));
    }

    let mut best_cost = INF;
    let mut best_path = Vec::new();

    for next in 1..matrix.n() {
        if visited[next] {
            continue;
        }

        visited[next] = true;
        path.push(next);

        let (p, c) = search(matrix, visited, next, path);
        let total = c + matrix.get(cur, next);
        if total < best_cost {
            best_cost = total;
            best_path = p;
        }

        visited[next] = false;
        path.pop();
    }

    (best_path, best_cost)
}

#[cfg(test)]
mod tests {
    use super::depth_first;
    use crate::constants::INF;
    use crate::matrix::CostMatrix;

    #[test]
    fn matches_brute_force_on_the_asymmetric_fixture() {
        let matrix = CostMatrix::from_rows(vec![
            vec![0.0, 4.0, 1.0, 9.0],
            vec![3.0, 0.0, 6.0, 11.0],
            vec![4.0, 1.0, 0.0, 2.0],
            vec![6.0, 5.0, -4.0, 0.0],
        ])
        .unwrap();

        let tour = depth_first(&matrix);
        assert!((tour.cost - 9.0).abs() < 1e-12);
        assert!(tour.is_permutation_of(4));
    }

    #[test]
    fn solves_a_square_of_points() {
        let matrix = CostMatrix::from_rows(vec![
            vec![INF, 1.0, 2.0_f64.sqrt(), 1.0],
            vec![1.0, INF, 1.0, 2.0_f64.sqrt()],
            vec![2.0_f64.sqrt(), 1.0, INF, 1.0],
            vec![1.0, 2.0_f64.sqrt(), 1.0, INF],
        ])
        .unwrap();

        let tour = depth_first(&matrix);
        assert!((tour.cost - 4.0).abs() < 1e-12);
    }

    #[test]
    fn propagates_infeasibility_through_the_sentinel() {
        let matrix = CostMatrix::from_rows(vec![
            vec![INF, 1.0, INF],
            vec![INF, INF, 1.0],
            vec![INF, INF, INF],
        ])
        .unwrap();

        let tour = depth_first(&matrix);
        assert!(!tour.is_feasible());
        assert!(tour.path.is_empty());
    }
}
