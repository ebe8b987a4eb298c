use crate::{matrix::CostMatrix, tour::Tour};

/// Exhaustive baseline: evaluates every closed tour with node 0 fixed as
/// the start (rotations of the same cycle are not counted twice). Only
/// intended for small N; the other solvers must agree with it there.
pub fn brute_force(matrix: &CostMatrix) -> Tour {
    let n = matrix.n();
    if n == 0 {
        return Tour::infeasible();
    }
    if n == 1 {
        return Tour::new(vec![0], 0.0);
    }

    let mut rest: Vec<usize> = (1..n).collect();
    let mut best = Tour::infeasible();
    permute(matrix, &mut rest, 0, &mut best);

    log::debug!("brute: done n={n} cost={:.3}", best.cost);
    best
}

fn permute(matrix: &CostMatrix, rest: &mut Vec<usize>, depth: usize, best: &mut Tour) {
    if depth == rest.len() {
        let mut path = Vec::with_capacity(rest.len() + 1);
        path.push(0);
        path.extend_from_slice(rest);
        let cost = matrix.tour_cost(&path);
        if cost < best.cost {
            *best = Tour::new(path, cost);
        }
        return;
    }

    for i in depth..rest.len() {
        rest.swap(depth, i);
        permute(matrix, rest, depth + 1, best);
        rest.swap(depth, i);
    }
}

#[cfg(test)]
mod tests {
    use super::brute_force;
    use crate::constants::INF;
    use crate::matrix::CostMatrix;

    #[test]
    fn finds_the_known_optimum_on_the_asymmetric_fixture() {
        let matrix = CostMatrix::from_rows(vec![
            vec![0.0, 4.0, 1.0, 9.0],
            vec![3.0, 0.0, 6.0, 11.0],
            vec![4.0, 1.0, 0.0, 2.0],
            vec![6.0, 5.0, -4.0, 0.0],
        ])
        .unwrap();

        let tour = brute_force(&matrix);
        assert!((tour.cost - 9.0).abs() < 1e-12);
        assert_eq!(tour.path, vec![0, 3, 2, 1]);
        assert!(tour.is_permutation_of(4));
    }

    #[test]
    fn reports_infeasible_when_no_finite_tour_exists() {
        let matrix =
            CostMatrix::from_rows(vec![vec![INF, INF], vec![INF, INF]]).unwrap();
        let tour = brute_force(&matrix);
        assert!(!tour.is_feasible());
    }

    #[test]
    fn single_node_is_a_trivial_tour() {
        let matrix = CostMatrix::from_rows(vec![vec![INF]]).unwrap();
        let tour = brute_force(&matrix);
        assert_eq!(tour.path, vec![0]);
        assert_eq!(tour.cost, 0.0);
    }
}
