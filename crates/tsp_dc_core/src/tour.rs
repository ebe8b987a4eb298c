use crate::{constants::INF, matrix::CostMatrix};

/// A solver result: visit order plus its cost. An `INF` cost signals that
/// no tour was found (search exhausted or budget spent); the path is empty
/// in that case and callers must check `is_feasible` before using it.
#[derive(Clone, Debug, PartialEq)]
pub struct Tour {
    pub path: Vec<usize>,
    pub cost: f64,
}

impl Tour {
    pub fn new(path: Vec<usize>, cost: f64) -> Self {
        Self { path, cost }
    }

    pub fn infeasible() -> Self {
        Self {
            path: Vec::new(),
            cost: INF,
        }
    }

    pub fn is_feasible(&self) -> bool {
        self.cost.is_finite()
    }

    /// True when the path visits every node in `0..n` exactly once.
    pub fn is_permutation_of(&self, n: usize) -> bool {
        if self.path.len() != n {
            return false;
        }
        let mut seen = vec![false; n];
        for &idx in &self.path {
            if idx >= n || seen[idx] {
                return false;
            }
            seen[idx] = true;
        }
        true
    }

    /// Logs edge statistics of the closed tour against `matrix`.
    pub fn log_metrics(&self, matrix: &CostMatrix) {
        let n = self.path.len();
        if n < 2 {
            log::info!("metrics: n={n} nothing to report");
            return;
        }

        let edges: Vec<f64> = (0..n)
            .map(|i| matrix.get(self.path[i], self.path[(i + 1) % n]))
            .collect();
        let total: f64 = edges.iter().sum();
        let longest = edges.iter().copied().fold(0.0_f64, f64::max);
        let average = total / (n as f64);

        log::info!("metrics: n={n} total={total:.3} longest={longest:.3} avg={average:.3}");
    }
}
