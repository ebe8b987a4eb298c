use crate::{constants::INF, node::Point, Error, Result};

/// Dense N×N cost matrix. `cells[row * n + col]` is the cost of traveling
/// `row -> col`; it need not be symmetric. `INF` marks the diagonal and any
/// disallowed edge.
#[derive(Clone, Debug, PartialEq)]
pub struct CostMatrix {
    n: usize,
    cells: Vec<f64>,
}

impl CostMatrix {
    /// Symmetric Euclidean matrix with an `INF` diagonal.
    pub fn from_points(points: &[Point]) -> Self {
        let n = points.len();
        let mut matrix = Self {
            n,
            cells: vec![INF; n * n],
        };
        for i in 0..n {
            for j in (i + 1)..n {
                let d = points[i].dist(&points[j]);
                matrix.set(i, j, d);
                matrix.set(j, i, d);
            }
        }
        matrix
    }

    /// Builds a matrix from explicit rows. Ragged input is a programming
    /// error on the caller's side and fails fast.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n = rows.len();
        let mut cells = Vec::with_capacity(n * n);
        for row in &rows {
            if row.len() != n {
                return Err(Error::invalid_data(format!(
                    "matrix must be square: got a row of {} entries in a {n}x{n} matrix",
                    row.len()
                )));
            }
            cells.extend_from_slice(row);
        }
        Ok(Self { n, cells })
    }

    pub fn n(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.cells[row * self.n + col]
    }

    #[inline]
    pub(crate) fn set(&mut self, row: usize, col: usize, value: f64) {
        self.cells[row * self.n + col] = value;
    }

    /// Copy with every self-loop closed off.
    pub(crate) fn with_inf_diagonal(&self) -> Self {
        let mut matrix = self.clone();
        for i in 0..self.n {
            matrix.set(i, i, INF);
        }
        matrix
    }

    /// Row+column reduction: subtract each row's finite minimum from its
    /// finite entries, then the same per column, and return the fresh
    /// reduced matrix along with the total subtracted value. Rows and
    /// columns without a finite entry contribute nothing, so `INF` is
    /// never turned into a finite cost.
    pub fn reduce(&self) -> (Self, f64) {
        let mut reduced = self.clone();
        let mut total = 0.0;

        for row in 0..self.n {
            let mut min = INF;
            for col in 0..self.n {
                min = min.min(reduced.get(row, col));
            }
            if min.is_finite() {
                total += min;
                for col in 0..self.n {
                    let v = reduced.get(row, col);
                    if v.is_finite() {
                        reduced.set(row, col, v - min);
                    }
                }
            }
        }

        for col in 0..self.n {
            let mut min = INF;
            for row in 0..self.n {
                min = min.min(reduced.get(row, col));
            }
            if min.is_finite() {
                total += min;
                for row in 0..self.n {
                    let v = reduced.get(row, col);
                    if v.is_finite() {
                        reduced.set(row, col, v - min);
                    }
                }
            }
        }

        (reduced, total)
    }

    /// Closes off row `from` and column `to` in place. Only called on a
    /// matrix the caller owns exclusively, inside node expansion.
    pub(crate) fn close_edge(&mut self, from: usize, to: usize) {
        for col in 0..self.n {
            self.set(from, col, INF);
        }
        for row in 0..self.n {
            self.set(row, to, INF);
        }
    }

    /// Sub-matrix over `idxs`, preserving their order: local index `i`
    /// maps to global index `idxs[i]`.
    pub(crate) fn sub_matrix(&self, idxs: &[usize]) -> Self {
        let n = idxs.len();
        let mut sub = Self {
            n,
            cells: vec![INF; n * n],
        };
        for (i, &gi) in idxs.iter().enumerate() {
            for (j, &gj) in idxs.iter().enumerate() {
                if i != j {
                    sub.set(i, j, self.get(gi, gj));
                }
            }
        }
        sub
    }

    /// Closed-tour cost: consecutive edges plus the edge back to the start.
    pub fn tour_cost(&self, path: &[usize]) -> f64 {
        let n = path.len();
        let mut total = 0.0;
        for i in 0..n {
            total += self.get(path[i], path[(i + 1) % n]);
        }
        total
    }
}
