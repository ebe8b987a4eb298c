/// Sentinel cost for "no edge". Compares above every finite cost and stays
/// infinite through addition, so a blocked transition can never leak back
/// into a finite bound.
pub const INF: f64 = f64::INFINITY;

/// A cycle needs at least two points.
pub(crate) const MIN_TOUR_POINTS: usize = 2;
