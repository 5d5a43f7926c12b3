//! Numeric samples partitioned by a factor

use crate::dataset::Factor;

/// Split `values` by the factor's levels, dropping missing values
///
/// Index `i` of the result holds the sample for level `i`; a level with no
/// observed values gets an empty sample.
pub(crate) fn partition(values: &[Option<f64>], factor: &Factor) -> Vec<Vec<f64>> {
    let mut groups = vec![Vec::new(); factor.n_levels()];
    for (value, code) in values.iter().zip(factor.codes()) {
        if let (Some(v), Some(level)) = (value, code) {
            groups[*level].push(*v);
        }
    }
    groups
}
