pub fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    squared_distance(a, b).sqrt()
}

pub fn vector_sum(a: &[f64], b: &[f64]) -> Vec<f64> {
    a.iter().zip(b.iter()).map(|(x, y)| x + y).collect()
}

pub fn scalar_scale(a: &[f64], scalar: f64) -> Vec<f64> {
    a.iter().map(|x| x * scalar).collect()
}

/// Inner join of two key-sorted tables on their key column.
///
/// Rows whose key appears in both tables are concatenated (left coordinates
/// first) and the key itself is dropped; everything else is skipped. Both
/// inputs must already be sorted ascending by key.
pub fn merge_join_on_key(a: &[(f64, Vec<f64>)], b: &[(f64, Vec<f64>)]) -> Vec<Vec<f64>> {
    let mut result = Vec::new();
    let mut a_idx = 0;
    let mut b_idx = 0;

    while a_idx < a.len() && b_idx < b.len() {
        if a[a_idx].0 == b[b_idx].0 {
            let mut row = a[a_idx].1.clone();
            row.extend_from_slice(&b[b_idx].1);
            result.push(row);
            a_idx += 1;
            b_idx += 1;
        } else if a[a_idx].0 < b[b_idx].0 {
            // Keys present only in a
            a_idx += 1;
        } else {
            b_idx += 1;
        }
    }

    result
}
