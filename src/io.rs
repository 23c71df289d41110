//! Input collaborators for the clustering core: CSV point loading, the
//! two-table join loader, centroid serialization, and the hand-off file
//! format used to pass a configured point set to an external routine.

use std::cmp::Ordering;
use std::fs;
use std::path::Path;

use itertools::Itertools;

use crate::error::{Error, Result};
use crate::traits::{PointInterface, VecPoint};
use crate::utils::merge_join_on_key;

fn parse_row(line: &str, line_number: usize) -> Result<Vec<f64>> {
    line.split(',')
        .map(|field| {
            field.trim().parse::<f64>().map_err(|_| {
                Error::InvalidData(format!(
                    "non-numeric field {:?} on line {}",
                    field, line_number
                ))
            })
        })
        .collect()
}

fn read_rows(path: &Path) -> Result<Vec<Vec<f64>>> {
    let content = fs::read_to_string(path)?;
    content
        .lines()
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(i, line)| parse_row(line, i + 1))
        .collect()
}

// Dimensionality is validated once at load time.
fn check_uniform(rows: &[Vec<f64>]) -> Result<()> {
    if rows.is_empty() {
        return Err(Error::InvalidData("empty point set".to_string()));
    }
    let dim = rows[0].len();
    if let Some((i, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != dim) {
        return Err(Error::InvalidData(format!(
            "line {} has {} fields, expected {}",
            i + 1,
            row.len(),
            dim
        )));
    }
    Ok(())
}

/// Loads a point set from a CSV file of comma-separated floats, one point
/// per line.
pub fn load_points(path: impl AsRef<Path>) -> Result<Vec<VecPoint>> {
    let rows = read_rows(path.as_ref())?;
    check_uniform(&rows)?;
    Ok(rows.into_iter().map(VecPoint).collect())
}

fn read_keyed_rows(path: &Path) -> Result<Vec<(f64, Vec<f64>)>> {
    let mut rows: Vec<(f64, Vec<f64>)> = read_rows(path)?
        .into_iter()
        .map(|mut row| {
            let key = row.remove(0);
            (key, row)
        })
        .collect();
    rows.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Less));
    Ok(rows)
}

/// Loads two CSV tables, inner joins them on the shared first column, sorts
/// ascending by that key, and drops the key column to yield the point
/// coordinates.
pub fn load_joined(path1: impl AsRef<Path>, path2: impl AsRef<Path>) -> Result<Vec<VecPoint>> {
    let a = read_keyed_rows(path1.as_ref())?;
    let b = read_keyed_rows(path2.as_ref())?;

    let rows = merge_join_on_key(&a, &b);
    check_uniform(&rows)?;
    Ok(rows.into_iter().map(VecPoint).collect())
}

/// Renders a centroid as comma-separated floats at 4 decimal places.
pub fn format_centroid<P: PointInterface>(centroid: &P) -> String {
    centroid
        .to_f64_vec()
        .iter()
        .map(|v| format!("{:.4}", v))
        .join(",")
}

pub fn format_seed_indices(indices: &[u32]) -> String {
    indices.iter().join(",")
}

/// Serializes centroids at 4 decimal places, one centroid per line.
pub fn save_centroids<P: PointInterface>(path: impl AsRef<Path>, centroids: &[P]) -> Result<()> {
    let mut out = String::new();
    for centroid in centroids {
        out.push_str(&format_centroid(centroid));
        out.push('\n');
    }
    fs::write(path, out)?;
    Ok(())
}

/// Reads a result file of comma-separated centroids, one per line, back into
/// points. This is the read-back half of the hand-off interface: the external
/// routine overwrites the hand-off file with its centroids.
pub fn read_centroids(path: impl AsRef<Path>) -> Result<Vec<VecPoint>> {
    load_points(path)
}

/// Configuration header of a hand-off file.
#[derive(Debug, Clone, PartialEq)]
pub struct HandoffHeader {
    pub n_points: usize,
    pub dim: usize,
    pub k: usize,
    pub max_iter: usize,
    pub epsilon: f64,
}

/// Writes the intermediate hand-off file consumed by an external computation
/// routine: a `m,n,k,max_iter,epsilon` header line, the seed indices, then
/// the raw rows at full precision.
pub fn write_handoff<P: PointInterface>(
    path: impl AsRef<Path>,
    points: &[P],
    seed_indices: &[u32],
    k: usize,
    max_iter: usize,
    epsilon: f64,
) -> Result<()> {
    let dim = points.first().map(|p| p.dim()).unwrap_or(0);

    let mut out = String::new();
    out.push_str(&format!(
        "{},{},{},{},{}\n",
        points.len(),
        dim,
        k,
        max_iter,
        epsilon
    ));
    out.push_str(&format_seed_indices(seed_indices));
    out.push('\n');
    for point in points {
        out.push_str(&point.to_f64_vec().iter().map(|v| v.to_string()).join(","));
        out.push('\n');
    }

    fs::write(path, out)?;
    Ok(())
}

/// Reads a hand-off file back into its header, seed indices, and point set.
pub fn read_handoff(path: impl AsRef<Path>) -> Result<(HandoffHeader, Vec<u32>, Vec<VecPoint>)> {
    let content = fs::read_to_string(path.as_ref())?;
    let mut lines = content.lines().filter(|line| !line.is_empty());

    let header_line = lines
        .next()
        .ok_or_else(|| Error::InvalidData("missing hand-off header".to_string()))?;
    let fields: Vec<&str> = header_line.split(',').collect();
    if fields.len() != 5 {
        return Err(Error::InvalidData(format!(
            "hand-off header has {} fields, expected 5",
            fields.len()
        )));
    }
    let parse_count = |field: &str| {
        field.trim().parse::<usize>().map_err(|_| {
            Error::InvalidData(format!("bad hand-off header field {:?}", field))
        })
    };
    let header = HandoffHeader {
        n_points: parse_count(fields[0])?,
        dim: parse_count(fields[1])?,
        k: parse_count(fields[2])?,
        max_iter: parse_count(fields[3])?,
        epsilon: fields[4].trim().parse::<f64>().map_err(|_| {
            Error::InvalidData(format!("bad hand-off header field {:?}", fields[4]))
        })?,
    };

    let index_line = lines
        .next()
        .ok_or_else(|| Error::InvalidData("missing seed index line".to_string()))?;
    let seed_indices: Vec<u32> = index_line
        .split(',')
        .map(|field| {
            field.trim().parse::<u32>().map_err(|_| {
                Error::InvalidData(format!("bad seed index {:?}", field))
            })
        })
        .collect::<Result<_>>()?;

    let rows: Vec<Vec<f64>> = lines
        .enumerate()
        .map(|(i, line)| parse_row(line, i + 3))
        .collect::<Result<_>>()?;
    check_uniform(&rows)?;
    if rows.len() != header.n_points || rows[0].len() != header.dim {
        return Err(Error::InvalidData(
            "hand-off body does not match its header".to_string(),
        ));
    }

    Ok((header, seed_indices, rows.into_iter().map(VecPoint).collect()))
}
