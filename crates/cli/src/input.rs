//! Point-set readers: JSON documents and CSV tables.
//!
//! - `.json`: either a bare array of coordinate arrays or `{"points": [...]}`.
//! - `.csv`: one row per point, one column per coordinate, header required.

use anyhow::{bail, Context, Result};
use polars::prelude::*;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Deserialize)]
#[serde(untagged)]
enum PointsDoc {
    Bare(Vec<Vec<f64>>),
    Wrapped { points: Vec<Vec<f64>> },
}

/// Read points from `path`, dispatching on the extension.
pub fn read_points(path: &Path) -> Result<Vec<Vec<f64>>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    let points = match ext.as_deref() {
        Some("json") => read_json(path)?,
        Some("csv") => read_csv(path)?,
        _ => bail!(
            "unsupported input {}: expected .json or .csv",
            path.display()
        ),
    };
    tracing::info!(input = %path.display(), points = points.len(), "points_loaded");
    Ok(points)
}

fn read_json(path: &Path) -> Result<Vec<Vec<f64>>> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let doc: PointsDoc = serde_json::from_slice(&bytes)
        .with_context(|| format!("parsing points from {}", path.display()))?;
    Ok(match doc {
        PointsDoc::Bare(points) | PointsDoc::Wrapped { points } => points,
    })
}

fn read_csv(path: &Path) -> Result<Vec<Vec<f64>>> {
    let df = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(100))
        .finish()
        .with_context(|| format!("opening {}", path.display()))?
        .collect()
        .with_context(|| format!("reading {}", path.display()))?;
    tracing::debug!(rows = df.height(), cols = df.width(), "input_csv_shape");
    let mut points = vec![Vec::with_capacity(df.width()); df.height()];
    for series in df.get_columns() {
        let name = series.name().to_string();
        let floats = series
            .cast(&DataType::Float64)
            .with_context(|| format!("column {name} is not numeric"))?;
        for (row, value) in floats.f64()?.into_iter().enumerate() {
            match value {
                Some(x) => points[row].push(x),
                None => bail!("column {name} has a missing value in row {row}"),
            }
        }
    }
    Ok(points)
}
